//! Capability descriptor: what one engine build can do.
//!
//! Callers fetch it once, as JSON, and decide which plans to send. The
//! descriptor is immutable for the lifetime of the process.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::BridgeConfig;
use crate::error::Result;
use crate::plan::{self, DataType, MAX_PLAN_VERSION_SUPPORTED, MIN_PLAN_VERSION_SUPPORTED};

/// Integer identifying the C ABI. Bumped on any incompatible change to an
/// entry point signature or to ownership rules.
pub const ABI_VERSION: u32 = 1;

/// Transfer strategy for columnar results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CopyBehavior {
    /// Export a live view over the result's own buffers.
    #[default]
    ZeroCopyWhenPossible,
    /// Hand out freshly allocated buffers owned only by the receiver.
    CopyOnBoundary,
}

impl FromStr for CopyBehavior {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zero_copy_when_possible" => Ok(CopyBehavior::ZeroCopyWhenPossible),
            "copy_on_boundary" => Ok(CopyBehavior::CopyOnBoundary),
            other => Err(format!(
                "expected zero_copy_when_possible or copy_on_boundary, got {other:?}"
            )),
        }
    }
}

impl fmt::Display for CopyBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CopyBehavior::ZeroCopyWhenPossible => f.write_str("zero_copy_when_possible"),
            CopyBehavior::CopyOnBoundary => f.write_str("copy_on_boundary"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub abi_version: u32,
    pub engine_version: String,
    pub min_plan_version_supported: u32,
    pub max_plan_version_supported: u32,
    pub supported_nodes: Vec<String>,
    pub supported_exprs: Vec<String>,
    pub supported_dtypes: Vec<String>,
    pub execution_modes: Vec<String>,
    pub copy_behavior: CopyBehavior,
    /// Ceiling on simultaneous executions of one compiled plan. 0 = unlimited.
    pub max_concurrent_executions_per_plan: u32,
    pub worker_threads: usize,
    pub columnar_transports: Vec<String>,
}

impl Capabilities {
    /// Descriptor for an engine build with the given operator, expression and
    /// dtype sets, using `config` for the tunable fields.
    pub fn new(
        engine_version: impl Into<String>,
        nodes: &[&str],
        exprs: &[&str],
        dtypes: &[&str],
        config: &BridgeConfig,
    ) -> Self {
        Capabilities {
            abi_version: ABI_VERSION,
            engine_version: engine_version.into(),
            min_plan_version_supported: MIN_PLAN_VERSION_SUPPORTED,
            max_plan_version_supported: MAX_PLAN_VERSION_SUPPORTED,
            supported_nodes: to_strings(nodes),
            supported_exprs: to_strings(exprs),
            supported_dtypes: to_strings(dtypes),
            execution_modes: to_strings(&["collect"]),
            copy_behavior: config.copy_behavior,
            max_concurrent_executions_per_plan: config.max_concurrent_executions_per_plan,
            worker_threads: config.worker_threads,
            columnar_transports: to_strings(&["arrow_c_data", "arrow_ipc_file", "ndjson"]),
        }
    }

    /// Everything the plan IR defines, with default configuration.
    pub fn all_core() -> Self {
        Capabilities::new(
            env!("CARGO_PKG_VERSION"),
            plan::node::Kind::ALL_NAMES,
            plan::expr::Kind::ALL_NAMES,
            DataType::ALL_NAMES,
            &BridgeConfig::default(),
        )
    }

    pub fn supports_node(&self, name: &str) -> bool {
        self.supported_nodes.iter().any(|n| n == name)
    }

    pub fn supports_expr(&self, name: &str) -> bool {
        self.supported_exprs.iter().any(|n| n == name)
    }

    pub fn supports_dtype(&self, name: &str) -> bool {
        self.supported_dtypes.iter().any(|n| n == name)
    }

    pub fn supports_plan_version(&self, version: u32) -> bool {
        (self.min_plan_version_supported..=self.max_plan_version_supported).contains(&version)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

fn to_strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}
