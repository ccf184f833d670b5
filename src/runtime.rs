//! Process-wide engine state, created on first ABI use.

use std::ffi::CString;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use planbridge_core::config::ENV_LOG;
use planbridge_core::{BridgeConfig, BridgeError, Capabilities, Plan, PlanSummary, Result};
use planbridge_polars::{DataFrame, ENGINE_VERSION};

use crate::abi::handles::HandleTable;
use crate::logging;

static RUNTIME: OnceLock<Runtime> = OnceLock::new();

pub(crate) struct Runtime {
    pub(crate) config: BridgeConfig,
    pub(crate) capabilities: Capabilities,
    capabilities_json: OnceLock<CString>,
    engine_version: CString,
    pub(crate) plans: HandleTable<CompiledPlan>,
    pub(crate) frames: HandleTable<DataFrame>,
}

/// The shared runtime. The first call installs logging and reads the
/// configuration from the environment.
pub(crate) fn runtime() -> &'static Runtime {
    RUNTIME.get_or_init(|| {
        let filter = std::env::var(ENV_LOG)
            .ok()
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| BridgeConfig::default().log_filter);
        logging::init(&filter);
        let runtime = Runtime::new(BridgeConfig::from_env());
        tracing::info!(
            engine = ENGINE_VERSION,
            copy_behavior = %runtime.config.copy_behavior,
            arrow_compat = %runtime.config.arrow_compat,
            max_concurrent_executions_per_plan = runtime.config.max_concurrent_executions_per_plan,
            "engine runtime initialized"
        );
        runtime
    })
}

impl Runtime {
    pub(crate) fn new(config: BridgeConfig) -> Self {
        Runtime {
            capabilities: planbridge_polars::capabilities(&config),
            capabilities_json: OnceLock::new(),
            engine_version: CString::new(ENGINE_VERSION).unwrap_or_default(),
            plans: HandleTable::new("plan"),
            frames: HandleTable::new("dataframe"),
            config,
        }
    }

    pub(crate) fn engine_version(&self) -> &CString {
        &self.engine_version
    }

    /// JSON encoding of the capability descriptor, computed once.
    pub(crate) fn capabilities_json(&self) -> Result<&CString> {
        if let Some(json) = self.capabilities_json.get() {
            return Ok(json);
        }
        let json = CString::new(self.capabilities.to_json()?)
            .map_err(|e| BridgeError::Unknown(format!("capability descriptor: {e}")))?;
        Ok(self.capabilities_json.get_or_init(|| json))
    }

    pub(crate) fn compile(&self, bytes: &[u8]) -> Result<u64> {
        let (plan, summary) = planbridge_core::decode_plan(bytes, &self.capabilities)?;
        let handle = self.plans.insert(CompiledPlan::new(plan, summary));
        tracing::debug!(handle, nodes = summary.node_count, "plan compiled");
        Ok(handle)
    }

    /// Run a compiled plan under the per-plan concurrency ceiling.
    pub(crate) fn execute(&self, handle: u64, input: Option<&DataFrame>) -> Result<DataFrame> {
        let compiled = self.plans.get(handle)?;
        let _permit = compiled.begin(self.config.max_concurrent_executions_per_plan)?;
        if compiled.summary.requires_input && input.is_none() {
            return Err(BridgeError::Execution(
                "plan reads a caller-supplied frame but none was provided".into(),
            ));
        }
        let df = planbridge_polars::execute_plan(&compiled.plan, input)?;
        tracing::debug!(handle, rows = df.height(), columns = df.width(), "plan executed");
        Ok(df)
    }
}

/// An immutable, validated plan plus its in-flight execution count.
pub(crate) struct CompiledPlan {
    plan: Plan,
    summary: PlanSummary,
    in_flight: AtomicUsize,
}

impl CompiledPlan {
    pub(crate) fn new(plan: Plan, summary: PlanSummary) -> Self {
        CompiledPlan {
            plan,
            summary,
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Reserve an execution slot. `limit` 0 means unlimited.
    pub(crate) fn begin(&self, limit: u32) -> Result<ExecutionPermit<'_>> {
        let previous = self.in_flight.fetch_add(1, Ordering::AcqRel);
        let permit = ExecutionPermit(&self.in_flight);
        if limit != 0 && previous >= limit as usize {
            return Err(BridgeError::Unsupported(format!(
                "concurrent execution of one compiled plan ({} in flight, limit {limit}); \
                 compile the plan once per thread",
                previous + 1
            )));
        }
        Ok(permit)
    }

    #[cfg(test)]
    fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }
}

pub(crate) struct ExecutionPermit<'a>(&'a AtomicUsize);

impl Drop for ExecutionPermit<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}
