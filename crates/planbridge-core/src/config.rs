//! Process-wide engine configuration.
//!
//! Read once from the environment on first ABI use. Invalid values fall back to
//! the default and are reported with a warning rather than failing start-up,
//! since there is no caller to return an error to at that point.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::capabilities::CopyBehavior;

pub const ENV_COPY_BEHAVIOR: &str = "PLANBRIDGE_COPY_BEHAVIOR";
pub const ENV_MAX_CONCURRENT_EXECUTIONS: &str = "PLANBRIDGE_MAX_CONCURRENT_EXECUTIONS_PER_PLAN";
pub const ENV_ARROW_COMPAT: &str = "PLANBRIDGE_ARROW_COMPAT";
pub const ENV_LOG: &str = "PLANBRIDGE_LOG";
/// Read, never written: Polars sizes its global pool from it.
pub const ENV_POLARS_MAX_THREADS: &str = "POLARS_MAX_THREADS";

/// Arrow layout used for IPC and C Data exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ArrowCompat {
    /// String and binary view types.
    #[default]
    Newest,
    /// Large utf8 / large binary, for consumers without view-type support.
    Oldest,
}

impl FromStr for ArrowCompat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" => Ok(ArrowCompat::Newest),
            "oldest" => Ok(ArrowCompat::Oldest),
            other => Err(format!("expected newest or oldest, got {other:?}")),
        }
    }
}

impl fmt::Display for ArrowCompat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrowCompat::Newest => f.write_str("newest"),
            ArrowCompat::Oldest => f.write_str("oldest"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    pub copy_behavior: CopyBehavior,
    /// 0 means unlimited.
    pub max_concurrent_executions_per_plan: u32,
    pub arrow_compat: ArrowCompat,
    /// `tracing` filter directive.
    pub log_filter: String,
    /// Size of the engine's worker pool, as reported in capabilities.
    pub worker_threads: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        BridgeConfig {
            copy_behavior: CopyBehavior::ZeroCopyWhenPossible,
            max_concurrent_executions_per_plan: 1,
            arrow_compat: ArrowCompat::Newest,
            log_filter: "warn".to_string(),
            worker_threads: default_worker_threads(),
        }
    }
}

fn default_worker_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

impl BridgeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset keys keep their defaults;
    /// unparsable values keep their defaults and log a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = BridgeConfig::default();

        if let Some(v) = parsed(&lookup, ENV_COPY_BEHAVIOR) {
            config.copy_behavior = v;
        }
        if let Some(v) = parsed(&lookup, ENV_MAX_CONCURRENT_EXECUTIONS) {
            config.max_concurrent_executions_per_plan = v;
        }
        if let Some(v) = parsed(&lookup, ENV_ARROW_COMPAT) {
            config.arrow_compat = v;
        }
        if let Some(v) = lookup(ENV_LOG).filter(|s| !s.trim().is_empty()) {
            config.log_filter = v;
        }
        match parsed::<usize>(&lookup, ENV_POLARS_MAX_THREADS) {
            Some(0) => {
                tracing::warn!("{ENV_POLARS_MAX_THREADS}=0 is not a valid pool size; ignoring");
            }
            Some(n) => config.worker_threads = n,
            None => {}
        }
        config
    }

    pub fn with_copy_behavior(mut self, copy_behavior: CopyBehavior) -> Self {
        self.copy_behavior = copy_behavior;
        self
    }

    pub fn with_max_concurrent_executions_per_plan(mut self, max: u32) -> Self {
        self.max_concurrent_executions_per_plan = max;
        self
    }

    pub fn with_arrow_compat(mut self, compat: ArrowCompat) -> Self {
        self.arrow_compat = compat;
        self
    }

    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(key, value = %raw, error = %e, "ignoring invalid configuration value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> BridgeConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        BridgeConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = from_pairs(&[]);
        assert_eq!(config.copy_behavior, CopyBehavior::ZeroCopyWhenPossible);
        assert_eq!(config.max_concurrent_executions_per_plan, 1);
        assert_eq!(config.arrow_compat, ArrowCompat::Newest);
        assert_eq!(config.log_filter, "warn");
        assert!(config.worker_threads >= 1);
    }

    #[test]
    fn reads_every_key() {
        let config = from_pairs(&[
            (ENV_COPY_BEHAVIOR, "copy_on_boundary"),
            (ENV_MAX_CONCURRENT_EXECUTIONS, "0"),
            (ENV_ARROW_COMPAT, "Oldest"),
            (ENV_LOG, "planbridge=debug"),
            (ENV_POLARS_MAX_THREADS, "3"),
        ]);
        assert_eq!(config.copy_behavior, CopyBehavior::CopyOnBoundary);
        assert_eq!(config.max_concurrent_executions_per_plan, 0);
        assert_eq!(config.arrow_compat, ArrowCompat::Oldest);
        assert_eq!(config.log_filter, "planbridge=debug");
        assert_eq!(config.worker_threads, 3);
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = from_pairs(&[
            (ENV_COPY_BEHAVIOR, "sometimes"),
            (ENV_MAX_CONCURRENT_EXECUTIONS, "-2"),
            (ENV_ARROW_COMPAT, "v9"),
            (ENV_POLARS_MAX_THREADS, "0"),
        ]);
        let default = BridgeConfig::default();
        assert_eq!(config, default);
    }

    #[test]
    fn builder_setters() {
        let config = BridgeConfig::default()
            .with_copy_behavior(CopyBehavior::CopyOnBoundary)
            .with_max_concurrent_executions_per_plan(4)
            .with_arrow_compat(ArrowCompat::Oldest)
            .with_log_filter("debug");
        assert_eq!(config.copy_behavior, CopyBehavior::CopyOnBoundary);
        assert_eq!(config.max_concurrent_executions_per_plan, 4);
        assert_eq!(config.arrow_compat.to_string(), "oldest");
        assert_eq!(config.log_filter, "debug");
    }
}
