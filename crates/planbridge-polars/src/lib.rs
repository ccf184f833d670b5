//! planbridge Polars engine: plan execution, row and column construction, and
//! Arrow columnar exchange (the only crate that depends on Polars).

pub mod columnar;
pub mod dtype;
pub mod error;
pub mod executor;
pub mod ipc;
pub mod rows;

use planbridge_core::{BridgeConfig, Capabilities};

/// Re-export for the ABI crate's frame table.
pub use polars::prelude::DataFrame;

pub use columnar::{FfiArray, FfiSchema, export_frame, import_frame};
pub use executor::execute_plan;

/// Human-readable build identifier.
pub const ENGINE_VERSION: &str = concat!("planbridge-polars ", env!("CARGO_PKG_VERSION"));

#[cfg(feature = "parquet")]
pub const SUPPORTED_NODES: &[&str] = &[
    "MemoryScan",
    "CsvScan",
    "ParquetScan",
    "Project",
    "Filter",
    "WithColumns",
    "Limit",
];

#[cfg(not(feature = "parquet"))]
pub const SUPPORTED_NODES: &[&str] = &[
    "MemoryScan",
    "CsvScan",
    "Project",
    "Filter",
    "WithColumns",
    "Limit",
];

/// Every expression the IR defines is interpreted by this engine.
pub const SUPPORTED_EXPRS: &[&str] = planbridge_core::plan::expr::Kind::ALL_NAMES;

pub use dtype::SUPPORTED_DTYPES;

/// Capability descriptor for this build under `config`.
pub fn capabilities(config: &BridgeConfig) -> Capabilities {
    Capabilities::new(
        ENGINE_VERSION,
        SUPPORTED_NODES,
        SUPPORTED_EXPRS,
        SUPPORTED_DTYPES,
        config,
    )
}
