//! Polars error classification.
//!
//! The same Polars error kind can mean "bad plan" or "bad data" depending on
//! when it is raised, so callers tag each fallible step with a [`Phase`].

use planbridge_core::BridgeError;
use polars::error::PolarsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Building the lazy query and resolving its output schema. No data is read
    /// except what file scans need for schema inference.
    Resolve,
    /// Materializing the result.
    Collect,
}

/// Map a Polars error to the bridge taxonomy.
///
/// Unknown columns are always semantic and I/O failures always execution
/// errors; everything else follows the phase.
pub fn classify(e: PolarsError, phase: Phase) -> BridgeError {
    let msg = e.to_string();
    match root_cause(&e) {
        PolarsError::ColumnNotFound(_)
        | PolarsError::SchemaFieldNotFound(_)
        | PolarsError::StructFieldNotFound(_) => BridgeError::PlanSemantic(msg),
        PolarsError::IO { .. } => BridgeError::Execution(msg),
        _ => match phase {
            Phase::Resolve => BridgeError::PlanSemantic(msg),
            Phase::Collect => BridgeError::Execution(msg),
        },
    }
}

fn root_cause(e: &PolarsError) -> &PolarsError {
    match e {
        PolarsError::Context { error, .. } => root_cause(error),
        other => other,
    }
}

/// Failures converting between frames and Arrow structures.
pub fn import_error(e: PolarsError) -> BridgeError {
    BridgeError::ColumnarImport(e.to_string())
}

pub fn export_error(e: PolarsError) -> BridgeError {
    BridgeError::ColumnarExport(e.to_string())
}
