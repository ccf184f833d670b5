//! Error taxonomy shared by every layer of planbridge.
//!
//! [`BridgeError`] is what the engine returns internally; [`ErrorCode`] is the
//! integer status that crosses the ABI. Embedders map the code back to their own
//! error types and read the diagnostic text from the thread-scoped error slot.

use std::fmt;

use thiserror::Error;

/// Integer status returned by every fallible entry point. `Ok` is the only
/// success value; the numbering is part of the ABI and never changes.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Ok = 0,
    /// Fault-barrier catch-all for unclassified internal faults.
    Unknown = 1,
    /// Null pointer, bad length, unknown or stale handle.
    InvalidArgument = 2,
    AbiMismatch = 3,
    PlanVersionUnsupported = 4,
    PlanDecode = 5,
    /// Well-formed plan that references invalid things (unknown column, type mismatch).
    PlanSemantic = 6,
    ColumnarImport = 7,
    ColumnarExport = 8,
    /// Runtime failure evaluating the plan against real data.
    Execution = 9,
    /// Node, expression or dtype outside the declared capability set.
    Unsupported = 10,
    OutOfMemory = 11,
}

impl ErrorCode {
    /// Stable symbolic name used as the prefix of last-error diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            ErrorCode::Ok => "OK",
            ErrorCode::Unknown => "ERR_UNKNOWN",
            ErrorCode::InvalidArgument => "ERR_INVALID_ARGUMENT",
            ErrorCode::AbiMismatch => "ERR_ABI_MISMATCH",
            ErrorCode::PlanVersionUnsupported => "ERR_PLAN_VERSION_UNSUPPORTED",
            ErrorCode::PlanDecode => "ERR_PLAN_DECODE",
            ErrorCode::PlanSemantic => "ERR_PLAN_SEMANTIC",
            ErrorCode::ColumnarImport => "ERR_COLUMNAR_IMPORT",
            ErrorCode::ColumnarExport => "ERR_COLUMNAR_EXPORT",
            ErrorCode::Execution => "ERR_EXECUTION",
            ErrorCode::Unsupported => "ERR_UNSUPPORTED",
            ErrorCode::OutOfMemory => "ERR_OOM",
        }
    }

    /// Map a raw status back to a code. Unrecognized values map to `Unknown`.
    pub fn from_status(status: i32) -> ErrorCode {
        match status {
            0 => ErrorCode::Ok,
            2 => ErrorCode::InvalidArgument,
            3 => ErrorCode::AbiMismatch,
            4 => ErrorCode::PlanVersionUnsupported,
            5 => ErrorCode::PlanDecode,
            6 => ErrorCode::PlanSemantic,
            7 => ErrorCode::ColumnarImport,
            8 => ErrorCode::ColumnarExport,
            9 => ErrorCode::Execution,
            10 => ErrorCode::Unsupported,
            11 => ErrorCode::OutOfMemory,
            _ => ErrorCode::Unknown,
        }
    }

    pub fn as_status(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unified error type for plan compilation, execution and columnar exchange.
///
/// Every variant carries a human-readable diagnostic; the ABI layer prefixes it
/// with the symbolic [`ErrorCode`] name before storing it in the caller's
/// thread-scoped error slot.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("{0}")]
    Unknown(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("ABI mismatch: engine provides {engine}, caller expects {caller}")]
    AbiMismatch { engine: u32, caller: u32 },
    #[error("plan version {version} unsupported (engine supports {min}..={max})")]
    PlanVersionUnsupported { version: u32, min: u32, max: u32 },
    #[error("plan decode error: {0}")]
    PlanDecode(String),
    #[error("plan semantic error: {0}")]
    PlanSemantic(String),
    #[error("columnar import error: {0}")]
    ColumnarImport(String),
    #[error("columnar export error: {0}")]
    ColumnarExport(String),
    #[error("execution error: {0}")]
    Execution(String),
    #[error("unsupported: {0}")]
    Unsupported(String),
    #[error("out of memory: {0}")]
    OutOfMemory(String),
}

impl BridgeError {
    pub fn code(&self) -> ErrorCode {
        match self {
            BridgeError::Unknown(_) => ErrorCode::Unknown,
            BridgeError::InvalidArgument(_) => ErrorCode::InvalidArgument,
            BridgeError::AbiMismatch { .. } => ErrorCode::AbiMismatch,
            BridgeError::PlanVersionUnsupported { .. } => ErrorCode::PlanVersionUnsupported,
            BridgeError::PlanDecode(_) => ErrorCode::PlanDecode,
            BridgeError::PlanSemantic(_) => ErrorCode::PlanSemantic,
            BridgeError::ColumnarImport(_) => ErrorCode::ColumnarImport,
            BridgeError::ColumnarExport(_) => ErrorCode::ColumnarExport,
            BridgeError::Execution(_) => ErrorCode::Execution,
            BridgeError::Unsupported(_) => ErrorCode::Unsupported,
            BridgeError::OutOfMemory(_) => ErrorCode::OutOfMemory,
        }
    }

    /// The text stored in the last-error slot: `"[ERR_X] message"`.
    pub fn diagnostic(&self) -> String {
        format!("[{}] {}", self.code(), self)
    }

    /// Errors the caller should have prevented by negotiating capabilities first.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            BridgeError::AbiMismatch { .. } | BridgeError::PlanVersionUnsupported { .. }
        )
    }
}

impl From<prost::DecodeError> for BridgeError {
    fn from(e: prost::DecodeError) -> Self {
        BridgeError::PlanDecode(e.to_string())
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(e: serde_json::Error) -> Self {
        BridgeError::InvalidArgument(format!("invalid JSON: {e}"))
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
