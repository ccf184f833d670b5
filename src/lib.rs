//! planbridge: execute versioned dataframe plans on Polars through a C ABI.
//!
//! A host compiles a serialized [`Plan`](plan::Plan) into an opaque handle,
//! executes it against row-oriented JSON, Arrow C Data batches or engine-side
//! DataFrame handles, and reads results back in the same forms. Every entry
//! point lives in [`abi`]; the Rust types are re-exported so Rust hosts and
//! tests can build plans and inspect the capability descriptor.
//!
//! Configuration is read once from the environment (see
//! [`BridgeConfig::from_env`]) on the first ABI call.

pub mod abi;
mod logging;
mod runtime;

pub use abi::*;
pub use planbridge_core::plan;
pub use planbridge_core::{
    ABI_VERSION, ArrowCompat, BridgeConfig, BridgeError, Capabilities, CopyBehavior, ErrorCode,
};
pub use planbridge_polars::{ENGINE_VERSION, FfiArray, FfiSchema};
