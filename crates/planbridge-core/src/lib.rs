//! planbridge core: plan IR, capability descriptor, configuration and error
//! taxonomy (no Polars dependency).

pub mod capabilities;
pub mod config;
pub mod error;
pub mod plan;

pub use capabilities::{ABI_VERSION, Capabilities, CopyBehavior};
pub use config::{ArrowCompat, BridgeConfig};
pub use error::{BridgeError, ErrorCode, Result};
pub use plan::{Plan, PlanBuilder, PlanSummary, decode_plan};
