//! Versioned plan IR.
//!
//! A [`Plan`] is a tree of relational [`Node`]s whose leaves are scans and whose
//! operators carry scalar [`Expr`]s. The encoding is Protocol Buffers and grows
//! additively: new fields get defaults, new variants get new tags, and no tag
//! number is ever reused. `plan_version` changes only on a breaking change.

pub mod builder;
mod relational;
mod scalar;
mod validate;

use prost::Message;

pub use builder::PlanBuilder;
pub use relational::*;
pub use scalar::*;
pub use validate::{PlanSummary, check_version, validate};

use crate::capabilities::Capabilities;
use crate::error::Result;

/// Version written by [`PlanBuilder`].
pub const PLAN_VERSION: u32 = 1;
pub const MIN_PLAN_VERSION_SUPPORTED: u32 = 1;
pub const MAX_PLAN_VERSION_SUPPORTED: u32 = 1;

#[derive(Clone, PartialEq, Message)]
pub struct Plan {
    #[prost(uint32, tag = "1")]
    pub plan_version: u32,
    #[prost(message, optional, tag = "2")]
    pub root: Option<Node>,
}

/// Decode, version-check and validate plan bytes against `caps`.
///
/// Malformed bytes fail with `PlanDecode`, an out-of-window version with
/// `PlanVersionUnsupported`, and anything outside the capability set with
/// `Unsupported`, all before any interpretation.
pub fn decode_plan(bytes: &[u8], caps: &Capabilities) -> Result<(Plan, PlanSummary)> {
    let plan = Plan::decode(bytes)?;
    check_version(plan.plan_version, caps)?;
    let summary = validate(&plan, caps)?;
    Ok((plan, summary))
}
