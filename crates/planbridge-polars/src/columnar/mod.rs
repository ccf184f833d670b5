//! Columnar exchange over the Arrow C Data Interface.
//!
//! Ownership rules at the boundary:
//! - input batches are borrowed for one call and copied into engine memory;
//!   the engine never releases them and keeps no pointer into them;
//! - output batches are transferred to the caller, who releases each
//!   structure exactly once;
//! - on failure nothing is written to the output slots.

mod export;
mod ffi;
mod import;

pub use export::export_frame;
pub use ffi::{FfiArray, FfiSchema};
pub use import::import_frame;

use polars_arrow::array::Array;
use polars_arrow::array::builder::{ArrayBuilder, ShareStrategy, make_builder};

/// Copy `arr` into freshly allocated buffers.
///
/// `ShareStrategy::Never` also rebuilds the data buffers of view arrays, so
/// the copy holds no reference to any buffer of `arr`.
pub(crate) fn deep_copy(arr: &dyn Array) -> Box<dyn Array> {
    let mut builder = make_builder(arr.dtype());
    builder.subslice_extend(arr, 0, arr.len(), ShareStrategy::Never);
    builder.freeze_reset()
}
