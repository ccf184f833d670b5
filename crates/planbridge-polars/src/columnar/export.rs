//! Owned export of a frame as an Arrow record batch.

use std::ptr;

use planbridge_core::{ArrowCompat, BridgeError, CopyBehavior, Result};
use polars::prelude::DataFrame;
use polars_arrow::array::{Array, StructArray};
use polars_arrow::datatypes::{ArrowDataType, Field as ArrowField};
use polars_arrow::ffi::{ArrowArray, ArrowSchema, export_array_to_c, export_field_to_c};

use super::deep_copy;
use super::ffi::{FfiArray, FfiSchema};
use crate::ipc::compat_level;

/// Export `df` into caller-provided storage, transferring ownership.
///
/// The caller must release both structures exactly once. Nothing is written
/// unless both are fully built. With [`CopyBehavior::ZeroCopyWhenPossible`]
/// the batch is a view over the frame's own buffers, which stay alive until
/// the caller releases it even if the frame itself is freed first.
///
/// # Safety
/// `out_schema` and `out_array` must be valid for writes and must not hold
/// unreleased structures.
pub unsafe fn export_frame(
    df: &DataFrame,
    copy: CopyBehavior,
    compat: ArrowCompat,
    out_schema: *mut FfiSchema,
    out_array: *mut FfiArray,
) -> Result<()> {
    if out_schema.is_null() || out_array.is_null() {
        return Err(BridgeError::InvalidArgument(
            "columnar output requires both a schema and an array slot".into(),
        ));
    }
    let (schema, array) = frame_to_c(df, copy, compat)?;
    unsafe {
        ptr::write(out_schema.cast::<ArrowSchema>(), schema);
        ptr::write(out_array.cast::<ArrowArray>(), array);
    }
    tracing::debug!(rows = df.height(), columns = df.width(), %copy, "exported columnar batch");
    Ok(())
}

fn frame_to_c(
    df: &DataFrame,
    copy: CopyBehavior,
    compat: ArrowCompat,
) -> Result<(ArrowSchema, ArrowArray)> {
    let level = compat_level(compat);
    let mut fields = Vec::with_capacity(df.width());
    let mut values: Vec<Box<dyn Array>> = Vec::with_capacity(df.width());
    for column in df.get_columns() {
        let series = column.as_materialized_series().rechunk();
        let arr = series.to_arrow(0, level);
        let arr = match copy {
            CopyBehavior::ZeroCopyWhenPossible => arr,
            CopyBehavior::CopyOnBoundary => deep_copy(arr.as_ref()),
        };
        fields.push(ArrowField::new(
            column.name().clone(),
            arr.dtype().clone(),
            true,
        ));
        values.push(arr);
    }

    let dtype = ArrowDataType::Struct(fields);
    let batch = StructArray::try_new(dtype.clone(), df.height(), values, None)
        .map_err(|e| BridgeError::ColumnarExport(e.to_string()))?;
    let field = ArrowField::new("".into(), dtype, false);
    let schema = export_field_to_c(&field);
    let array = export_array_to_c(batch.boxed());
    Ok((schema, array))
}
