//! Borrowed import of a caller-owned record batch.

use std::mem;

use planbridge_core::{BridgeError, Result};
use polars::prelude::{Column, DataFrame, Series};
use polars_arrow::array::{Array, StructArray};
use polars_arrow::datatypes::{ArrowDataType, Field as ArrowField, PhysicalType};
use polars_arrow::ffi::{ArrowArray, ArrowSchema, import_array_from_c, import_field_from_c};

use super::deep_copy;
use super::ffi::{FfiArray, FfiSchema};
use crate::error::import_error;

/// Build an engine-owned frame from a caller-owned batch.
///
/// The batch is borrowed for the duration of the call only: it is never
/// released or modified, and the returned frame shares no memory with it. The
/// top-level array must be a struct array whose children are the columns.
///
/// # Safety
/// `schema` and `array` must point to valid, unreleased Arrow C Data
/// structures that stay valid and unmoved until this function returns.
pub unsafe fn import_frame(schema: *const FfiSchema, array: *const FfiArray) -> Result<DataFrame> {
    let (schema, array) = match unsafe { (schema.as_ref(), array.as_ref()) } {
        (Some(s), Some(a)) => (s, a),
        _ => {
            return Err(BridgeError::InvalidArgument(
                "columnar input requires both a schema and an array".into(),
            ));
        }
    };
    if schema.is_released() || array.is_released() {
        return Err(BridgeError::ColumnarImport(
            "input batch has already been released".into(),
        ));
    }

    let field = unsafe { import_field_from_c(&*(schema as *const FfiSchema).cast::<ArrowSchema>()) }
        .map_err(import_error)?;
    let ArrowDataType::Struct(fields) = &field.dtype else {
        return Err(BridgeError::ColumnarImport(format!(
            "top-level array must be a struct of columns, got {:?}",
            field.dtype
        )));
    };
    fields.iter().try_for_each(check_importable)?;

    // SAFETY: identical #[repr(C)] layout; the view's release is a no-op so
    // dropping the imported array never touches the caller's structures.
    let view: ArrowArray = unsafe { mem::transmute::<FfiArray, ArrowArray>(array.borrowed_view()) };
    let imported =
        unsafe { import_array_from_c(view, field.dtype.clone()) }.map_err(import_error)?;
    let batch = imported
        .as_any()
        .downcast_ref::<StructArray>()
        .ok_or_else(|| BridgeError::ColumnarImport("top-level array is not a struct array".into()))?;

    let columns = fields
        .iter()
        .zip(batch.values())
        .map(|(f, values)| {
            let owned = deep_copy(values.as_ref());
            Series::from_arrow(f.name.clone(), owned)
                .map(Column::from)
                .map_err(import_error)
        })
        .collect::<Result<Vec<Column>>>()?;
    drop(imported);

    let df = DataFrame::new(columns).map_err(import_error)?;
    tracing::debug!(rows = df.height(), columns = df.width(), "imported columnar batch");
    Ok(df)
}

/// Only flat column types are accepted; nested arrays would need a recursive
/// copy to guarantee no aliasing with caller buffers.
fn check_importable(field: &ArrowField) -> Result<()> {
    match field.dtype.to_physical_type() {
        PhysicalType::Null
        | PhysicalType::Boolean
        | PhysicalType::Primitive(_)
        | PhysicalType::Binary
        | PhysicalType::LargeBinary
        | PhysicalType::FixedSizeBinary
        | PhysicalType::Utf8
        | PhysicalType::LargeUtf8
        | PhysicalType::BinaryView
        | PhysicalType::Utf8View => Ok(()),
        other => Err(BridgeError::ColumnarImport(format!(
            "column {:?}: nested type {other:?} cannot be imported",
            field.name
        ))),
    }
}
