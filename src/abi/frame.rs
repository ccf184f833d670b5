//! DataFrame handle entry points.

use std::ffi::c_int;
use std::io::Write;

use planbridge_core::BridgeError;
use planbridge_polars::ipc::frame_to_ipc;
use planbridge_polars::rows::{frame_from_columns_json, frame_to_ndjson};
use planbridge_polars::{FfiArray, FfiSchema, export_frame, import_frame};

use super::buffers::{hand_out, into_boxed};
use super::guard::{ffi_guard, no_unwind};
use super::{bytes_arg, check_out, write_out};
use crate::runtime::runtime;

/// Build a DataFrame from JSON columns:
/// `[{"name": "a", "values": [1, null, 3]}, ...]`.
///
/// Each column's type is inferred from its values; nulls are allowed anywhere.
#[unsafe(no_mangle)]
pub extern "C" fn planbridge_dataframe_from_columns(
    json_ptr: *const u8,
    json_len: usize,
    out_handle: *mut u64,
) -> c_int {
    ffi_guard(|| {
        check_out(out_handle, "out_handle")?;
        // SAFETY: the caller guarantees `json_len` readable bytes.
        let json = unsafe { bytes_arg(json_ptr, json_len, "json_ptr") }?;
        let df = frame_from_columns_json(json)?;
        let handle = runtime().frames.insert(df);
        // SAFETY: validated non-null above.
        unsafe { write_out(out_handle, handle) };
        Ok(())
    })
}

/// Build a DataFrame from a borrowed Arrow C Data record batch. The batch is
/// copied; the caller still owns and releases it.
#[unsafe(no_mangle)]
pub extern "C" fn planbridge_dataframe_from_columnar(
    schema: *const FfiSchema,
    array: *const FfiArray,
    out_handle: *mut u64,
) -> c_int {
    ffi_guard(|| {
        check_out(out_handle, "out_handle")?;
        // SAFETY: the caller keeps the batch valid for this call.
        let df = unsafe { import_frame(schema, array) }?;
        let handle = runtime().frames.insert(df);
        // SAFETY: validated non-null above.
        unsafe { write_out(out_handle, handle) };
        Ok(())
    })
}

/// Serialize a DataFrame as an Arrow IPC file. Release the buffer with
/// [`planbridge_output_free`](super::planbridge_output_free).
#[unsafe(no_mangle)]
pub extern "C" fn planbridge_dataframe_to_columnar_bytes(
    handle: u64,
    out_ptr: *mut *mut u8,
    out_len: *mut usize,
) -> c_int {
    ffi_guard(|| {
        check_out(out_ptr, "out_ptr")?;
        check_out(out_len, "out_len")?;
        let rt = runtime();
        let df = rt.frames.get(handle)?;
        let buf = into_boxed(frame_to_ipc(&df, rt.config.arrow_compat)?)?;
        // SAFETY: both out-pointers validated non-null above.
        unsafe { hand_out(buf, out_ptr, out_len) };
        Ok(())
    })
}

/// Serialize a DataFrame as newline-delimited JSON rows.
#[unsafe(no_mangle)]
pub extern "C" fn planbridge_dataframe_to_row_bytes(
    handle: u64,
    out_ptr: *mut *mut u8,
    out_len: *mut usize,
) -> c_int {
    ffi_guard(|| {
        check_out(out_ptr, "out_ptr")?;
        check_out(out_len, "out_len")?;
        let df = runtime().frames.get(handle)?;
        let buf = into_boxed(frame_to_ndjson(&df)?)?;
        // SAFETY: both out-pointers validated non-null above.
        unsafe { hand_out(buf, out_ptr, out_len) };
        Ok(())
    })
}

/// Export a DataFrame as an Arrow C Data record batch owned by the caller.
/// The export stays valid after [`planbridge_dataframe_free`].
#[unsafe(no_mangle)]
pub extern "C" fn planbridge_dataframe_export_columnar(
    handle: u64,
    out_schema: *mut FfiSchema,
    out_array: *mut FfiArray,
) -> c_int {
    ffi_guard(|| {
        let rt = runtime();
        let df = rt.frames.get(handle)?;
        // SAFETY: null slots are rejected by export_frame; the caller owns them.
        unsafe {
            export_frame(
                &df,
                rt.config.copy_behavior,
                rt.config.arrow_compat,
                out_schema,
                out_array,
            )
        }
    })
}

/// Print a DataFrame to stdout.
#[unsafe(no_mangle)]
pub extern "C" fn planbridge_dataframe_print(handle: u64) -> c_int {
    ffi_guard(|| {
        let df = runtime().frames.get(handle)?;
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{df}")
            .and_then(|()| stdout.flush())
            .map_err(|e| BridgeError::Execution(format!("printing dataframe: {e}")))
    })
}

/// Release a DataFrame handle. Unknown, stale and already-freed handles are
/// ignored. Columnar exports of the frame stay valid.
#[unsafe(no_mangle)]
pub extern "C" fn planbridge_dataframe_free(handle: u64) {
    no_unwind("planbridge_dataframe_free", || {
        runtime().frames.remove(handle);
    });
}
