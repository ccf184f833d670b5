//! Plan compilation and execution entry points.

use std::ffi::c_int;

use planbridge_core::{BridgeError, Result};
use planbridge_polars::rows::{frame_from_ndjson, frame_to_ndjson};
use planbridge_polars::{DataFrame, FfiArray, FfiSchema, export_frame, import_frame};

use super::buffers::{hand_out, into_boxed};
use super::guard::{ffi_guard, no_unwind};
use super::{bytes_arg, check_out, write_out};
use crate::runtime::runtime;

/// Decode, version-check and validate a serialized plan.
///
/// On success `*out_handle` receives a new plan handle distinct from every
/// live handle. Release it with [`planbridge_plan_free`].
#[unsafe(no_mangle)]
pub extern "C" fn planbridge_plan_compile(
    plan_ptr: *const u8,
    plan_len: usize,
    out_handle: *mut u64,
) -> c_int {
    ffi_guard(|| {
        check_out(out_handle, "out_handle")?;
        // SAFETY: the caller guarantees `plan_len` readable bytes.
        let bytes = unsafe { bytes_arg(plan_ptr, plan_len, "plan_ptr") }?;
        if bytes.is_empty() {
            return Err(BridgeError::PlanDecode("plan bytes are empty".into()));
        }
        let handle = runtime().compile(bytes)?;
        // SAFETY: validated non-null above.
        unsafe { write_out(out_handle, handle) };
        Ok(())
    })
}

/// Release a compiled plan. Unknown, stale and already-freed handles are
/// ignored; executions already running on the plan complete normally.
#[unsafe(no_mangle)]
pub extern "C" fn planbridge_plan_free(handle: u64) {
    no_unwind("planbridge_plan_free", || {
        runtime().plans.remove(handle);
    });
}

/// Execute with newline-delimited JSON rows in and out.
///
/// Empty input (null pointer with zero length, or no non-blank lines) means
/// "no input frame". The output buffer is released with
/// [`planbridge_output_free`](super::planbridge_output_free).
#[unsafe(no_mangle)]
pub extern "C" fn planbridge_plan_execute_simple(
    handle: u64,
    input_ptr: *const u8,
    input_len: usize,
    out_ptr: *mut *mut u8,
    out_len: *mut usize,
) -> c_int {
    ffi_guard(|| {
        check_out(out_ptr, "out_ptr")?;
        check_out(out_len, "out_len")?;
        // SAFETY: the caller guarantees `input_len` readable bytes.
        let input = unsafe { bytes_arg(input_ptr, input_len, "input_ptr") }?;
        let input = frame_from_ndjson(input)?;
        let df = runtime().execute(handle, input.as_ref())?;
        let buf = into_boxed(frame_to_ndjson(&df)?)?;
        // SAFETY: both out-pointers validated non-null above.
        unsafe { hand_out(buf, out_ptr, out_len) };
        Ok(())
    })
}

/// Execute with Arrow C Data record batches in and out.
///
/// The input batch is borrowed for this call only and is never released by
/// the engine. Passing null for both input pointers means "no input". On
/// success the output structures are owned by the caller, who must invoke
/// each one's `release` exactly once; on failure they are not written.
#[unsafe(no_mangle)]
pub extern "C" fn planbridge_plan_execute_columnar(
    handle: u64,
    input_schema: *const FfiSchema,
    input_array: *const FfiArray,
    out_schema: *mut FfiSchema,
    out_array: *mut FfiArray,
) -> c_int {
    ffi_guard(|| {
        check_out(out_schema, "out_schema")?;
        check_out(out_array, "out_array")?;
        // SAFETY: the caller keeps any input batch valid for this call.
        let input = unsafe { optional_columnar_input(input_schema, input_array) }?;
        let rt = runtime();
        let df = rt.execute(handle, input.as_ref())?;
        // SAFETY: output slots validated non-null; the caller owns them.
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

/// Execute against a DataFrame handle (`0` = no input) and keep the result
/// engine-side as a new DataFrame handle.
#[unsafe(no_mangle)]
pub extern "C" fn planbridge_plan_collect_dataframe(
    plan_handle: u64,
    input_frame: u64,
    out_handle: *mut u64,
) -> c_int {
    ffi_guard(|| {
        check_out(out_handle, "out_handle")?;
        let rt = runtime();
        let input = match input_frame {
            0 => None,
            h => Some(rt.frames.get(h)?),
        };
        let df = rt.execute(plan_handle, input.as_deref())?;
        let handle = rt.frames.insert(df);
        // SAFETY: validated non-null above.
        unsafe { write_out(out_handle, handle) };
        Ok(())
    })
}

/// # Safety
/// Non-null pointers must reference valid Arrow C Data structures.
unsafe fn optional_columnar_input(
    schema: *const FfiSchema,
    array: *const FfiArray,
) -> Result<Option<DataFrame>> {
    match (schema.is_null(), array.is_null()) {
        (true, true) => Ok(None),
        (false, false) => Ok(Some(unsafe { import_frame(schema, array) }?)),
        _ => Err(BridgeError::InvalidArgument(
            "input_schema and input_array must both be null or both be set".into(),
        )),
    }
}
