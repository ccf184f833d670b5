//! C ABI entry points.
//!
//! Conventions shared by every entry point:
//! - fallible calls return a status (`0` = success, otherwise an
//!   [`ErrorCode`](planbridge_core::ErrorCode) value) and leave a
//!   `"[ERR_X] message"` diagnostic in the calling thread's last-error slot;
//! - engine objects cross the boundary as opaque `u64` handles, never
//!   pointers; `0` means "no handle";
//! - byte buffers returned through `(out_ptr, out_len)` belong to the caller
//!   and are released with [`planbridge_output_free`];
//! - out-parameters are written only on success.

pub(crate) mod buffers;
pub(crate) mod error;
mod frame;
pub(crate) mod guard;
pub(crate) mod handles;
mod plan;

use std::ffi::{c_char, c_int};
use std::slice;

use planbridge_core::{ABI_VERSION, BridgeError, Result};

pub use frame::*;
pub use plan::*;

use self::error::{clear_last_error, with_last_error};
use self::guard::{ffi_guard, no_unwind};
use crate::runtime::runtime;

/// ABI version of this build. Never fails.
#[unsafe(no_mangle)]
pub extern "C" fn planbridge_abi_version() -> u32 {
    ABI_VERSION
}

/// Fails with `ERR_ABI_MISMATCH` unless `expected` equals this build's ABI.
#[unsafe(no_mangle)]
pub extern "C" fn planbridge_check_abi(expected: u32) -> c_int {
    ffi_guard(|| {
        if expected != ABI_VERSION {
            return Err(BridgeError::AbiMismatch {
                engine: ABI_VERSION,
                caller: expected,
            });
        }
        Ok(())
    })
}

/// Human-readable engine identifier as a NUL-terminated string owned by the
/// engine and valid for the life of the process. Do not free it.
#[unsafe(no_mangle)]
pub extern "C" fn planbridge_engine_version(
    out_ptr: *mut *const c_char,
    out_len: *mut usize,
) -> c_int {
    ffi_guard(|| {
        check_out(out_ptr, "out_ptr")?;
        check_out(out_len, "out_len")?;
        let version = runtime().engine_version();
        // SAFETY: both out-pointers validated non-null above.
        unsafe {
            *out_ptr = version.as_ptr();
            *out_len = version.as_bytes().len();
        }
        Ok(())
    })
}

/// Capability descriptor as NUL-terminated JSON owned by the engine and valid
/// for the life of the process. Identical across calls. Do not free it.
#[unsafe(no_mangle)]
pub extern "C" fn planbridge_capabilities(
    out_ptr: *mut *const c_char,
    out_len: *mut usize,
) -> c_int {
    ffi_guard(|| {
        check_out(out_ptr, "out_ptr")?;
        check_out(out_len, "out_len")?;
        let json = runtime().capabilities_json()?;
        // SAFETY: both out-pointers validated non-null above.
        unsafe {
            *out_ptr = json.as_ptr();
            *out_len = json.as_bytes().len();
        }
        Ok(())
    })
}

/// The calling thread's last diagnostic, or null when its most recent
/// fallible call succeeded. The pointer stays valid until this thread's next
/// fallible call or [`planbridge_last_error_free`].
///
/// Reading the slot does not count as a fallible call.
#[unsafe(no_mangle)]
pub extern "C" fn planbridge_last_error() -> *const c_char {
    with_last_error(|e| e.map_or(std::ptr::null(), |c| c.as_ptr()))
}

/// Clear the calling thread's diagnostic, invalidating any pointer returned by
/// [`planbridge_last_error`].
#[unsafe(no_mangle)]
pub extern "C" fn planbridge_last_error_free() {
    no_unwind("planbridge_last_error_free", clear_last_error);
}

/// Release a byte buffer returned by any `*_bytes` or `plan_execute_simple`
/// call. `len` must be the length returned with it. Null is ignored.
#[unsafe(no_mangle)]
pub extern "C" fn planbridge_output_free(ptr: *mut u8, len: usize) {
    no_unwind("planbridge_output_free", || {
        // SAFETY: the caller passes back a (ptr, len) pair produced by this
        // library, exactly once.
        unsafe { buffers::release(ptr, len) }
    });
}

fn check_out<T>(ptr: *mut T, what: &str) -> Result<()> {
    if ptr.is_null() {
        return Err(BridgeError::InvalidArgument(format!("{what} is null")));
    }
    Ok(())
}

/// Borrow `(ptr, len)` as a byte slice. A null pointer is only accepted with
/// `len == 0`.
///
/// # Safety
/// A non-null `ptr` must be valid for reads of `len` bytes for `'a`.
unsafe fn bytes_arg<'a>(ptr: *const u8, len: usize, what: &str) -> Result<&'a [u8]> {
    if ptr.is_null() {
        if len == 0 {
            return Ok(&[]);
        }
        return Err(BridgeError::InvalidArgument(format!(
            "{what} is null but its length is {len}"
        )));
    }
    // SAFETY: non-null; validity for `len` bytes is the caller's contract.
    Ok(unsafe { slice::from_raw_parts(ptr, len) })
}

/// Write `value` through a validated out-pointer.
///
/// # Safety
/// `ptr` must be non-null and valid for writes.
unsafe fn write_out<T>(ptr: *mut T, value: T) {
    unsafe { ptr.write(value) };
}
