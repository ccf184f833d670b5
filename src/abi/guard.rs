//! Fault barrier around every entry point.

use std::any::Any;
use std::ffi::c_int;
use std::panic::{AssertUnwindSafe, catch_unwind};

use planbridge_core::{ErrorCode, Result};

use super::error::{clear_last_error, set_last_error, set_last_error_text};

/// Run a fallible entry point body.
///
/// Success clears the calling thread's diagnostic and returns 0. An error
/// stores `"[CODE] message"` and returns the code. A panic is caught, stored
/// as `ERR_UNKNOWN` and never unwinds into the caller.
pub(crate) fn ffi_guard(f: impl FnOnce() -> Result<()>) -> c_int {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(())) => {
            clear_last_error();
            ErrorCode::Ok.as_status()
        }
        Ok(Err(e)) => {
            let code = e.code();
            tracing::debug!(code = %code, error = %e, "entry point failed");
            set_last_error(&e);
            code.as_status()
        }
        Err(payload) => {
            let msg = panic_message(payload.as_ref());
            tracing::error!(panic = %msg, "caught panic at ABI boundary");
            set_last_error_text(format!("[{}] panic: {msg}", ErrorCode::Unknown));
            ErrorCode::Unknown.as_status()
        }
    }
}

/// Barrier for entry points that cannot fail (the release calls). Panics are
/// logged and swallowed; the last-error slot is left untouched.
pub(crate) fn no_unwind(what: &str, f: impl FnOnce()) {
    if let Err(payload) = catch_unwind(AssertUnwindSafe(f)) {
        let msg = panic_message(payload.as_ref());
        tracing::error!(panic = %msg, "caught panic in {what}");
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
