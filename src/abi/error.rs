//! Thread-scoped last-error slot.
//!
//! Each calling thread sees only the diagnostic of its own most recent failed
//! call. The stored text stays valid until that thread's next fallible call or
//! an explicit [`clear_last_error`].

use std::cell::RefCell;
use std::ffi::{CStr, CString};

use planbridge_core::BridgeError;

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

pub(crate) fn set_last_error(err: &BridgeError) {
    set_last_error_text(err.diagnostic());
}

pub(crate) fn set_last_error_text(text: String) {
    // Interior NULs would truncate the C string; replace them instead of
    // dropping the whole message.
    let text = if text.contains('\0') {
        text.replace('\0', "\u{FFFD}")
    } else {
        text
    };
    let cstring = CString::new(text).ok();
    LAST_ERROR.with(|slot| *slot.borrow_mut() = cstring);
}

pub(crate) fn clear_last_error() {
    LAST_ERROR.with(|slot| *slot.borrow_mut() = None);
}

/// Run `f` with the current thread's diagnostic, if any.
pub(crate) fn with_last_error<R>(f: impl FnOnce(Option<&CStr>) -> R) -> R {
    LAST_ERROR.with(|slot| f(slot.borrow().as_deref()))
}
