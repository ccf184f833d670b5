//! Byte buffers handed to the caller.
//!
//! A buffer is a boxed slice leaked across the boundary as `(ptr, len)` and
//! reclaimed only by [`release`], with the same length.

use std::ptr;

use planbridge_core::{BridgeError, Result};

/// Turn `bytes` into an exactly-sized allocation. A vector with spare
/// capacity is copied into a fresh one, reporting allocation failure as
/// OutOfMemory instead of aborting.
pub(crate) fn into_boxed(bytes: Vec<u8>) -> Result<Box<[u8]>> {
    if bytes.len() == bytes.capacity() {
        return Ok(bytes.into_boxed_slice());
    }
    let mut buf = Vec::new();
    buf.try_reserve_exact(bytes.len()).map_err(|e| {
        BridgeError::OutOfMemory(format!("output buffer of {} bytes: {e}", bytes.len()))
    })?;
    buf.extend_from_slice(&bytes);
    Ok(buf.into_boxed_slice())
}

/// Write a buffer to the caller's out-parameters, transferring ownership.
///
/// # Safety
/// `out_ptr` and `out_len` must be valid for writes.
pub(crate) unsafe fn hand_out(buf: Box<[u8]>, out_ptr: *mut *mut u8, out_len: *mut usize) {
    let len = buf.len();
    let raw = Box::into_raw(buf).cast::<u8>();
    unsafe {
        *out_ptr = raw;
        *out_len = len;
    }
}

/// Reclaim a buffer produced by [`hand_out`]. Null is ignored.
///
/// # Safety
/// `(ptr, len)` must come from [`hand_out`] and not have been released yet.
pub(crate) unsafe fn release(ptr: *mut u8, len: usize) {
    if ptr.is_null() {
        return;
    }
    let slice = ptr::slice_from_raw_parts_mut(ptr, len);
    drop(unsafe { Box::from_raw(slice) });
}
