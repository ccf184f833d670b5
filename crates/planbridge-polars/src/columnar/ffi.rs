//! Arrow C Data Interface structures as they cross the boundary.
//!
//! Layout matches the Arrow specification (and `polars_arrow::ffi`), so a
//! pointer to one is a pointer to the other.

use std::ffi::{c_char, c_void};
use std::mem::size_of;
use std::ptr;

use polars_arrow::ffi::{ArrowArray, ArrowSchema};

#[repr(C)]
#[derive(Debug)]
pub struct FfiSchema {
    pub format: *const c_char,
    pub name: *const c_char,
    pub metadata: *const c_char,
    pub flags: i64,
    pub n_children: i64,
    pub children: *mut *mut FfiSchema,
    pub dictionary: *mut FfiSchema,
    /// Set by the producer; `None` once released.
    pub release: Option<unsafe extern "C" fn(*mut FfiSchema)>,
    pub private_data: *mut c_void,
}

#[repr(C)]
#[derive(Debug)]
pub struct FfiArray {
    pub length: i64,
    pub null_count: i64,
    pub offset: i64,
    pub n_buffers: i64,
    pub n_children: i64,
    pub buffers: *mut *const c_void,
    pub children: *mut *mut FfiArray,
    pub dictionary: *mut FfiArray,
    /// Set by the producer; `None` once released.
    pub release: Option<unsafe extern "C" fn(*mut FfiArray)>,
    pub private_data: *mut c_void,
}

const _: () = assert!(size_of::<FfiSchema>() == size_of::<ArrowSchema>());
const _: () = assert!(size_of::<FfiArray>() == size_of::<ArrowArray>());

impl FfiSchema {
    /// A released (empty) structure, suitable as an output slot.
    pub fn empty() -> Self {
        FfiSchema {
            format: ptr::null(),
            name: ptr::null(),
            metadata: ptr::null(),
            flags: 0,
            n_children: 0,
            children: ptr::null_mut(),
            dictionary: ptr::null_mut(),
            release: None,
            private_data: ptr::null_mut(),
        }
    }

    pub fn is_released(&self) -> bool {
        self.release.is_none()
    }

    /// Invoke the producer's release callback, at most once.
    ///
    /// # Safety
    /// `self` must be a structure populated by a conforming producer.
    pub unsafe fn release(&mut self) {
        if let Some(release) = self.release {
            unsafe { release(self) };
            self.release = None;
        }
    }
}

impl FfiArray {
    pub fn empty() -> Self {
        FfiArray {
            length: 0,
            null_count: 0,
            offset: 0,
            n_buffers: 0,
            n_children: 0,
            buffers: ptr::null_mut(),
            children: ptr::null_mut(),
            dictionary: ptr::null_mut(),
            release: None,
            private_data: ptr::null_mut(),
        }
    }

    pub fn is_released(&self) -> bool {
        self.release.is_none()
    }

    /// # Safety
    /// `self` must be a structure populated by a conforming producer.
    pub unsafe fn release(&mut self) {
        if let Some(release) = self.release {
            unsafe { release(self) };
            self.release = None;
        }
    }

    /// Shallow copy of a caller-owned array whose release does nothing, so the
    /// engine can import it without taking ownership. Children and buffers are
    /// still the caller's.
    pub(crate) fn borrowed_view(&self) -> FfiArray {
        FfiArray {
            length: self.length,
            null_count: self.null_count,
            offset: self.offset,
            n_buffers: self.n_buffers,
            n_children: self.n_children,
            buffers: self.buffers,
            children: self.children,
            dictionary: self.dictionary,
            release: Some(release_borrowed),
            private_data: ptr::null_mut(),
        }
    }
}

unsafe extern "C" fn release_borrowed(array: *mut FfiArray) {
    if let Some(array) = unsafe { array.as_mut() } {
        array.release = None;
    }
}
