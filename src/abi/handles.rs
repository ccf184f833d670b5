//! Opaque integer handles for objects that live on the engine side.
//!
//! Handles come from one process-wide counter shared by every table, so values
//! are never reused and a plan handle can never resolve as a frame. 0 is never
//! issued and means "no handle" at the boundary.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use planbridge_core::{BridgeError, Result};

static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

pub(crate) struct HandleTable<T> {
    kind: &'static str,
    entries: RwLock<HashMap<u64, Arc<T>>>,
}

impl<T> HandleTable<T> {
    pub(crate) fn new(kind: &'static str) -> Self {
        HandleTable {
            kind,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub(crate) fn insert(&self, value: T) -> u64 {
        let handle = NEXT_HANDLE.fetch_add(1, Ordering::Relaxed);
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(handle, Arc::new(value));
        tracing::debug!(handle, kind = self.kind, "handle created");
        handle
    }

    /// Resolve a live handle. Unknown and freed handles are InvalidArgument.
    pub(crate) fn get(&self, handle: u64) -> Result<Arc<T>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&handle)
            .cloned()
            .ok_or_else(|| {
                BridgeError::InvalidArgument(format!(
                    "unknown or freed {} handle {handle}",
                    self.kind
                ))
            })
    }

    /// Drop the table's reference. Freeing an unknown or already-freed handle
    /// is a no-op. Calls still holding the object finish normally.
    pub(crate) fn remove(&self, handle: u64) -> bool {
        let removed = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&handle)
            .is_some();
        if removed {
            tracing::debug!(handle, kind = self.kind, "handle freed");
        } else {
            tracing::debug!(handle, kind = self.kind, "free of unknown or freed handle ignored");
        }
        removed
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
