//! Destinations shared between threads
//!
//! The sink never locks. Callers that snapshot from several threads wrap the
//! destination here so each write holds the lock for its whole duration and
//! sequence numbers stay in order.

use crate::destination::SnapshotDestination;
use crate::writer::SnapshotSink;
use parking_lot::Mutex;
use snapview_core::Result;
use std::path::PathBuf;
use std::sync::Arc;

/// A destination behind `Arc<Mutex<_>>`
#[derive(Debug, Clone)]
pub struct SharedDestination {
    inner: Arc<Mutex<SnapshotDestination>>,
}

impl SharedDestination {
    /// Wrap a destination
    pub fn new(destination: SnapshotDestination) -> Self {
        SharedDestination {
            inner: Arc::new(Mutex::new(destination)),
        }
    }

    /// Write `text` while holding the lock
    pub fn write(&self, text: &str) -> Result<PathBuf> {
        let mut destination = self.inner.lock();
        SnapshotSink::write(&mut destination, text)
    }

    /// Run `f` with exclusive access to the destination
    pub fn with<R>(&self, f: impl FnOnce(&mut SnapshotDestination) -> R) -> R {
        let mut destination = self.inner.lock();
        f(&mut destination)
    }

    /// Current sequence number
    pub fn sequence(&self) -> u64 {
        self.inner.lock().sequence()
    }
}
