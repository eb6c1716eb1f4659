//! Snapshot sink for snapview
//!
//! Persists composed pages to disk:
//! - SnapshotDestination: caller-owned target with its own sequence counter
//! - SnapshotSink: overwrite-latest and append-history writes
//! - RawCapture: numbered raw byte captures
//! - SharedDestination: a destination behind a mutex for multi-threaded callers
//!
//! Writes are synchronous and local; a slow filesystem stalls the caller.
//! Nothing is retried.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod capture;
pub mod destination;
pub mod shared;
pub mod writer;

pub use capture::RawCapture;
pub use destination::{SnapshotDestination, SnapshotMode, HISTORY_SUFFIX, LOG_EXTENSION};
pub use shared::SharedDestination;
pub use writer::SnapshotSink;
