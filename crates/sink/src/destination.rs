//! Snapshot destinations
//!
//! A destination names two files under its directory:
//!
//! ```text
//! <dir>/<base>.log        latest page, replaced on every write
//! <dir>/<base>_hist.log   "# <seq>" tagged records (AppendHistory only)
//! ```
//!
//! The sequence counter starts at 0 and moves forward by one after every
//! successful write. It is never reset; a failed write leaves it unchanged.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Extension of destination files
pub const LOG_EXTENSION: &str = "log";

/// Suffix appended to the base name for the history file
pub const HISTORY_SUFFIX: &str = "_hist";

/// How a destination persists pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotMode {
    /// Replace the latest file only
    #[default]
    Overwrite,
    /// Replace the latest file and append a numbered record to the history
    AppendHistory,
}

/// A named, versioned output target owned by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotDestination {
    dir: PathBuf,
    base_name: String,
    mode: SnapshotMode,
    sequence: u64,
    create_dirs: bool,
}

impl SnapshotDestination {
    /// Create a destination with sequence 0
    pub fn new(dir: impl Into<PathBuf>, base_name: impl Into<String>, mode: SnapshotMode) -> Self {
        SnapshotDestination {
            dir: dir.into(),
            base_name: base_name.into(),
            mode,
            sequence: 0,
            create_dirs: true,
        }
    }

    /// Destination that only replaces its latest file
    pub fn overwrite(dir: impl Into<PathBuf>, base_name: impl Into<String>) -> Self {
        Self::new(dir, base_name, SnapshotMode::Overwrite)
    }

    /// Destination that also keeps a history file
    pub fn append_history(dir: impl Into<PathBuf>, base_name: impl Into<String>) -> Self {
        Self::new(dir, base_name, SnapshotMode::AppendHistory)
    }

    /// Whether missing directories are created on write (default: true)
    pub fn with_create_dirs(mut self, create_dirs: bool) -> Self {
        self.create_dirs = create_dirs;
        self
    }

    /// Output directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Base file name
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// Write mode
    pub fn mode(&self) -> SnapshotMode {
        self.mode
    }

    /// Sequence number the next successful write will use
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Whether missing directories are created on write
    pub fn create_dirs(&self) -> bool {
        self.create_dirs
    }

    /// Path of the latest file
    pub fn latest_path(&self) -> PathBuf {
        self.dir
            .join(format!("{}.{}", self.base_name, LOG_EXTENSION))
    }

    /// Path of the history file
    pub fn history_path(&self) -> PathBuf {
        self.dir.join(format!(
            "{}{}.{}",
            self.base_name, HISTORY_SUFFIX, LOG_EXTENSION
        ))
    }

    pub(crate) fn advance(&mut self) {
        self.sequence += 1;
    }
}
