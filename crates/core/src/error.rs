//! Error types for snapview
//!
//! Structural errors (descriptor setup, layout configuration) and I/O
//! failures are returned to the caller and abort the single snapshot request.
//! Per-field and per-node faults are not errors: the traversal absorbs them
//! as in-band markers (see [`crate::render::markers`]).
//!
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use crate::types::DescriptorId;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for snapview operations
pub type Result<T> = std::result::Result<T, Error>;

/// Why an I/O operation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoReason {
    /// The destination (or its directory) could not be created or opened
    CannotOpen,
    /// The destination was opened but writing to it failed
    WriteFailed,
}

impl fmt::Display for IoReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IoReason::CannotOpen => f.write_str("cannot_open"),
            IoReason::WriteFailed => f.write_str("write_failed"),
        }
    }
}

/// Error types for snapview
#[derive(Debug, Error)]
pub enum Error {
    /// A descriptor with this id is already registered
    #[error("Duplicate descriptor: {0}")]
    DuplicateDescriptor(DescriptorId),

    /// A descriptor id is not registered
    #[error("Unknown descriptor: {id}{}", .referenced_by.as_ref().map(|r| format!(" (referenced by {})", r)).unwrap_or_default())]
    UnknownDescriptor {
        /// The missing id
        id: DescriptorId,
        /// Descriptor whose child spec points at the missing id
        referenced_by: Option<DescriptorId>,
    },

    /// A descriptor failed validation when it was built
    #[error("Invalid descriptor {id}: {reason}")]
    InvalidDescriptor {
        /// Descriptor being built
        id: DescriptorId,
        /// What is wrong with it
        reason: String,
    },

    /// More panels than one composed row allows
    #[error("Too many panels: {count} (max {max})")]
    TooManyPanels {
        /// Panels supplied
        count: usize,
        /// Panels allowed per row
        max: usize,
    },

    /// Traversal limits are unusable
    #[error("Invalid limits: {0}")]
    InvalidLimits(String),

    /// I/O failure writing a snapshot
    #[error("I/O error ({reason}) at {}: {source}", .path.display())]
    Io {
        /// Which stage failed
        reason: IoReason,
        /// File or directory involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Configuration could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Build an `Io` error with `CannotOpen`
    pub fn cannot_open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            reason: IoReason::CannotOpen,
            path: path.into(),
            source,
        }
    }

    /// Build an `Io` error with `WriteFailed`
    pub fn write_failed(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            reason: IoReason::WriteFailed,
            path: path.into(),
            source,
        }
    }

    /// The I/O reason, if this is an I/O error
    pub fn io_reason(&self) -> Option<IoReason> {
        match self {
            Error::Io { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}
