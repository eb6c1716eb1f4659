//! Snapshot engine for snapview
//!
//! This crate ties the pieces together:
//! - Traverser: bounded, cycle-safe walk from a root node to rendered lines
//! - Snapshotter: traverse -> compose -> write, driven by a SnapviewConfig
//! - SnapviewConfig: limits, rendering, layout and sink settings from TOML

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod snapshot;
pub mod traverse;

pub use config::{RenderConfig, SinkConfig, SnapviewConfig, CONFIG_FILE_NAME};
pub use snapshot::{SnapshotRequest, Snapshotter};
pub use traverse::{
    RenderedNode, TraversalStats, Traverser, DEFAULT_HEADER_WIDTH, DEFAULT_INDENT_STEP,
    REMAINDER_SCAN_LIMIT,
};
