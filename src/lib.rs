//! snapview - bounded, cycle-safe snapshots of live object graphs
//!
//! An application registers one descriptor per structural type at startup.
//! Later it asks for a snapshot of any live root: the engine walks the
//! declared fields and children within configurable limits, renders every
//! value as text, lays one or more trees out side by side in boxed panels
//! and writes the page to a versioned destination on disk.
//!
//! # Quick Start
//!
//! ```ignore
//! use snapview::{
//!     DescriptorRegistry, Node, NodeDescriptor, SnapshotDestination, Snapshotter,
//!     SnapviewConfig, Value,
//! };
//! use std::sync::Arc;
//!
//! const FLAGS: &[&str] = &["A", "B", "C"];
//!
//! let mut registry = DescriptorRegistry::new();
//! registry.register(
//!     NodeDescriptor::builder::<Record>("record")
//!         .field("id", |r| r.id)
//!         .field("flags", |r| Value::flags(r.flags, FLAGS))
//!         .build()?,
//! )?;
//!
//! let snapshotter = Snapshotter::new(Arc::new(registry), SnapviewConfig::default())?;
//! let mut dest = SnapshotDestination::append_history("keilog", "record");
//! let limits = *snapshotter.default_limits();
//! snapshotter.snapshot(Node::from_ref(&record), &"record".into(), &mut dest, &limits)?;
//! ```
//!
//! # Architecture
//!
//! - `snapview-core`: values, the field renderer, limits and errors
//! - `snapview-schema`: node descriptors and the registry
//! - `snapview-layout`: boxed panel composition and hex dumps
//! - `snapview-sink`: latest/history files and raw captures
//! - `snapview-engine`: traversal, the snapshot API and configuration

pub use snapview_core::{
    markers, render, BoundedStr, DescriptorId, Error, FieldRenderer, FlagSet, IoReason,
    NodeIdentity, Result, TraversalLimits, Value, HARD_MAX_DEPTH, MAX_STRING_SCAN,
};
pub use snapview_engine::*;
pub use snapview_layout::{compose, HexDump, LayoutComposer, LayoutOptions, Panel};
pub use snapview_schema::{
    ChildKind, ChildSpec, ChildTarget, Children, DescriptorBuilder, DescriptorRegistry,
    FieldSpec, Node, NodeDescriptor,
};
pub use snapview_sink::{
    RawCapture, SharedDestination, SnapshotDestination, SnapshotMode, SnapshotSink,
};
