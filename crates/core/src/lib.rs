//! Core types for snapview
//!
//! This crate defines the foundational types used throughout the system:
//! - Value: tagged union of captured field values
//! - FieldRenderer: Value -> display string, plus the in-band markers
//! - DescriptorId / NodeIdentity: naming descriptors and live nodes
//! - TraversalLimits: depth, breadth and total-work bounds
//! - Error: error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod limits;
pub mod render;
pub mod types;
pub mod value;

pub use error::{Error, IoReason, Result};
pub use limits::{TraversalLimits, HARD_MAX_DEPTH};
pub use render::{markers, render, FieldRenderer, DEFAULT_HANDLE_DIGITS};
pub use types::{DescriptorId, NodeIdentity};
pub use value::{BoundedStr, FlagSet, Value, MAX_STRING_SCAN};
