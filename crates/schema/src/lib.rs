//! Node descriptors for snapview
//!
//! This crate describes how live data structures are read:
//! - Node / Children: type-erased handles to live nodes and lazy child sequences
//! - NodeDescriptor: ordered fields and child accessors for one structural type
//! - DescriptorRegistry: id -> descriptor lookup, validated before traversal

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod descriptor;
pub mod node;
pub mod registry;

pub use descriptor::{
    child_accessor, field_accessor, ChildAccessor, ChildKind, ChildSpec, ChildTarget,
    DescriptorBuilder, FieldAccessor, FieldSpec, NodeDescriptor,
};
pub use node::{Children, Node};
pub use registry::DescriptorRegistry;
