//! Identifier types
//!
//! - DescriptorId: names a registered node descriptor
//! - NodeIdentity: identifies one live node for cycle detection

use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::fmt;

/// Identifier of a registered node descriptor
///
/// Usually a `&'static str` chosen by the embedding application
/// (`"buffer"`, `"memline"`, ...), but owned names are accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DescriptorId(Cow<'static, str>);

impl DescriptorId {
    /// Create an id from a static name
    pub const fn new(name: &'static str) -> Self {
        DescriptorId(Cow::Borrowed(name))
    }

    /// The id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DescriptorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for DescriptorId {
    fn from(name: &'static str) -> Self {
        DescriptorId(Cow::Borrowed(name))
    }
}

impl From<String> for DescriptorId {
    fn from(name: String) -> Self {
        DescriptorId(Cow::Owned(name))
    }
}

/// Identity of a live node: its address plus its concrete Rust type
///
/// The address alone is not enough: a struct and its first field share an
/// address but never a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeIdentity {
    addr: usize,
    type_id: TypeId,
}

impl NodeIdentity {
    /// Identity of the value behind a type-erased reference
    pub fn of(data: &(dyn Any + 'static)) -> Self {
        NodeIdentity {
            addr: data as *const dyn Any as *const () as usize,
            type_id: Any::type_id(data),
        }
    }

    /// Address of the node
    pub fn addr(&self) -> usize {
        self.addr
    }

    /// Concrete Rust type of the node
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }
}
