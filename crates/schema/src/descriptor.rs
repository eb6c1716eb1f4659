//! Node descriptors
//!
//! A [`NodeDescriptor`] declares, for one structural type, the ordered fields
//! to capture and the ordered child accessors to follow. Descriptors are
//! built once with the typed [`DescriptorBuilder`] and never change after
//! registration.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let memline = NodeDescriptor::builder::<MemLine>("memline")
//!     .field("ml_line_count", |ml| ml.line_count)
//!     .field("ml_flags", |ml| Value::flags(ml.flags, ML_FLAGS))
//!     .nested("ml_mfp", "memfile", |ml| ml.memfile.as_ref().map(Node::from_ref))
//!     .list("ml_stack", "infoptr", |ml| Children::slice(&ml.stack))
//!     .build()?;
//! ```
//!
//! The builder closures receive `&T`. Internally every accessor is stored
//! type-erased and checks the node's type before reading it; a node of the
//! wrong type makes the accessor report nothing instead of misreading memory.

use crate::node::{Children, Node};
use snapview_core::{DescriptorId, Error, Result, Value};
use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Type-erased field accessor
pub type FieldAccessor = Arc<dyn Fn(&(dyn Any + 'static)) -> Option<Value> + Send + Sync>;

/// Type-erased child accessor
pub type ChildAccessor =
    Arc<dyn for<'a> Fn(&'a (dyn Any + 'static)) -> Option<Children<'a>> + Send + Sync>;

/// Wrap a closure as a [`FieldAccessor`]
pub fn field_accessor<F>(f: F) -> FieldAccessor
where
    F: Fn(&(dyn Any + 'static)) -> Option<Value> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wrap a closure as a [`ChildAccessor`]
pub fn child_accessor<F>(f: F) -> ChildAccessor
where
    F: for<'a> Fn(&'a (dyn Any + 'static)) -> Option<Children<'a>> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// One labelled field of a descriptor
#[derive(Clone)]
pub struct FieldSpec {
    label: Cow<'static, str>,
    accessor: FieldAccessor,
}

impl FieldSpec {
    /// Create a field spec
    pub fn new(label: impl Into<Cow<'static, str>>, accessor: FieldAccessor) -> Self {
        FieldSpec {
            label: label.into(),
            accessor,
        }
    }

    /// The field label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Capture the field from a node; `None` if the accessor cannot produce it
    pub fn read(&self, node: &(dyn Any + 'static)) -> Option<Value> {
        (self.accessor)(node)
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Shape of a child accessor's result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildKind {
    /// At most one nested struct
    Nested,
    /// Peer entries; `display_cap` bounds output independently of the
    /// traversal limits
    List {
        /// Entries shown at most, regardless of limits
        display_cap: Option<usize>,
    },
}

/// Which descriptor renders the children
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildTarget {
    /// A fixed descriptor
    Named(DescriptorId),
    /// Resolved per child from its concrete Rust type
    Dynamic,
}

/// One labelled child accessor of a descriptor
#[derive(Clone)]
pub struct ChildSpec {
    label: Cow<'static, str>,
    target: ChildTarget,
    kind: ChildKind,
    accessor: ChildAccessor,
}

impl ChildSpec {
    /// Create a child spec
    pub fn new(
        label: impl Into<Cow<'static, str>>,
        target: ChildTarget,
        kind: ChildKind,
        accessor: ChildAccessor,
    ) -> Self {
        ChildSpec {
            label: label.into(),
            target,
            kind,
            accessor,
        }
    }

    /// The child label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Descriptor target of the children
    pub fn target(&self) -> &ChildTarget {
        &self.target
    }

    /// Nested or list
    pub fn kind(&self) -> ChildKind {
        self.kind
    }

    /// Fetch the children of a node; `None` if the accessor cannot produce them
    pub fn read<'a>(&self, node: &'a (dyn Any + 'static)) -> Option<Children<'a>> {
        (self.accessor)(node)
    }
}

impl fmt::Debug for ChildSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildSpec")
            .field("label", &self.label)
            .field("target", &self.target)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Schema for one structural type
#[derive(Clone)]
pub struct NodeDescriptor {
    id: DescriptorId,
    rust_type: TypeId,
    type_name: &'static str,
    fields: Vec<FieldSpec>,
    children: Vec<ChildSpec>,
}

impl NodeDescriptor {
    /// Start a typed descriptor for nodes of type `T`
    pub fn builder<T: Any>(id: impl Into<DescriptorId>) -> DescriptorBuilder<T> {
        DescriptorBuilder {
            id: id.into(),
            fields: Vec::new(),
            children: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Assemble a descriptor from already type-erased parts
    ///
    /// Validates labels the same way [`DescriptorBuilder::build`] does.
    pub fn from_parts(
        id: impl Into<DescriptorId>,
        rust_type: TypeId,
        type_name: &'static str,
        fields: Vec<FieldSpec>,
        children: Vec<ChildSpec>,
    ) -> Result<Self> {
        let descriptor = NodeDescriptor {
            id: id.into(),
            rust_type,
            type_name,
            fields,
            children,
        };
        descriptor.check_labels()?;
        Ok(descriptor)
    }

    /// Descriptor id
    pub fn id(&self) -> &DescriptorId {
        &self.id
    }

    /// Rust type this descriptor reads
    pub fn rust_type(&self) -> TypeId {
        self.rust_type
    }

    /// Name of the Rust type this descriptor reads
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Fields in declared order
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Child specs in declared order
    pub fn children(&self) -> &[ChildSpec] {
        &self.children
    }

    /// Whether a node has the type this descriptor reads
    pub fn accepts(&self, node: &(dyn Any + 'static)) -> bool {
        Any::type_id(node) == self.rust_type
    }

    /// Descriptor ids referenced by `Named` child specs, in declared order
    pub fn referenced_ids(&self) -> impl Iterator<Item = &DescriptorId> {
        self.children.iter().filter_map(|c| match &c.target {
            ChildTarget::Named(id) => Some(id),
            ChildTarget::Dynamic => None,
        })
    }

    fn check_labels(&self) -> Result<()> {
        if self.id.as_str().is_empty() {
            return Err(self.invalid("descriptor id is empty".to_string()));
        }
        let mut seen = HashSet::new();
        let labels = self
            .fields
            .iter()
            .map(FieldSpec::label)
            .chain(self.children.iter().map(ChildSpec::label));
        for label in labels {
            if label.is_empty() {
                return Err(self.invalid("empty label".to_string()));
            }
            if !seen.insert(label) {
                return Err(self.invalid(format!("duplicate label '{}'", label)));
            }
        }
        for child in &self.children {
            if let ChildTarget::Named(target) = &child.target {
                if target.as_str().is_empty() {
                    return Err(self.invalid(format!(
                        "child '{}' targets an empty descriptor id",
                        child.label
                    )));
                }
            }
        }
        Ok(())
    }

    fn invalid(&self, reason: String) -> Error {
        Error::InvalidDescriptor {
            id: self.id.clone(),
            reason,
        }
    }
}

impl fmt::Debug for NodeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeDescriptor")
            .field("id", &self.id)
            .field("type_name", &self.type_name)
            .field("fields", &self.fields)
            .field("children", &self.children)
            .finish()
    }
}

/// Typed builder for [`NodeDescriptor`]
pub struct DescriptorBuilder<T> {
    id: DescriptorId,
    fields: Vec<FieldSpec>,
    children: Vec<ChildSpec>,
    _marker: PhantomData<fn(&T)>,
}

impl<T: Any> DescriptorBuilder<T> {
    /// Add a field that always has a value
    pub fn field<V, F>(mut self, label: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        V: Into<Value>,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        let accessor = field_accessor(move |node| node.downcast_ref::<T>().map(|t| f(t).into()));
        self.fields.push(FieldSpec::new(label, accessor));
        self
    }

    /// Add a field whose accessor may fail (renders `<unavailable>` on `None`)
    pub fn try_field<F>(mut self, label: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: Fn(&T) -> Option<Value> + Send + Sync + 'static,
    {
        let accessor = field_accessor(move |node| node.downcast_ref::<T>().and_then(|t| f(t)));
        self.fields.push(FieldSpec::new(label, accessor));
        self
    }

    /// Add one nested child rendered by descriptor `target`
    ///
    /// Returning `None` renders the child as `null`.
    pub fn nested<F>(
        self,
        label: impl Into<Cow<'static, str>>,
        target: impl Into<DescriptorId>,
        f: F,
    ) -> Self
    where
        F: for<'a> Fn(&'a T) -> Option<Node<'a>> + Send + Sync + 'static,
    {
        self.nested_to(label, ChildTarget::Named(target.into()), f)
    }

    /// Add one nested child whose descriptor follows its runtime type
    pub fn nested_dynamic<F>(self, label: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> Option<Node<'a>> + Send + Sync + 'static,
    {
        self.nested_to(label, ChildTarget::Dynamic, f)
    }

    /// Add a list of peer children rendered by descriptor `target`
    pub fn list<F>(
        self,
        label: impl Into<Cow<'static, str>>,
        target: impl Into<DescriptorId>,
        f: F,
    ) -> Self
    where
        F: for<'a> Fn(&'a T) -> Children<'a> + Send + Sync + 'static,
    {
        self.list_to(label, ChildTarget::Named(target.into()), None, f)
    }

    /// Add a list that never shows more than `display_cap` entries
    pub fn list_capped<F>(
        self,
        label: impl Into<Cow<'static, str>>,
        target: impl Into<DescriptorId>,
        display_cap: usize,
        f: F,
    ) -> Self
    where
        F: for<'a> Fn(&'a T) -> Children<'a> + Send + Sync + 'static,
    {
        self.list_to(label, ChildTarget::Named(target.into()), Some(display_cap), f)
    }

    /// Add a list whose entries are each rendered by their runtime type
    pub fn list_dynamic<F>(self, label: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> Children<'a> + Send + Sync + 'static,
    {
        self.list_to(label, ChildTarget::Dynamic, None, f)
    }

    /// Add a child spec with full control over target, kind and failure
    ///
    /// Returning `None` from `f` renders `<unavailable>` for the child.
    pub fn child<F>(
        mut self,
        label: impl Into<Cow<'static, str>>,
        target: ChildTarget,
        kind: ChildKind,
        f: F,
    ) -> Self
    where
        F: for<'a> Fn(&'a T) -> Option<Children<'a>> + Send + Sync + 'static,
    {
        let accessor = child_accessor(move |node| node.downcast_ref::<T>().and_then(|t| f(t)));
        self.children.push(ChildSpec::new(label, target, kind, accessor));
        self
    }

    /// Validate and finish the descriptor
    pub fn build(self) -> Result<NodeDescriptor> {
        NodeDescriptor::from_parts(
            self.id,
            TypeId::of::<T>(),
            std::any::type_name::<T>(),
            self.fields,
            self.children,
        )
    }

    fn nested_to<F>(self, label: impl Into<Cow<'static, str>>, target: ChildTarget, f: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> Option<Node<'a>> + Send + Sync + 'static,
    {
        self.child(label, target, ChildKind::Nested, move |t| Some(Children::opt(f(t))))
    }

    fn list_to<F>(
        self,
        label: impl Into<Cow<'static, str>>,
        target: ChildTarget,
        display_cap: Option<usize>,
        f: F,
    ) -> Self
    where
        F: for<'a> Fn(&'a T) -> Children<'a> + Send + Sync + 'static,
    {
        self.child(label, target, ChildKind::List { display_cap }, move |t| Some(f(t)))
    }
}
