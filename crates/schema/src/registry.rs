//! Descriptor registry
//!
//! The registry maps descriptor ids (and Rust types) to the descriptors the
//! traversal uses. It is filled once at startup and then shared read-only:
//! once wrapped in an `Arc` and handed to the snapshot engine it cannot be
//! mutated again.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let mut registry = DescriptorRegistry::new();
//!
//! // Register descriptors, in any order
//! registry.register(buffer_descriptor()?)?;
//! registry.register(memline_descriptor()?)?;
//!
//! // Every child reference must resolve before the first traversal
//! registry.validate()?;
//!
//! // Look up by id
//! let desc = registry.describe(&DescriptorId::new("buffer"))?;
//! ```

use crate::descriptor::{ChildTarget, NodeDescriptor};
use snapview_core::{DescriptorId, Error, Result};
use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use tracing::{debug, warn};

/// Registry of node descriptors
///
/// Maintains mappings from:
/// - Descriptor id -> Descriptor
/// - Rust type -> first descriptor registered for it (for dynamic children)
pub struct DescriptorRegistry {
    /// Descriptors by id
    descriptors: HashMap<DescriptorId, NodeDescriptor>,
    /// Rust type -> default descriptor id
    by_rust_type: HashMap<TypeId, DescriptorId>,
    /// Registration order, for deterministic validation and listing
    order: Vec<DescriptorId>,
}

impl DescriptorRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        DescriptorRegistry {
            descriptors: HashMap::new(),
            by_rust_type: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register a descriptor
    ///
    /// Fails with `DuplicateDescriptor` if the id is taken; the existing
    /// descriptor stays in place untouched. Child references are not checked
    /// here because descriptors may be registered in any order.
    pub fn register(&mut self, descriptor: NodeDescriptor) -> Result<()> {
        let id = descriptor.id().clone();
        if self.descriptors.contains_key(&id) {
            warn!(target: "snapview::registry", descriptor = %id, "Duplicate descriptor rejected");
            return Err(Error::DuplicateDescriptor(id));
        }

        self.by_rust_type
            .entry(descriptor.rust_type())
            .or_insert_with(|| id.clone());

        debug!(
            target: "snapview::registry",
            descriptor = %id,
            rust_type = descriptor.type_name(),
            fields = descriptor.fields().len(),
            children = descriptor.children().len(),
            "Descriptor registered"
        );

        self.order.push(id.clone());
        self.descriptors.insert(id, descriptor);
        Ok(())
    }

    /// Get a descriptor by id, or `UnknownDescriptor`
    pub fn describe(&self, id: &DescriptorId) -> Result<&NodeDescriptor> {
        self.descriptors
            .get(id)
            .ok_or_else(|| Error::UnknownDescriptor {
                id: id.clone(),
                referenced_by: None,
            })
    }

    /// Get a descriptor by id
    pub fn get(&self, id: &DescriptorId) -> Option<&NodeDescriptor> {
        self.descriptors.get(id)
    }

    /// Default descriptor for a Rust type
    pub fn describe_type(&self, rust_type: TypeId) -> Option<&NodeDescriptor> {
        self.by_rust_type
            .get(&rust_type)
            .and_then(|id| self.descriptors.get(id))
    }

    /// Default descriptor for the concrete type of a live node
    pub fn describe_node(&self, node: &(dyn Any + 'static)) -> Option<&NodeDescriptor> {
        self.describe_type(Any::type_id(node))
    }

    /// Check that every `Named` child reference resolves
    pub fn validate(&self) -> Result<()> {
        for id in &self.order {
            if let Some(descriptor) = self.descriptors.get(id) {
                self.check_references(descriptor)?;
            }
        }
        Ok(())
    }

    /// Check the descriptors reachable from `root` through `Named` references
    ///
    /// Dynamic children are resolved per node at traversal time and are not
    /// part of this check.
    pub fn validate_from(&self, root: &DescriptorId) -> Result<()> {
        let mut seen: HashSet<&DescriptorId> = HashSet::new();
        let mut queue: VecDeque<&NodeDescriptor> = VecDeque::new();
        queue.push_back(self.describe(root)?);
        seen.insert(root);

        while let Some(descriptor) = queue.pop_front() {
            self.check_references(descriptor)?;
            for target in descriptor.referenced_ids() {
                if seen.insert(target) {
                    if let Some(next) = self.descriptors.get(target) {
                        queue.push_back(next);
                    }
                }
            }
        }
        Ok(())
    }

    fn check_references(&self, descriptor: &NodeDescriptor) -> Result<()> {
        for child in descriptor.children() {
            if let ChildTarget::Named(target) = child.target() {
                if !self.descriptors.contains_key(target) {
                    warn!(
                        target: "snapview::registry",
                        descriptor = %descriptor.id(),
                        child = child.label(),
                        missing = %target,
                        "Unresolved child descriptor"
                    );
                    return Err(Error::UnknownDescriptor {
                        id: target.clone(),
                        referenced_by: Some(descriptor.id().clone()),
                    });
                }
            }
        }
        Ok(())
    }

    /// Check if a descriptor id is registered
    pub fn is_registered(&self, id: &DescriptorId) -> bool {
        self.descriptors.contains_key(id)
    }

    /// Registered ids in registration order
    pub fn ids(&self) -> &[DescriptorId] {
        &self.order
    }

    /// Get the number of registered descriptors
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl Default for DescriptorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DescriptorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DescriptorRegistry")
            .field("descriptor_count", &self.descriptors.len())
            .field("ids", &self.order)
            .field("rust_type_count", &self.by_rust_type.len())
            .finish()
    }
}
