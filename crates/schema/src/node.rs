//! Handles to live nodes and their child sequences
//!
//! A [`Node`] is a type-erased view of one live value. It either borrows the
//! value (plain nested structs) or holds a shared pointer to it (linked or
//! shared graphs built from `Rc`/`Arc`), so both shapes can be walked with the
//! same descriptors.
//!
//! [`Children`] is the lazily evaluated sequence a child accessor returns. The
//! traversal only pulls as many entries as it is going to show, so a list of
//! a million entries, or a linked list that loops back on itself, costs no
//! more than the display limit.

use snapview_core::NodeIdentity;
use std::any::Any;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// A type-erased handle to one live node
///
/// Cloning shares the same data; it never copies the node.
#[derive(Clone)]
pub enum Node<'a> {
    /// Borrowed from the parent node
    Ref(&'a (dyn Any + 'static)),
    /// Shared single-threaded ownership
    Rc(Rc<dyn Any>),
    /// Shared thread-safe ownership
    Arc(Arc<dyn Any + Send + Sync>),
}

impl<'a> Node<'a> {
    /// Borrow a node
    pub fn from_ref<T: Any>(value: &'a T) -> Self {
        Node::Ref(value)
    }

    /// Share a reference-counted node
    pub fn from_rc<T: Any>(value: Rc<T>) -> Self {
        Node::Rc(value)
    }

    /// Share an atomically reference-counted node
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Node::Arc(value)
    }

    /// The node's data
    pub fn data(&self) -> &(dyn Any + 'static) {
        match self {
            Node::Ref(value) => *value,
            Node::Rc(value) => &**value,
            Node::Arc(value) => &**value,
        }
    }

    /// Identity used for cycle detection
    pub fn identity(&self) -> NodeIdentity {
        NodeIdentity::of(self.data())
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Node::Ref(_) => "Ref",
            Node::Rc(_) => "Rc",
            Node::Arc(_) => "Arc",
        };
        f.debug_struct("Node")
            .field("kind", &kind)
            .field("addr", &format!("{:#x}", self.identity().addr()))
            .finish()
    }
}

/// Ordered child nodes returned by a child accessor
///
/// `total` is the real number of children when the accessor knows it
/// cheaply; linked structures leave it unknown.
pub struct Children<'a> {
    total: Option<usize>,
    iter: Box<dyn Iterator<Item = Node<'a>> + 'a>,
}

impl<'a> Children<'a> {
    /// No children
    pub fn none() -> Self {
        Children {
            total: Some(0),
            iter: Box::new(std::iter::empty()),
        }
    }

    /// Exactly one child
    pub fn one(node: Node<'a>) -> Self {
        Children {
            total: Some(1),
            iter: Box::new(std::iter::once(node)),
        }
    }

    /// Zero or one child
    pub fn opt(node: Option<Node<'a>>) -> Self {
        match node {
            Some(node) => Children::one(node),
            None => Children::none(),
        }
    }

    /// Children collected in a vector
    pub fn from_vec(nodes: Vec<Node<'a>>) -> Self {
        Children {
            total: Some(nodes.len()),
            iter: Box::new(nodes.into_iter()),
        }
    }

    /// Children from an iterator that knows its length
    pub fn exact<I>(nodes: I) -> Self
    where
        I: IntoIterator<Item = Node<'a>>,
        I::IntoIter: ExactSizeIterator + 'a,
    {
        let iter = nodes.into_iter();
        Children {
            total: Some(iter.len()),
            iter: Box::new(iter),
        }
    }

    /// Children from an iterator of unknown (possibly unbounded) length
    pub fn streaming<I>(nodes: I) -> Self
    where
        I: IntoIterator<Item = Node<'a>>,
        I::IntoIter: 'a,
    {
        Children {
            total: None,
            iter: Box::new(nodes.into_iter()),
        }
    }

    /// Every element of a slice, borrowed
    pub fn slice<T: Any>(items: &'a [T]) -> Self {
        Children::exact(items.iter().map(Node::from_ref))
    }

    /// A singly linked list of `Rc` nodes, following `next` from `first`
    ///
    /// The length is unknown up front; a list that loops back on itself is
    /// safe because the traversal stops pulling entries at its limits.
    pub fn linked<T, F>(first: Option<Rc<T>>, next: F) -> Self
    where
        T: Any,
        F: Fn(&T) -> Option<Rc<T>> + 'a,
    {
        let chain = std::iter::successors(first, move |node: &Rc<T>| next(node.as_ref()));
        Children::streaming(chain.map(Node::from_rc))
    }

    /// The real number of children, when known
    pub fn total(&self) -> Option<usize> {
        self.total
    }
}

impl<'a> Iterator for Children<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next()
    }
}

impl fmt::Debug for Children<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Children")
            .field("total", &self.total)
            .finish_non_exhaustive()
    }
}
