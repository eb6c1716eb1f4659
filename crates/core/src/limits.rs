//! Traversal limits
//!
//! Limits bound every traversal in depth, breadth and total work. They are
//! the only termination mechanism: there is no mid-traversal cancellation,
//! so a traversal over any input graph (cyclic, corrupted, or just huge)
//! finishes after at most `max_total_nodes` visited nodes.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Hard ceiling for `max_depth`; the traversal recurses once per level.
pub const HARD_MAX_DEPTH: usize = 256;

/// Limits applied to one traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TraversalLimits {
    /// Deepest level whose children are still expanded (root is level 0)
    pub max_depth: usize,

    /// Entries shown per list child before the "more" summary
    pub max_children_per_list: usize,

    /// Nodes visited across the whole traversal
    pub max_total_nodes: usize,
}

impl Default for TraversalLimits {
    fn default() -> Self {
        TraversalLimits {
            max_depth: 8,
            max_children_per_list: 5,
            max_total_nodes: 1024,
        }
    }
}

impl TraversalLimits {
    /// Override the depth limit
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Override the per-list breadth limit
    pub fn max_children_per_list(mut self, max_children_per_list: usize) -> Self {
        self.max_children_per_list = max_children_per_list;
        self
    }

    /// Override the total node budget
    pub fn max_total_nodes(mut self, max_total_nodes: usize) -> Self {
        self.max_total_nodes = max_total_nodes;
        self
    }

    /// Check the limits before use
    ///
    /// A zero node budget would not even visit the root, and depths beyond
    /// [`HARD_MAX_DEPTH`] could exhaust the stack.
    pub fn validate(&self) -> Result<()> {
        if self.max_total_nodes == 0 {
            return Err(Error::InvalidLimits(
                "max_total_nodes must be at least 1".to_string(),
            ));
        }
        if self.max_depth > HARD_MAX_DEPTH {
            return Err(Error::InvalidLimits(format!(
                "max_depth {} exceeds the hard maximum {}",
                self.max_depth, HARD_MAX_DEPTH
            )));
        }
        Ok(())
    }
}
