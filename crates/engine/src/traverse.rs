//! Bounded traversal
//!
//! The [`Traverser`] walks a live node graph along the fields and children its
//! descriptors declare and renders every visited node to text lines:
//!
//! ```text
//! buffer: 0x000055d0c1a2b3c0
//!   b_fnum:           1
//!   b_ml:
//!     ml_line_ct:     3
//!     ml_mfp:
//!       mf_page_size: 4096
//!   b_wininfo: [12]
//!     [0]
//!       wi_fpos:      7
//!     [1]
//!       <cycle detected>
//!     … 10 more (not shown)
//! ```
//!
//! ## Guarantees
//!
//! - Depth, list breadth and the total number of visited nodes are bounded
//!   by [`TraversalLimits`].
//! - Only ancestors on the current path count as cycles; the same node may
//!   appear again under a different branch.
//! - Every accessor runs at most once per node. An accessor that returns
//!   nothing or panics turns into `<unavailable>` for that line only.

use snapview_core::{
    markers, DescriptorId, FieldRenderer, NodeIdentity, Result, TraversalLimits, Value,
};
use snapview_layout::Panel;
use snapview_schema::{
    ChildKind, ChildSpec, ChildTarget, Children, DescriptorRegistry, Node, NodeDescriptor,
};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

/// Column at which field values start, counted from the label
pub const DEFAULT_HEADER_WIDTH: usize = 20;

/// Spaces added per nesting level
pub const DEFAULT_INDENT_STEP: usize = 2;

/// Entries counted past the display limit of a list with unknown length
pub const REMAINDER_SCAN_LIMIT: usize = 1024;

/// Counters collected during one traversal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalStats {
    /// Nodes rendered, including the root
    pub nodes_visited: usize,
    /// Field accessor calls
    pub field_calls: usize,
    /// Child accessor calls
    pub child_calls: usize,
    /// Children replaced by `<cycle detected>`
    pub cycles_broken: usize,
    /// Lists that ended with a "more (not shown)" line
    pub lists_truncated: usize,
    /// Nodes whose children were cut by the depth limit
    pub depth_cutoffs: usize,
    /// Children skipped because the node budget ran out
    pub node_limit_cutoffs: usize,
    /// Fields or children rendered as `<unavailable>`
    pub unavailable: usize,
}

impl TraversalStats {
    /// Total accessor calls
    pub fn accessor_calls(&self) -> usize {
        self.field_calls + self.child_calls
    }

    /// Whether any limit cut the output short
    pub fn was_limited(&self) -> bool {
        self.lists_truncated > 0 || self.depth_cutoffs > 0 || self.node_limit_cutoffs > 0
    }
}

/// Output of one traversal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedNode {
    descriptor: DescriptorId,
    identity: NodeIdentity,
    lines: Vec<String>,
    stats: TraversalStats,
}

impl RenderedNode {
    /// Descriptor the root was rendered with
    pub fn descriptor(&self) -> &DescriptorId {
        &self.descriptor
    }

    /// Identity of the root node
    pub fn identity(&self) -> NodeIdentity {
        self.identity
    }

    /// Rendered lines, header first
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Traversal counters
    pub fn stats(&self) -> &TraversalStats {
        &self.stats
    }

    /// Lines joined with newlines, with a trailing newline
    pub fn to_text(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }

    /// Turn the lines into a named panel
    pub fn into_panel(self, name: impl Into<String>) -> Panel {
        Panel::new(name, self.lines)
    }
}

impl From<RenderedNode> for Panel {
    fn from(node: RenderedNode) -> Panel {
        let name = node.descriptor.to_string();
        node.into_panel(name)
    }
}

/// Walks node graphs through a descriptor registry
#[derive(Debug, Clone)]
pub struct Traverser<'r> {
    registry: &'r DescriptorRegistry,
    renderer: FieldRenderer,
    header_width: usize,
    indent_step: usize,
    max_string_width: Option<usize>,
}

impl<'r> Traverser<'r> {
    /// Create a traverser with default formatting
    pub fn new(registry: &'r DescriptorRegistry) -> Self {
        Traverser {
            registry,
            renderer: FieldRenderer::default(),
            header_width: DEFAULT_HEADER_WIDTH,
            indent_step: DEFAULT_INDENT_STEP,
            max_string_width: None,
        }
    }

    /// Use a custom field renderer
    pub fn with_renderer(mut self, renderer: FieldRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Width of the label column (label plus colon plus padding)
    pub fn with_header_width(mut self, header_width: usize) -> Self {
        self.header_width = header_width;
        self
    }

    /// Spaces per nesting level
    pub fn with_indent_step(mut self, indent_step: usize) -> Self {
        self.indent_step = indent_step;
        self
    }

    /// Cut every string value to at most `width` chars
    pub fn with_max_string_width(mut self, width: Option<usize>) -> Self {
        self.max_string_width = width;
        self
    }

    /// Render `root` with descriptor `id`
    ///
    /// Fails only on setup errors: invalid limits, an unknown root descriptor,
    /// or a reachable child reference that does not resolve. Faults inside the
    /// live graph are rendered as markers.
    pub fn traverse(
        &self,
        root: Node<'_>,
        id: &DescriptorId,
        limits: &TraversalLimits,
    ) -> Result<RenderedNode> {
        limits.validate()?;
        self.registry.validate_from(id)?;
        let descriptor = self.registry.describe(id)?;

        let data = root.data();
        let identity = NodeIdentity::of(data);
        let mut walk = Walk::new(limits);
        let handle = self
            .renderer
            .render(&Value::Handle(identity.addr() as u64), None);
        walk.lines.push(format!("{}: {}", id, handle));

        if descriptor.accepts(data) {
            walk.stats.nodes_visited = 1;
            self.render_body(&mut walk, data, descriptor, 0, 1);
        } else {
            warn!(
                target: "snapview::traverse",
                descriptor = %id,
                expected = descriptor.type_name(),
                "Root node has the wrong type"
            );
            walk.marker(self.indent(1), markers::TYPE_MISMATCH);
        }

        let stats = walk.stats;
        debug!(
            target: "snapview::traverse",
            descriptor = %id,
            lines = walk.lines.len(),
            nodes = stats.nodes_visited,
            accessor_calls = stats.accessor_calls(),
            "Traversal complete"
        );
        if stats.cycles_broken > 0 || stats.was_limited() || stats.unavailable > 0 {
            warn!(
                target: "snapview::traverse",
                descriptor = %id,
                cycles = stats.cycles_broken,
                lists_truncated = stats.lists_truncated,
                depth_cutoffs = stats.depth_cutoffs,
                node_limit_cutoffs = stats.node_limit_cutoffs,
                unavailable = stats.unavailable,
                "Traversal output is partial"
            );
        }

        Ok(RenderedNode {
            descriptor: id.clone(),
            identity,
            lines: walk.lines,
            stats,
        })
    }

    fn render_body(
        &self,
        walk: &mut Walk<'_>,
        data: &(dyn Any + 'static),
        descriptor: &NodeDescriptor,
        depth: usize,
        level: usize,
    ) {
        walk.path.push(NodeIdentity::of(data));

        for field in descriptor.fields() {
            walk.stats.field_calls += 1;
            let value = guarded(field.label(), || field.read(data)).flatten();
            if value.is_none() {
                walk.stats.unavailable += 1;
            }
            let rendered = self
                .renderer
                .render_field(value.as_ref(), self.max_string_width);
            let line = self.field_line(level, field.label(), &rendered);
            walk.lines.push(line);
        }

        if !descriptor.children().is_empty() {
            if depth >= walk.limits.max_depth {
                walk.stats.depth_cutoffs += 1;
                walk.marker(self.indent(level), markers::DEPTH_LIMIT_REACHED);
            } else {
                for child in descriptor.children() {
                    self.render_child(walk, data, child, depth, level);
                }
            }
        }

        walk.path.pop();
    }

    fn render_child(
        &self,
        walk: &mut Walk<'_>,
        data: &(dyn Any + 'static),
        child: &ChildSpec,
        depth: usize,
        level: usize,
    ) {
        let pad = self.indent(level);
        let label = child.label();

        if !walk.budget_left() {
            walk.stats.node_limit_cutoffs += 1;
            walk.lines
                .push(format!("{}{}: {}", pad, label, markers::NODE_LIMIT_REACHED));
            return;
        }

        walk.stats.child_calls += 1;
        let Some(mut children) = guarded(label, || child.read(data)).flatten() else {
            walk.stats.unavailable += 1;
            walk.lines
                .push(format!("{}{}: {}", pad, label, markers::UNAVAILABLE));
            return;
        };

        match child.kind() {
            ChildKind::Nested => match guarded(label, || children.next()) {
                Some(Some(node)) => {
                    walk.lines.push(format!("{}{}:", pad, label));
                    self.visit(walk, &node, child.target(), depth + 1, level + 1);
                }
                Some(None) => walk.lines.push(format!("{}{}: null", pad, label)),
                None => {
                    walk.stats.unavailable += 1;
                    walk.lines
                        .push(format!("{}{}: {}", pad, label, markers::UNAVAILABLE));
                }
            },
            ChildKind::List { display_cap } => {
                self.render_list(walk, children, child, display_cap, depth, level)
            }
        }
    }

    fn render_list(
        &self,
        walk: &mut Walk<'_>,
        mut children: Children<'_>,
        child: &ChildSpec,
        display_cap: Option<usize>,
        depth: usize,
        level: usize,
    ) {
        let label = child.label();
        let count = match children.total() {
            Some(total) => total.to_string(),
            None => "?".to_string(),
        };
        walk.lines
            .push(format!("{}{}: [{}]", self.indent(level), label, count));

        let entry_pad = self.indent(level + 1);
        let limit = match display_cap {
            Some(cap) => cap.min(walk.limits.max_children_per_list),
            None => walk.limits.max_children_per_list,
        };

        let mut shown = 0;
        while shown < limit {
            if !walk.budget_left() {
                walk.stats.node_limit_cutoffs += 1;
                walk.marker(entry_pad, markers::NODE_LIMIT_REACHED);
                return;
            }
            match guarded(label, || children.next()) {
                Some(Some(node)) => {
                    walk.lines.push(format!("{}[{}]", entry_pad, shown));
                    self.visit(walk, &node, child.target(), depth + 1, level + 2);
                    shown += 1;
                }
                Some(None) => return,
                None => {
                    walk.stats.unavailable += 1;
                    walk.marker(entry_pad, markers::UNAVAILABLE);
                    return;
                }
            }
        }

        let summary = match children.total() {
            Some(total) => {
                let rest = total.saturating_sub(shown);
                (rest > 0).then(|| markers::more_not_shown(rest))
            }
            None => match count_remaining(label, &mut children) {
                (0, false) => None,
                (rest, false) => Some(markers::more_not_shown(rest)),
                (rest, true) => Some(markers::at_least_more_not_shown(rest)),
            },
        };
        if let Some(summary) = summary {
            walk.stats.lists_truncated += 1;
            walk.marker(entry_pad, &summary);
        }
    }

    fn visit(
        &self,
        walk: &mut Walk<'_>,
        node: &Node<'_>,
        target: &ChildTarget,
        depth: usize,
        level: usize,
    ) {
        let pad = self.indent(level);
        let data = node.data();

        if walk.path.contains(&node.identity()) {
            walk.stats.cycles_broken += 1;
            debug!(target: "snapview::traverse", depth, "Cycle broken");
            walk.marker(pad, markers::CYCLE_DETECTED);
            return;
        }

        let descriptor = match target {
            ChildTarget::Named(id) => self.registry.get(id),
            ChildTarget::Dynamic => self.registry.describe_node(data),
        };
        let Some(descriptor) = descriptor else {
            walk.stats.unavailable += 1;
            walk.marker(pad, markers::UNAVAILABLE);
            return;
        };
        if !descriptor.accepts(data) {
            walk.stats.unavailable += 1;
            walk.marker(pad, markers::TYPE_MISMATCH);
            return;
        }
        if !walk.budget_left() {
            walk.stats.node_limit_cutoffs += 1;
            walk.marker(pad, markers::NODE_LIMIT_REACHED);
            return;
        }

        walk.stats.nodes_visited += 1;
        self.render_body(walk, data, descriptor, depth, level);
    }

    fn indent(&self, level: usize) -> String {
        " ".repeat(level * self.indent_step)
    }

    fn field_line(&self, level: usize, label: &str, value: &str) -> String {
        let used = label.chars().count() + 1;
        let pad = self.header_width.saturating_sub(used).max(1);
        format!("{}{}:{}{}", self.indent(level), label, " ".repeat(pad), value)
    }
}

/// Mutable state of one traversal
struct Walk<'l> {
    limits: &'l TraversalLimits,
    lines: Vec<String>,
    path: Vec<NodeIdentity>,
    stats: TraversalStats,
}

impl<'l> Walk<'l> {
    fn new(limits: &'l TraversalLimits) -> Self {
        Walk {
            limits,
            lines: Vec::new(),
            path: Vec::new(),
            stats: TraversalStats::default(),
        }
    }

    fn budget_left(&self) -> bool {
        self.stats.nodes_visited < self.limits.max_total_nodes
    }

    fn marker(&mut self, pad: String, marker: &str) {
        let mut line = pad;
        line.push_str(marker);
        self.lines.push(line);
    }
}

/// Run an accessor, turning a panic into `None`
fn guarded<R>(label: &str, f: impl FnOnce() -> R) -> Option<R> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(target: "snapview::traverse", label, "Accessor panicked");
            None
        }
    }
}

/// Count entries left in a list of unknown length
///
/// Returns the count and whether the scan stopped at its bound with entries
/// still coming.
fn count_remaining(label: &str, children: &mut Children<'_>) -> (usize, bool) {
    let mut rest = 0;
    while rest < REMAINDER_SCAN_LIMIT {
        match guarded(label, || children.next()) {
            Some(Some(_)) => rest += 1,
            _ => return (rest, false),
        }
    }
    let more = matches!(guarded(label, || children.next()), Some(Some(_)));
    (rest, more)
}
