//! Snapshot API
//!
//! [`Snapshotter`] is the entry point embedding applications use. It owns a
//! frozen descriptor registry and a [`SnapviewConfig`], and runs one request
//! as traverse -> compose -> write on the caller's thread.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let snapshotter = Snapshotter::new(Arc::new(registry), SnapviewConfig::default())?;
//! let mut dest = snapshotter.destination("buf");
//!
//! // One tree, one panel
//! snapshotter.snapshot(Node::from_ref(&buffer), &"buffer".into(), &mut dest, &limits)?;
//!
//! // Several trees side by side, plus a hex dump
//! let request = SnapshotRequest::new()
//!     .node("buffer", Node::from_ref(&buffer), "buffer")
//!     .node("block", Node::from_rc(block), "block_header")
//!     .panel(HexDump::new().panel("page_data", &page));
//! snapshotter.snapshot_page(&request, &mut dest, &limits)?;
//! ```

use crate::config::SnapviewConfig;
use crate::traverse::{RenderedNode, Traverser};
use snapview_core::{DescriptorId, Result, TraversalLimits};
use snapview_layout::{LayoutComposer, Panel};
use snapview_schema::{DescriptorRegistry, Node};
use snapview_sink::{SnapshotDestination, SnapshotSink};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// One panel source of a page
enum PanelSource<'a> {
    /// A node tree to traverse
    Node {
        name: String,
        root: Node<'a>,
        id: DescriptorId,
    },
    /// Prepared lines
    Panel(Panel),
}

/// Several panels composed side by side into one page
#[derive(Default)]
pub struct SnapshotRequest<'a> {
    sources: Vec<PanelSource<'a>>,
}

impl<'a> SnapshotRequest<'a> {
    /// Empty request
    pub fn new() -> Self {
        SnapshotRequest {
            sources: Vec::new(),
        }
    }

    /// Add a node tree rendered with descriptor `id`
    pub fn node(
        mut self,
        name: impl Into<String>,
        root: Node<'a>,
        id: impl Into<DescriptorId>,
    ) -> Self {
        self.sources.push(PanelSource::Node {
            name: name.into(),
            root,
            id: id.into(),
        });
        self
    }

    /// Add a prepared panel
    pub fn panel(mut self, panel: Panel) -> Self {
        self.sources.push(PanelSource::Panel(panel));
        self
    }

    /// Number of panels
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Whether the request has no panels
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl std::fmt::Debug for SnapshotRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self
            .sources
            .iter()
            .map(|s| match s {
                PanelSource::Node { name, .. } => name.as_str(),
                PanelSource::Panel(panel) => panel.name(),
            })
            .collect();
        f.debug_struct("SnapshotRequest")
            .field("panels", &names)
            .finish()
    }
}

/// Runs snapshot requests against a frozen registry
#[derive(Debug, Clone)]
pub struct Snapshotter {
    registry: Arc<DescriptorRegistry>,
    config: SnapviewConfig,
    composer: LayoutComposer,
}

impl Snapshotter {
    /// Create a snapshotter
    ///
    /// Validates the config and every descriptor reference in the registry.
    pub fn new(registry: Arc<DescriptorRegistry>, config: SnapviewConfig) -> Result<Self> {
        config.validate()?;
        registry.validate()?;
        debug!(
            target: "snapview::snapshot",
            descriptors = registry.len(),
            "Snapshotter ready"
        );
        let composer = LayoutComposer::new(config.layout.clone());
        Ok(Snapshotter {
            registry,
            config,
            composer,
        })
    }

    /// The descriptor registry
    pub fn registry(&self) -> &Arc<DescriptorRegistry> {
        &self.registry
    }

    /// The configuration
    pub fn config(&self) -> &SnapviewConfig {
        &self.config
    }

    /// Limits from the configuration
    pub fn default_limits(&self) -> &TraversalLimits {
        &self.config.limits
    }

    /// A destination built from the `[sink]` section
    pub fn destination(&self, base_name: impl Into<String>) -> SnapshotDestination {
        self.config.sink.destination(base_name)
    }

    /// A traverser configured from the `[render]` section
    pub fn traverser(&self) -> Traverser<'_> {
        let render = &self.config.render;
        Traverser::new(&self.registry)
            .with_renderer(render.renderer())
            .with_header_width(render.header_width)
            .with_indent_step(render.indent_step)
            .with_max_string_width(render.max_string_width)
    }

    /// Render one tree without composing it
    pub fn traverse(
        &self,
        root: Node<'_>,
        id: &DescriptorId,
        limits: &TraversalLimits,
    ) -> Result<RenderedNode> {
        self.traverser().traverse(root, id, limits)
    }

    /// Render one tree as a single-panel page
    pub fn render(
        &self,
        root: Node<'_>,
        id: &DescriptorId,
        limits: &TraversalLimits,
    ) -> Result<String> {
        let rendered = self.traverse(root, id, limits)?;
        self.composer.compose(&[Panel::from(rendered)])
    }

    /// Traverse, compose and write one tree
    pub fn snapshot(
        &self,
        root: Node<'_>,
        id: &DescriptorId,
        destination: &mut SnapshotDestination,
        limits: &TraversalLimits,
    ) -> Result<PathBuf> {
        let page = self.render(root, id, limits)?;
        SnapshotSink::write(destination, &page)
    }

    /// Compose every panel of a request into one page
    ///
    /// Each node tree is traversed with its own budget from `limits`. The
    /// panel count is checked before any traversal runs.
    pub fn render_page(
        &self,
        request: &SnapshotRequest<'_>,
        limits: &TraversalLimits,
    ) -> Result<String> {
        if request.len() > self.composer.options().max_panels {
            return Err(snapview_core::Error::TooManyPanels {
                count: request.len(),
                max: self.composer.options().max_panels,
            });
        }

        let traverser = self.traverser();
        let mut panels = Vec::with_capacity(request.len());
        for source in &request.sources {
            let panel = match source {
                PanelSource::Node { name, root, id } => traverser
                    .traverse(root.clone(), id, limits)?
                    .into_panel(name.clone()),
                PanelSource::Panel(panel) => panel.clone(),
            };
            panels.push(panel);
        }

        debug!(
            target: "snapview::snapshot",
            panels = panels.len(),
            "Page rendered"
        );
        self.composer.compose(&panels)
    }

    /// Compose a request and write it
    pub fn snapshot_page(
        &self,
        request: &SnapshotRequest<'_>,
        destination: &mut SnapshotDestination,
        limits: &TraversalLimits,
    ) -> Result<PathBuf> {
        let page = self.render_page(request, limits)?;
        SnapshotSink::write(destination, &page)
    }
}
