//! Snapshot configuration via `snapview.toml`
//!
//! Every section is optional and falls back to its defaults. Unknown keys are
//! rejected so a typo never silently turns into a default.

use crate::traverse::{DEFAULT_HEADER_WIDTH, DEFAULT_INDENT_STEP};
use serde::{Deserialize, Serialize};
use snapview_core::{Error, FieldRenderer, Result, TraversalLimits, DEFAULT_HANDLE_DIGITS};
use snapview_layout::LayoutOptions;
use snapview_sink::{SnapshotDestination, SnapshotMode};
use std::path::{Path, PathBuf};

/// Conventional config file name
pub const CONFIG_FILE_NAME: &str = "snapview.toml";

/// Line formatting settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Width of the label column
    pub header_width: usize,
    /// Spaces per nesting level
    pub indent_step: usize,
    /// Cut string values to this many chars
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_string_width: Option<usize>,
    /// Appended to strings that were cut
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncation_marker: Option<String>,
    /// Hex digits for handles
    pub handle_digits: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            header_width: DEFAULT_HEADER_WIDTH,
            indent_step: DEFAULT_INDENT_STEP,
            max_string_width: None,
            truncation_marker: None,
            handle_digits: DEFAULT_HANDLE_DIGITS,
        }
    }
}

impl RenderConfig {
    /// Field renderer for these settings
    pub fn renderer(&self) -> FieldRenderer {
        let renderer = FieldRenderer::new().with_handle_digits(self.handle_digits);
        match &self.truncation_marker {
            Some(marker) => renderer.with_truncation_marker(marker.clone()),
            None => renderer,
        }
    }
}

/// Output settings for destinations built from the config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SinkConfig {
    /// Directory snapshots are written to
    pub dir: PathBuf,
    /// Write mode
    pub mode: SnapshotMode,
    /// Create missing directories
    pub create_dirs: bool,
}

impl Default for SinkConfig {
    fn default() -> Self {
        SinkConfig {
            dir: PathBuf::from("snapshots"),
            mode: SnapshotMode::Overwrite,
            create_dirs: true,
        }
    }
}

impl SinkConfig {
    /// A fresh destination named `base_name` under the configured directory
    pub fn destination(&self, base_name: impl Into<String>) -> SnapshotDestination {
        SnapshotDestination::new(&self.dir, base_name, self.mode).with_create_dirs(self.create_dirs)
    }
}

/// Snapshot configuration
///
/// # Example
///
/// ```toml
/// [limits]
/// max_depth = 8
/// max_children_per_list = 5
/// max_total_nodes = 1024
///
/// [render]
/// header_width = 20
///
/// [layout]
/// max_panels = 10
///
/// [sink]
/// dir = "keilog"
/// mode = "append_history"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SnapviewConfig {
    /// Traversal limits used when the caller passes none
    pub limits: TraversalLimits,
    /// Line formatting
    pub render: RenderConfig,
    /// Page composition
    pub layout: LayoutOptions,
    /// Output location and mode
    pub sink: SinkConfig,
}

impl SnapviewConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SnapviewConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{} ({})", msg, path.display())),
            other => other,
        })
    }

    /// Serialize to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Serialize and write to `path`
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = self.to_toml_string()?;
        std::fs::write(path, content).map_err(|e| Error::write_failed(path, e))
    }

    /// Default config file content with comments
    pub fn default_toml() -> &'static str {
        r#"# snapview configuration

[limits]
# Nesting levels below the root that are expanded
max_depth = 8
# Entries shown per list before "… N more (not shown)"
max_children_per_list = 5
# Nodes rendered per traversal
max_total_nodes = 1024

[render]
header_width = 20
indent_step = 2
handle_digits = 16
# max_string_width = 80
# truncation_marker = "..."

[layout]
max_panels = 10
titles = false

[sink]
dir = "snapshots"
# "overwrite" or "append_history"
mode = "overwrite"
create_dirs = true
"#
    }

    /// Check every section
    pub fn validate(&self) -> Result<()> {
        self.limits.validate()?;
        if self.render.handle_digits == 0 || self.render.handle_digits > 16 {
            return Err(Error::Config(format!(
                "render.handle_digits must be between 1 and 16, got {}",
                self.render.handle_digits
            )));
        }
        if self.layout.max_panels == 0 {
            return Err(Error::Config(
                "layout.max_panels must be at least 1".to_string(),
            ));
        }
        if self.sink.dir.as_os_str().is_empty() {
            return Err(Error::Config("sink.dir must not be empty".to_string()));
        }
        Ok(())
    }
}
