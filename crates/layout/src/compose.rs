//! Side-by-side panel composition
//!
//! ```text
//! | buffer: 0x...       | | memline            |
//! |   b_fnum:         1 | |   ml_line_ct:    3 |
//! |   b_flags:        0 | --------------------
//! -----------------------
//! ```
//!
//! Every panel is `| line |` with its own width. The page has one row more
//! than the tallest panel: each panel is closed by a dashed rule right below
//! its last line and padded with blank cells after that. Rows keep their
//! trailing spaces so the columns stay aligned.

use crate::panel::Panel;
use serde::{Deserialize, Serialize};
use snapview_core::{Error, Result};
use tracing::debug;

/// Default maximum panels per page
pub const DEFAULT_MAX_PANELS: usize = 10;

/// Page composition options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutOptions {
    /// Panels per page; more is rejected with `TooManyPanels`
    pub max_panels: usize,
    /// Prepend a dashed rule carrying each panel's name
    pub titles: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        LayoutOptions {
            max_panels: DEFAULT_MAX_PANELS,
            titles: false,
        }
    }
}

/// Compose panels with default options
pub fn compose(panels: &[Panel]) -> Result<String> {
    LayoutComposer::default().compose(panels)
}

/// Places panels side by side as boxed columns
#[derive(Debug, Clone, Default)]
pub struct LayoutComposer {
    options: LayoutOptions,
}

impl LayoutComposer {
    /// Create a composer
    pub fn new(options: LayoutOptions) -> Self {
        LayoutComposer { options }
    }

    /// The composer's options
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Compose panels into one page; zero panels give an empty page
    pub fn compose(&self, panels: &[Panel]) -> Result<String> {
        if panels.len() > self.options.max_panels {
            return Err(Error::TooManyPanels {
                count: panels.len(),
                max: self.options.max_panels,
            });
        }
        if panels.is_empty() {
            return Ok(String::new());
        }

        let widths: Vec<usize> = panels.iter().map(Panel::width).collect();
        let rows = panels.iter().map(Panel::height).max().unwrap_or(0) + 1;

        let mut out = String::new();
        if self.options.titles {
            let cells: Vec<String> = panels
                .iter()
                .zip(&widths)
                .map(|(panel, &width)| title_rule(panel.name(), width))
                .collect();
            out.push_str(&cells.join(" "));
            out.push('\n');
        }

        for row in 0..rows {
            let cells: Vec<String> = panels
                .iter()
                .zip(&widths)
                .map(|(panel, &width)| cell(panel, width, row))
                .collect();
            out.push_str(&cells.join(" "));
            out.push('\n');
        }

        debug!(
            target: "snapview::layout",
            panels = panels.len(),
            rows,
            width = out.lines().next().map(|l| l.chars().count()).unwrap_or(0),
            "Page composed"
        );
        Ok(out)
    }
}

fn cell(panel: &Panel, width: usize, row: usize) -> String {
    let lines = panel.lines();
    match row.cmp(&lines.len()) {
        std::cmp::Ordering::Less => {
            let line = &lines[row];
            let pad = width - crate::panel::BORDER_WIDTH - line.chars().count();
            format!("| {}{} |", line, " ".repeat(pad))
        }
        std::cmp::Ordering::Equal => "-".repeat(width),
        std::cmp::Ordering::Greater => " ".repeat(width),
    }
}

fn title_rule(name: &str, width: usize) -> String {
    let mut rule: String = format!("-- {} ", name).chars().take(width).collect();
    let len = rule.chars().count();
    rule.push_str(&"-".repeat(width - len));
    rule
}
