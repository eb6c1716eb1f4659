//! Panels: named columns of text lines

/// Columns a panel adds around its longest line (`| ` and ` |`)
pub const BORDER_WIDTH: usize = 4;

/// One named, boxed column of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    name: String,
    lines: Vec<String>,
}

impl Panel {
    /// Create a panel from lines
    ///
    /// Lines containing `\n` are split, so every stored line is one row.
    pub fn new<I, S>(name: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lines = lines
            .into_iter()
            .flat_map(|line| {
                line.as_ref()
                    .split('\n')
                    .map(|l| l.trim_end_matches('\r').to_string())
                    .collect::<Vec<_>>()
            })
            .collect();
        Panel {
            name: name.into(),
            lines,
        }
    }

    /// Create a panel from a block of text; a trailing newline adds no row
    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        Panel::new(name, text.lines())
    }

    /// Panel name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Panel rows
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of text rows, excluding the closing rule
    pub fn height(&self) -> usize {
        self.lines.len()
    }

    /// Longest row in chars
    pub fn content_width(&self) -> usize {
        self.lines
            .iter()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0)
    }

    /// Boxed width: longest row plus the border
    pub fn width(&self) -> usize {
        self.content_width() + BORDER_WIDTH
    }
}
