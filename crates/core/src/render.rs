//! Field renderer
//!
//! Converts one captured [`Value`] into its display string.
//!
//! ## Rules
//!
//! - Integers: decimal
//! - Booleans: `1` / `0`
//! - Handles: `0x` + fixed-width lowercase hex, or `null` for zero
//! - Strings: cut on a char boundary at the effective width, no ellipsis
//!   unless a truncation marker is configured
//! - Flags: `"<value> = A C"` (set bits, lowest first); exactly `"0"` when empty
//! - Enums: the label
//!
//! Rendering never panics. A field whose accessor produced nothing renders
//! as [`markers::UNAVAILABLE`].

use crate::value::{BoundedStr, FlagSet, Value};

/// In-band markers emitted in place of values that could not be rendered
pub mod markers {
    /// A field or child accessor could not produce a value
    pub const UNAVAILABLE: &str = "<unavailable>";
    /// A child is an ancestor on the current traversal path
    pub const CYCLE_DETECTED: &str = "<cycle detected>";
    /// Children omitted because the node sits at the depth limit
    pub const DEPTH_LIMIT_REACHED: &str = "<depth limit reached>";
    /// Children omitted because the traversal exhausted its node budget
    pub const NODE_LIMIT_REACHED: &str = "<node limit reached>";
    /// A node was handed to a descriptor built for a different type
    pub const TYPE_MISMATCH: &str = "<type mismatch>";

    /// Summary line for list entries beyond the display limit
    pub fn more_not_shown(count: usize) -> String {
        format!("… {} more (not shown)", count)
    }

    /// Summary line when counting the remainder hit its scan bound
    pub fn at_least_more_not_shown(count: usize) -> String {
        format!("… at least {} more (not shown)", count)
    }
}

/// Default number of hex digits for handles (64-bit addresses)
pub const DEFAULT_HANDLE_DIGITS: usize = 16;

/// Render a value with the default renderer
pub fn render(value: &Value, max_width: Option<usize>) -> String {
    FieldRenderer::default().render(value, max_width)
}

/// Renders captured values to display strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRenderer {
    truncation_marker: Option<String>,
    handle_digits: usize,
}

impl Default for FieldRenderer {
    fn default() -> Self {
        FieldRenderer {
            truncation_marker: None,
            handle_digits: DEFAULT_HANDLE_DIGITS,
        }
    }
}

impl FieldRenderer {
    /// Create a renderer with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `marker` to strings that were cut short
    pub fn with_truncation_marker(mut self, marker: impl Into<String>) -> Self {
        self.truncation_marker = Some(marker.into());
        self
    }

    /// Pad handles to `digits` hex digits
    pub fn with_handle_digits(mut self, digits: usize) -> Self {
        self.handle_digits = digits;
        self
    }

    /// Render one value
    ///
    /// `max_width` only affects strings; it combines with the string's own
    /// display limit by taking the smaller of the two.
    pub fn render(&self, value: &Value, max_width: Option<usize>) -> String {
        match value {
            Value::I8(v) => v.to_string(),
            Value::I16(v) => v.to_string(),
            Value::I32(v) => v.to_string(),
            Value::I64(v) => v.to_string(),
            Value::U8(v) => v.to_string(),
            Value::U16(v) => v.to_string(),
            Value::U32(v) => v.to_string(),
            Value::U64(v) => v.to_string(),
            Value::Handle(0) => "null".to_string(),
            Value::Handle(addr) => format!("0x{:0width$x}", addr, width = self.handle_digits),
            Value::Bool(b) => (if *b { "1" } else { "0" }).to_string(),
            Value::Str(s) => self.render_str(s, max_width),
            Value::Enum(label) => label.to_string(),
            Value::Flags(flags) => render_flags(flags),
        }
    }

    /// Render an accessor result, mapping `None` to the unavailable marker
    pub fn render_field(&self, value: Option<&Value>, max_width: Option<usize>) -> String {
        match value {
            Some(value) => self.render(value, max_width),
            None => markers::UNAVAILABLE.to_string(),
        }
    }

    fn render_str(&self, s: &BoundedStr, max_width: Option<usize>) -> String {
        let width = match (s.max_display(), max_width) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        let text = s.text();
        let Some(width) = width else {
            return text.to_string();
        };
        if text.chars().count() <= width {
            return text.to_string();
        }
        match &self.truncation_marker {
            None => take_chars(text, width).to_string(),
            Some(marker) => {
                let marker_len = marker.chars().count();
                if marker_len >= width {
                    // No room for the marker; fall back to a plain cut
                    take_chars(text, width).to_string()
                } else {
                    let mut out = take_chars(text, width - marker_len).to_string();
                    out.push_str(marker);
                    out
                }
            }
        }
    }
}

fn take_chars(text: &str, count: usize) -> &str {
    match text.char_indices().nth(count) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn render_flags(flags: &FlagSet) -> String {
    if flags.value() == 0 {
        return "0".to_string();
    }
    let names = flags.set_names();
    format!("{} = {}", flags.value(), names.join(" "))
}
