//! Hex dumps of raw byte regions
//!
//! ```text
//! 0x00001000: 48 65 6c 6c 6f 2c 20 77  6f 72 6c 64 00 00 00 00  Hello, w orld....
//! ...
//! 0x00001f80: 00 00 00 00 00 00 00 00  00 00 00 00 00 00 00 00  ........ ........
//! ```
//!
//! Rows are aligned to `width` from the start of the region. An optional skip
//! range collapses into a single `...` line; rows it only partly covers show
//! the remaining bytes in place. The last row is flushed even when short.

use crate::panel::Panel;
use std::ops::Range;

/// Bytes per row unless configured otherwise
pub const DEFAULT_ROW_WIDTH: usize = 16;

/// Bytes per gap-separated group within a row
const GROUP: usize = 8;

/// Hex dump formatter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexDump {
    width: usize,
    skip: Option<Range<usize>>,
    base_address: Option<u64>,
}

impl Default for HexDump {
    fn default() -> Self {
        HexDump {
            width: DEFAULT_ROW_WIDTH,
            skip: None,
            base_address: None,
        }
    }
}

impl HexDump {
    /// Create a formatter with 16 bytes per row
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes per row (at least 1)
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width.max(1);
        self
    }

    /// Offsets to leave out, shown as one `...` line
    pub fn with_skip(mut self, skip: Range<usize>) -> Self {
        self.skip = Some(skip);
        self
    }

    /// Address printed for offset 0; defaults to the slice's own address
    pub fn with_base_address(mut self, addr: u64) -> Self {
        self.base_address = Some(addr);
        self
    }

    /// Dump `bytes` as text rows
    pub fn lines(&self, bytes: &[u8]) -> Vec<String> {
        let base = self
            .base_address
            .unwrap_or(bytes.as_ptr() as usize as u64);
        let skipped = |i: usize| self.skip.as_ref().map_or(false, |r| r.contains(&i));

        let mut out = Vec::new();
        let mut in_skip = false;
        for (row, chunk) in bytes.chunks(self.width).enumerate() {
            let start = row * self.width;
            if (start..start + chunk.len()).all(skipped) {
                if !in_skip {
                    out.push("...".to_string());
                    in_skip = true;
                }
                continue;
            }
            in_skip = false;

            let mut hex = format!("0x{:08x}: ", base.wrapping_add(start as u64));
            let mut ascii = String::with_capacity(self.width + self.width / GROUP);
            for col in 0..self.width {
                if col > 0 && col % GROUP == 0 {
                    hex.push(' ');
                    ascii.push(' ');
                }
                match chunk.get(col) {
                    Some(_) if skipped(start + col) => {
                        hex.push_str("   ");
                        ascii.push(' ');
                    }
                    Some(&b) => {
                        hex.push_str(&format!("{:02x} ", b));
                        ascii.push(printable(b));
                    }
                    None => hex.push_str("   "),
                }
            }
            hex.push(' ');
            hex.push_str(ascii.trim_end());
            out.push(hex);
        }
        out
    }

    /// Dump `bytes` into a named panel
    pub fn panel(&self, name: impl Into<String>, bytes: &[u8]) -> Panel {
        Panel::new(name, self.lines(bytes))
    }
}

fn printable(b: u8) -> char {
    if (0x20..0x7f).contains(&b) {
        b as char
    } else {
        '.'
    }
}
