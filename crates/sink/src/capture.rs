//! Numbered raw captures
//!
//! Each call writes one file `<dir>/<prefix>-NNNN.txt` holding the given
//! chunks back to back, e.g. terminal output as it was flushed.
//!
//! Text rows go through [`RawCapture::write_lines`], which is how a block's
//! hex dump lands in its own file:
//!
//! ```rust,ignore
//! let mut pages = RawCapture::new("keilog", "page_data");
//! pages.write_lines(HexDump::new().lines(&block.data))?;
//! ```

use crate::writer::{ensure_dir, open_file, write_all};
use snapview_core::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes raw byte buffers to numbered files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCapture {
    dir: PathBuf,
    prefix: String,
    next_index: u64,
    create_dirs: bool,
}

impl RawCapture {
    /// Create a capture starting at index 0
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        RawCapture {
            dir: dir.into(),
            prefix: prefix.into(),
            next_index: 0,
            create_dirs: true,
        }
    }

    /// Whether missing directories are created on write (default: true)
    pub fn with_create_dirs(mut self, create_dirs: bool) -> Self {
        self.create_dirs = create_dirs;
        self
    }

    /// Output directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Index the next capture will use
    pub fn next_index(&self) -> u64 {
        self.next_index
    }

    /// Path of the capture with `index`
    pub fn path_for(&self, index: u64) -> PathBuf {
        self.dir.join(format!("{}-{:04}.txt", self.prefix, index))
    }

    /// Write one buffer
    pub fn write(&mut self, bytes: &[u8]) -> Result<PathBuf> {
        self.write_chunks(&[bytes])
    }

    /// Write several buffers into one capture file
    ///
    /// The index only moves forward once the file is fully written.
    pub fn write_chunks(&mut self, chunks: &[&[u8]]) -> Result<PathBuf> {
        if self.create_dirs {
            ensure_dir(&self.dir)?;
        }
        let path = self.path_for(self.next_index);
        let mut file = open_file(&path, false)?;
        for chunk in chunks {
            write_all(&mut file, &path, chunk)?;
        }

        debug!(
            target: "snapview::sink",
            path = %path.display(),
            chunks = chunks.len(),
            bytes = chunks.iter().map(|c| c.len()).sum::<usize>(),
            "Raw capture written"
        );
        self.next_index += 1;
        Ok(path)
    }

    /// Write text rows, each terminated by a newline, into one capture file
    pub fn write_lines<I, S>(&mut self, lines: I) -> Result<PathBuf>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut text = String::new();
        for line in lines {
            text.push_str(line.as_ref());
            text.push('\n');
        }
        self.write(text.as_bytes())
    }
}
