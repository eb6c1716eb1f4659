//! Writing pages to a destination

use crate::destination::{SnapshotDestination, SnapshotMode};
use snapview_core::{Error, Result};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Persists composed pages to a [`SnapshotDestination`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotSink;

impl SnapshotSink {
    /// Write `text` to `destination` and return the latest file's path
    ///
    /// In `AppendHistory` mode a `# <seq>` record is also appended to the
    /// history file; the record with sequence 0 starts the file over. The
    /// destination's counter moves only after every write has succeeded.
    pub fn write(destination: &mut SnapshotDestination, text: &str) -> Result<PathBuf> {
        if destination.create_dirs() {
            ensure_dir(destination.dir())?;
        }

        // History is opened first so a failed open leaves the latest page intact
        let seq = destination.sequence();
        let history = match destination.mode() {
            SnapshotMode::AppendHistory => {
                let path = destination.history_path();
                let file = open_file(&path, seq > 0)?;
                Some((path, file))
            }
            SnapshotMode::Overwrite => None,
        };

        let latest = destination.latest_path();
        let mut file = open_file(&latest, false)?;
        write_all(&mut file, &latest, text.as_bytes())?;

        if let Some((path, mut file)) = history {
            let record = format!("# {}\n{}\n", seq, text);
            write_all(&mut file, &path, record.as_bytes())?;
        }

        info!(
            target: "snapview::sink",
            path = %latest.display(),
            sequence = destination.sequence(),
            mode = ?destination.mode(),
            bytes = text.len(),
            "Snapshot written"
        );
        destination.advance();
        Ok(latest)
    }
}

pub(crate) fn ensure_dir(dir: &Path) -> Result<()> {
    if dir.as_os_str().is_empty() || dir.is_dir() {
        return Ok(());
    }
    debug!(target: "snapview::sink", dir = %dir.display(), "Creating output directory");
    std::fs::create_dir_all(dir).map_err(|e| {
        warn!(target: "snapview::sink", dir = %dir.display(), error = %e, "Cannot create output directory");
        Error::cannot_open(dir, e)
    })
}

/// Open for writing; `append` keeps existing contents, otherwise truncate
pub(crate) fn open_file(path: &Path, append: bool) -> Result<File> {
    let mut options = OpenOptions::new();
    options.create(true);
    if append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }
    options.open(path).map_err(|e| {
        warn!(target: "snapview::sink", path = %path.display(), error = %e, "Cannot open destination");
        Error::cannot_open(path, e)
    })
}

pub(crate) fn write_all(file: &mut File, path: &Path, bytes: &[u8]) -> Result<()> {
    file.write_all(bytes)
        .and_then(|_| file.flush())
        .map_err(|e| {
            warn!(target: "snapview::sink", path = %path.display(), error = %e, "Write failed");
            Error::write_failed(path, e)
        })
}
