//! Log file writer.
//!
//! Each report replaces the previous one entirely. The text is written to a
//! sibling `<name>.tmp` file, synced, and renamed over the target, so readers
//! never observe a half-written report.

use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::trace;

/// Default report location.
pub const DEFAULT_LOG_PATH: &str = "/tmp/topd.log";

/// Overwrites a single report file.
#[derive(Debug, Clone)]
pub struct LogWriter {
    path: PathBuf,
    tmp_path: PathBuf,
}

impl LogWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut tmp_name = path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("topd"));
        tmp_name.push(".tmp");
        let tmp_path = path.with_file_name(tmp_name);
        Self { path, tmp_path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the file contents with `text`.
    pub fn write(&self, text: &str) -> io::Result<()> {
        let mut file = fs::File::create(&self.tmp_path)?;
        file.write_all(text.as_bytes())?;
        file.sync_all()?;
        drop(file);

        // Atomic rename
        if let Err(e) = fs::rename(&self.tmp_path, &self.path) {
            let _ = fs::remove_file(&self.tmp_path);
            return Err(e);
        }
        trace!("wrote {} bytes to {}", text.len(), self.path.display());
        Ok(())
    }
}
