//! In-memory mock filesystem for testing readers without real `/proc`.
//!
//! Clones share the same storage, so a test can keep a handle and rewrite a
//! file between two polls of a collector that owns another clone.

use crate::collector::traits::{FileSystem, FsStats};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Inner {
    /// Map from path to file contents.
    files: HashMap<PathBuf, String>,
    /// Map from mount path to its statistics.
    mounts: HashMap<PathBuf, FsStats>,
}

/// In-memory filesystem for testing.
#[derive(Debug, Clone, Default)]
pub struct MockFs {
    inner: Arc<Mutex<Inner>>,
}

impl MockFs {
    /// Creates a new empty mock filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds or replaces a file with the given content.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<String>) {
        self.lock()
            .files
            .insert(path.as_ref().to_path_buf(), content.into());
    }

    /// Removes a file, if present.
    pub fn remove_file(&self, path: impl AsRef<Path>) {
        self.lock().files.remove(path.as_ref());
    }

    /// Registers `statvfs` results for a mount path.
    pub fn add_mount(&self, path: impl AsRef<Path>, stats: FsStats) {
        self.lock().mounts.insert(path.as_ref().to_path_buf(), stats);
    }
}

impl FileSystem for MockFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.lock().files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {:?}", path),
            )
        })
    }

    fn fs_stats(&self, path: &Path) -> io::Result<FsStats> {
        self.lock().mounts.get(path).copied().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no filesystem at {:?}", path),
            )
        })
    }
}
