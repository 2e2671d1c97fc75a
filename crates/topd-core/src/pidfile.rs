//! Single-instance guard based on a PID file.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use nix::errno::Errno;
use nix::sys::signal::kill;
use nix::unistd::Pid;
use tracing::{debug, info, warn};

/// Default PID file location.
pub const DEFAULT_PID_PATH: &str = "/var/run/topd.pid";

/// Startup errors that prevent the daemon from running.
#[derive(Debug)]
pub enum DaemonError {
    /// Another instance is alive.
    AlreadyRunning { pid: i32 },
    /// The PID file exists but does not hold a usable PID.
    InvalidPidFile { path: PathBuf, content: String },
    Io { path: PathBuf, error: io::Error },
}

impl DaemonError {
    fn io(path: &Path, error: io::Error) -> Self {
        DaemonError::Io {
            path: path.to_path_buf(),
            error,
        }
    }
}

impl fmt::Display for DaemonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DaemonError::AlreadyRunning { pid } => {
                write!(f, "the daemon is already running (PID: {})", pid)
            }
            DaemonError::InvalidPidFile { path, content } => write!(
                f,
                "failed to read PID from {}: {:?}",
                path.display(),
                content
            ),
            DaemonError::Io { path, error } => write!(f, "{}: {}", path.display(), error),
        }
    }
}

impl std::error::Error for DaemonError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DaemonError::Io { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Whether a process with `pid` exists. A permission error still means it
/// exists.
fn process_alive(pid: i32) -> bool {
    match kill(Pid::from_raw(pid), None) {
        Ok(()) => true,
        Err(Errno::EPERM) => true,
        Err(_) => false,
    }
}

/// Parses the first whitespace-separated token as a positive PID.
fn parse_pid(content: &str) -> Option<i32> {
    content
        .split_whitespace()
        .next()
        .and_then(|tok| tok.parse::<i32>().ok())
        .filter(|pid| *pid > 0)
}

/// Refuses to start if `path` names a live process; removes a stale file.
///
/// A missing file is fine. A file that cannot be parsed is an error.
pub fn check_existing(path: &Path) -> Result<(), DaemonError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(DaemonError::io(path, e)),
    };

    let pid = parse_pid(&content).ok_or_else(|| DaemonError::InvalidPidFile {
        path: path.to_path_buf(),
        content: content.trim().to_string(),
    })?;

    if process_alive(pid) {
        return Err(DaemonError::AlreadyRunning { pid });
    }

    info!("removing stale PID file {} (PID {})", path.display(), pid);
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(DaemonError::io(path, e)),
    }
}

/// PID file owned by this process. The file is removed on drop.
#[derive(Debug)]
pub struct PidFile {
    path: PathBuf,
    pid: u32,
}

impl PidFile {
    /// Writes the current process id to `path`.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, DaemonError> {
        let path = path.into();
        let pid = std::process::id();
        fs::write(&path, format!("{}\n", pid)).map_err(|e| DaemonError::io(&path, e))?;
        debug!("wrote PID {} to {}", pid, path.display());
        Ok(Self { path, pid })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }
}

impl Drop for PidFile {
    fn drop(&mut self) {
        // Leave the file alone if another instance has since replaced it.
        let ours = fs::read_to_string(&self.path)
            .ok()
            .and_then(|c| parse_pid(&c))
            .is_some_and(|pid| pid as u32 == self.pid);
        if !ours {
            return;
        }
        if let Err(e) = fs::remove_file(&self.path) {
            warn!("cannot remove PID file {}: {}", self.path.display(), e);
        }
    }
}
