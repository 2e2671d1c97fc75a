//! Abstractions over the host so readers can be exercised without Linux.
//!
//! Three seams exist: the filesystem (`/proc` text files, `/etc/os-release`
//! and `statvfs(3)`), external command-line tools (`nvidia-smi`, `xrandr`,
//! `uname`, `speedtest-cli`) and the process environment (online CPU count,
//! environment variables). Production code uses the `Real*` types; tests use
//! the in-memory doubles from [`crate::collector::mock`].

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

/// Filesystem statistics for one mount point, as reported by `statvfs(3)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FsStats {
    /// Total data blocks in the filesystem.
    pub blocks: u64,
    /// Free blocks.
    pub blocks_free: u64,
    /// Fragment size in bytes (the unit `blocks` is counted in).
    pub block_size: u64,
}

/// Abstraction for filesystem operations.
///
/// Every source is re-read in full on each call; implementations must not
/// cache handles or contents between polls.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Queries filesystem statistics for the filesystem containing `path`.
    fn fs_stats(&self, path: &Path) -> io::Result<FsStats>;
}

/// Real filesystem implementation that delegates to `std::fs` and `statvfs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn fs_stats(&self, path: &Path) -> io::Result<FsStats> {
        let stat = nix::sys::statvfs::statvfs(path).map_err(io::Error::from)?;
        Ok(FsStats {
            blocks: stat.blocks() as u64,
            blocks_free: stat.blocks_free() as u64,
            block_size: stat.fragment_size() as u64,
        })
    }
}

/// Runs an external tool and captures its standard output.
///
/// A tool that cannot be launched yields an `io::Error` (typically
/// `ErrorKind::NotFound`). A tool that runs but exits unsuccessfully still
/// yields its stdout; callers decide whether the text is usable.
pub trait CommandRunner: Send + Sync {
    fn run(&self, program: &str, args: &[&str]) -> io::Result<String>;
}

/// Spawns real child processes via `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealRunner;

impl RealRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for RealRunner {
    fn run(&self, program: &str, args: &[&str]) -> io::Result<String> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Read-only view of the process environment.
pub trait Environment: Send + Sync {
    /// Number of processors currently online.
    fn online_cpus(&self) -> io::Result<usize>;

    /// Looks up an environment variable.
    fn var(&self, key: &str) -> Option<String>;
}

/// Queries the running host.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealEnv;

impl RealEnv {
    pub fn new() -> Self {
        Self
    }
}

impl Environment for RealEnv {
    fn online_cpus(&self) -> io::Result<usize> {
        // SAFETY: sysconf has no preconditions and only reads a system constant.
        let count = unsafe { libc::sysconf(libc::_SC_NPROCESSORS_ONLN) };
        if count < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(count as usize)
    }

    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_real_fs_read_to_string() {
        let fs = RealFs::new();
        let cargo_toml = env::current_dir().unwrap().join("Cargo.toml");
        let content = fs.read_to_string(&cargo_toml).unwrap();
        assert!(content.contains("[package]"));
    }

    #[test]
    fn test_real_fs_missing_file() {
        let fs = RealFs::new();
        let result = fs.read_to_string(Path::new("/nonexistent/path/12345"));
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::NotFound);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_real_fs_stats_root() {
        let fs = RealFs::new();
        let stats = fs.fs_stats(Path::new("/")).unwrap();
        assert!(stats.block_size > 0);
        assert!(stats.blocks_free <= stats.blocks);
    }

    #[test]
    fn test_real_fs_stats_missing_path() {
        let fs = RealFs::new();
        assert!(fs.fs_stats(Path::new("/nonexistent/path/12345")).is_err());
    }

    #[test]
    fn test_real_runner_missing_tool() {
        let runner = RealRunner::new();
        let err = runner
            .run("topd-definitely-not-installed-tool", &[])
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_real_env_online_cpus() {
        let env = RealEnv::new();
        assert!(env.online_cpus().unwrap() >= 1);
    }
}
