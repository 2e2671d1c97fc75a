//! Disk space of a mounted filesystem.

use std::path::Path;

use crate::collector::error::ReadError;
use crate::collector::traits::FileSystem;
use crate::model::DiskReport;

/// Mount path sampled when none is configured.
pub const DEFAULT_DISK_PATH: &str = "/";

/// Computes total, free and used space for the filesystem holding `path`.
pub fn collect_disk<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> Result<DiskReport, ReadError> {
    let stats = fs.fs_stats(path).map_err(|error| ReadError::PathUnavailable {
        path: path.display().to_string(),
        error,
    })?;

    let total_bytes = stats.blocks.saturating_mul(stats.block_size);
    let free_bytes = stats.blocks_free.saturating_mul(stats.block_size);
    let used_bytes = total_bytes.saturating_sub(free_bytes);
    let used_pct = if total_bytes == 0 {
        0.0
    } else {
        used_bytes as f64 / total_bytes as f64 * 100.0
    };

    Ok(DiskReport {
        path: path.display().to_string(),
        total_bytes,
        free_bytes,
        used_bytes,
        used_pct,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::MockFs;
    use crate::collector::traits::FsStats;

    #[test]
    fn test_collect_disk() {
        let fs = MockFs::new();
        fs.add_mount(
            "/",
            FsStats {
                blocks: 1000,
                blocks_free: 250,
                block_size: 4096,
            },
        );

        let disk = collect_disk(&fs, Path::new("/")).unwrap();
        assert_eq!(disk.path, "/");
        assert_eq!(disk.total_bytes, 4_096_000);
        assert_eq!(disk.free_bytes, 1_024_000);
        assert_eq!(disk.used_bytes, 3_072_000);
        assert!((disk.used_pct - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_collect_disk_empty_filesystem() {
        let fs = MockFs::new();
        fs.add_mount("/empty", FsStats::default());
        let disk = collect_disk(&fs, Path::new("/empty")).unwrap();
        assert_eq!(disk.used_pct, 0.0);
    }

    #[test]
    fn test_collect_disk_unknown_path() {
        let err = collect_disk(&MockFs::new(), Path::new("/mnt/gone")).unwrap_err();
        assert_eq!(err.kind(), "PathUnavailable");
        assert!(err.to_string().contains("/mnt/gone"));
    }
}
