use std::path::Path;

use nix::sys::statvfs::statvfs;
use serde::Serialize;

/// Capacity of the filesystem holding a path, in KiB.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiskOverview {
    pub total_kb: u64,
    pub used_kb: u64,
    pub available_kb: u64,
    /// Usage percentage (0.0 - 100.0)
    pub percent: f32,
}

/// Check disk usage of the filesystem containing `path`
pub fn check_disk_usage(path: &Path) -> nix::Result<DiskOverview> {
    let stat = statvfs(path)?;

    let block_size = stat.fragment_size() as u64;
    let total = stat.blocks() as u64 * block_size;
    let available = stat.blocks_available() as u64 * block_size;
    let free = stat.blocks_free() as u64 * block_size;

    // Used = total - free (not available, as available excludes reserved blocks)
    let used = total.saturating_sub(free);

    // Percent is based on non-reserved space (what users can actually use)
    let usable_total = used + available;
    let percent = if usable_total > 0 {
        (used as f64 / usable_total as f64 * 100.0) as f32
    } else {
        0.0
    };

    Ok(DiskOverview {
        total_kb: total / 1024,
        used_kb: used / 1024,
        available_kb: available / 1024,
        percent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_disk_usage_tmp() {
        let tmp = tempfile::TempDir::new().unwrap();
        let overview = check_disk_usage(tmp.path()).unwrap();
        assert!(overview.used_kb <= overview.total_kb);
        assert!((0.0..=100.0).contains(&overview.percent));
    }

    #[test]
    fn test_check_disk_usage_missing_path() {
        assert!(check_disk_usage(Path::new("/nonexistent/path/12345")).is_err());
    }
}
