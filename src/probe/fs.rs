//! Recursive directory sizing, the `du -sk` of this crate.

use std::collections::HashSet;
use std::os::unix::fs::MetadataExt;
use std::path::Path;
use std::time::{Duration, Instant};
use walkdir::WalkDir;

use super::size::{bytes_to_kb, disk_usage};
use super::{Measurement, SizeProbe};
use crate::error::ProbeError;
use crate::scanner::ScanWarning;

/// Measures subtrees by walking them and summing allocated blocks.
///
/// Symlinks are never followed and hard-linked files are counted once per
/// measurement. Entries that cannot be read are skipped and reported.
#[derive(Debug, Clone, Default)]
pub struct FsSizeProbe {
    timeout: Option<Duration>,
}

impl FsSizeProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop measuring after `timeout` and report an approximate size.
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl SizeProbe for FsSizeProbe {
    fn measure(&self, path: &Path) -> Result<Measurement, ProbeError> {
        match std::fs::symlink_metadata(path) {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ProbeError::Vanished(path.to_path_buf()));
            }
            Err(e) => {
                return Err(ProbeError::Unreadable {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        }

        let deadline = self.timeout.map(|t| Instant::now() + t);
        let mut measurement = Measurement::default();
        let mut bytes = 0u64;
        let mut seen_inodes: HashSet<(u64, u64)> = HashSet::new();

        for result in WalkDir::new(path).follow_links(false) {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                tracing::debug!(path = %path.display(), "Size probe timed out");
                measurement.approximate = true;
                break;
            }

            let entry = match result {
                Ok(e) => e,
                Err(err) => {
                    let at = err.path().unwrap_or(path).to_path_buf();
                    match err.io_error() {
                        Some(io) => measurement.skipped.push(ScanWarning::from_io(&at, io)),
                        None => measurement.skipped.push(ScanWarning::new(
                            at,
                            crate::scanner::WarningReason::Unreadable(err.to_string()),
                        )),
                    }
                    continue;
                }
            };

            let metadata = match entry.metadata() {
                Ok(m) => m,
                Err(err) => {
                    if let Some(io) = err.io_error() {
                        measurement.skipped.push(ScanWarning::from_io(entry.path(), io));
                    }
                    continue;
                }
            };

            if metadata.is_file()
                && metadata.nlink() > 1
                && !seen_inodes.insert((metadata.dev(), metadata.ino()))
            {
                continue;
            }

            bytes += disk_usage(&metadata);
        }

        measurement.size_kb = bytes_to_kb(bytes);
        Ok(measurement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_measure_counts_files() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.bin"), vec![1u8; 64 * 1024]).unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();
        fs::write(tmp.path().join("sub/b.bin"), vec![1u8; 64 * 1024]).unwrap();

        let m = FsSizeProbe::new().measure(tmp.path()).unwrap();
        assert!(m.size_kb >= 128, "got {}", m.size_kb);
        assert!(!m.approximate);
        assert!(m.skipped.is_empty());
    }

    #[test]
    fn test_measure_missing_path_is_vanished() {
        let tmp = TempDir::new().unwrap();
        let err = FsSizeProbe::new()
            .measure(&tmp.path().join("gone"))
            .unwrap_err();
        assert!(matches!(err, ProbeError::Vanished(_)));
    }

    #[test]
    fn test_measure_does_not_follow_symlinks() {
        let tmp = TempDir::new().unwrap();
        let big = tmp.path().join("big");
        fs::create_dir(&big).unwrap();
        fs::write(big.join("data"), vec![1u8; 256 * 1024]).unwrap();
        let small = tmp.path().join("small");
        fs::create_dir(&small).unwrap();
        std::os::unix::fs::symlink(&big, small.join("link")).unwrap();

        let probe = FsSizeProbe::new();
        let big_kb = probe.measure(&big).unwrap().size_kb;
        let small_kb = probe.measure(&small).unwrap().size_kb;
        assert!(small_kb < big_kb);
    }

    #[test]
    fn test_measure_counts_hard_links_once() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("d");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("one"), vec![1u8; 128 * 1024]).unwrap();

        let probe = FsSizeProbe::new();
        let before = probe.measure(&dir).unwrap().size_kb;
        fs::hard_link(dir.join("one"), dir.join("two")).unwrap();
        let after = probe.measure(&dir).unwrap().size_kb;
        assert_eq!(before, after);
    }

    #[test]
    fn test_zero_timeout_is_approximate() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a"), b"x").unwrap();

        let m = FsSizeProbe::with_timeout(Some(Duration::ZERO))
            .measure(tmp.path())
            .unwrap();
        assert!(m.approximate);
        assert_eq!(m.size_kb, 0);
    }
}
