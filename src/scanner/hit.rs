use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::catalog::Category;

/// One category root found during a walk, already sized.
/// Immutable once emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanHit {
    /// Category assigned by the first matching rule
    pub category: Category,

    /// Absolute path of the category root (or a `docker://` pseudo-path)
    pub path: PathBuf,

    /// Size of the whole subtree in KiB
    pub size_kb: u64,

    /// True when the probe gave up early and `size_kb` undercounts
    pub approximate: bool,

    /// When the walk confirmed this directory as a category root
    pub discovered_at: SystemTime,
}

/// Why part of the tree was left out of the totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum WarningReason {
    /// Permission denied or another I/O error while reading.
    Unreadable(String),
    /// The path disappeared while the scan was running.
    Vanished,
    /// Size measurement stopped at its timeout; the size undercounts.
    ProbeTimeout,
    /// An external tool (e.g. the container runtime) could not be queried.
    ExternalToolUnavailable(String),
    /// Filesystem capacity could not be read.
    DiskInfoUnavailable(String),
}

impl fmt::Display for WarningReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningReason::Unreadable(msg) => write!(f, "unreadable: {}", msg),
            WarningReason::Vanished => f.write_str("vanished during scan"),
            WarningReason::ProbeTimeout => f.write_str("size probe timed out, size is approximate"),
            WarningReason::ExternalToolUnavailable(msg) => {
                write!(f, "external tool unavailable: {}", msg)
            }
            WarningReason::DiskInfoUnavailable(msg) => {
                write!(f, "disk information unavailable: {}", msg)
            }
        }
    }
}

/// A non-fatal problem attached to a scan result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanWarning {
    pub path: PathBuf,
    pub reason: WarningReason,
}

impl ScanWarning {
    pub fn new(path: impl Into<PathBuf>, reason: WarningReason) -> Self {
        Self {
            path: path.into(),
            reason,
        }
    }

    /// Classify an I/O error hit while reading `path`.
    pub fn from_io(path: &Path, err: &std::io::Error) -> Self {
        let reason = if err.kind() == std::io::ErrorKind::NotFound {
            WarningReason::Vanished
        } else {
            WarningReason::Unreadable(err.to_string())
        };
        Self::new(path, reason)
    }
}

impl fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.reason)
    }
}
