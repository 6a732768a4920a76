//! Size probes: how the engine learns how big things are.
//!
//! The classifier only sees the [`SizeProbe`] and [`DockerProbe`] traits, so
//! tests can substitute fakes that return fixed sizes.

mod disk;
mod docker;
mod fs;
mod size;

pub use disk::{check_disk_usage, DiskOverview};
pub use docker::{parse_docker_df, DockerCli, DockerUsage, DockerUsageEntry};
pub use fs::FsSizeProbe;
pub use size::{bytes_to_kb, disk_usage, parse_docker_reclaimable, parse_docker_size};

use std::path::Path;

use crate::error::ProbeError;
use crate::scanner::ScanWarning;

/// Outcome of measuring one subtree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Measurement {
    /// Size in KiB of everything that could be read.
    pub size_kb: u64,
    /// The probe hit its timeout; `size_kb` undercounts.
    pub approximate: bool,
    /// Entries left out of `size_kb` because they could not be read.
    pub skipped: Vec<ScanWarning>,
}

impl Measurement {
    pub fn exact(size_kb: u64) -> Self {
        Self {
            size_kb,
            ..Self::default()
        }
    }
}

/// Capability to size a filesystem subtree.
pub trait SizeProbe: Send + Sync {
    /// Measure `path` and everything below it.
    ///
    /// Unreadable entries below `path` are skipped and reported in
    /// [`Measurement::skipped`]; only a missing or unreadable `path` itself
    /// is an error.
    fn measure(&self, path: &Path) -> Result<Measurement, ProbeError>;
}

/// Capability to query the container runtime's own usage accounting.
pub trait DockerProbe: Send + Sync {
    fn usage(&self) -> Result<DockerUsage, ProbeError>;
}
