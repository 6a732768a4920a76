use std::time::Duration;

/// Options recognized by [`scan`](crate::scan).
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Descend no deeper than this many directories below the root
    /// (None = unlimited). Directories at the limit are still classified.
    pub max_depth: Option<usize>,

    /// Query the container runtime for its own usage accounting
    pub include_docker: bool,

    /// Overall deadline for the scan; past it the result is partial
    pub timeout: Option<Duration>,

    /// Per-invocation limit for measuring one category root
    pub probe_timeout: Option<Duration>,

    /// Number of parallel threads (0 = auto)
    pub threads: usize,

    /// Stay on the same filesystem (don't cross mount points)
    pub one_file_system: bool,

    /// Directory names that are neither classified nor descended into
    pub exclude: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            include_docker: true,
            timeout: None,
            probe_timeout: Some(Duration::from_secs(60)),
            threads: 0,
            one_file_system: false,
            exclude: Vec::new(),
        }
    }
}

/// Linux virtual filesystem paths that should be excluded by default.
/// These can report incorrect/huge sizes and cause scanning issues.
pub const LINUX_VIRTUAL_FS_PATHS: &[&str] = &["/proc", "/dev", "/sys", "/run"];

impl ScanOptions {
    /// Check if a path lies on a Linux virtual filesystem
    pub fn is_linux_virtual_fs(path: &std::path::Path) -> bool {
        LINUX_VIRTUAL_FS_PATHS
            .iter()
            .any(|vfs| path.starts_with(vfs))
    }

    /// Create a new ScanOptions with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum traversal depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Set whether to query Docker
    pub fn with_docker(mut self, include: bool) -> Self {
        self.include_docker = include;
        self
    }

    /// Set the overall scan deadline
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the per-root measurement timeout
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = Some(timeout);
        self
    }

    /// Set number of parallel threads
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Set whether to stay on the same filesystem
    pub fn with_one_file_system(mut self, enabled: bool) -> Self {
        self.one_file_system = enabled;
        self
    }

    /// Set excluded directory names
    pub fn with_exclude(mut self, names: Vec<String>) -> Self {
        self.exclude = names;
        self
    }

    pub(crate) fn is_excluded(&self, name: &str) -> bool {
        self.exclude.iter().any(|e| e == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_default_options() {
        let opts = ScanOptions::default();
        assert_eq!(opts.max_depth, None);
        assert!(opts.include_docker);
        assert_eq!(opts.timeout, None);
        assert_eq!(opts.probe_timeout, Some(Duration::from_secs(60)));
        assert_eq!(opts.threads, 0);
        assert!(!opts.one_file_system);
        assert!(opts.exclude.is_empty());
    }

    #[test]
    fn test_scan_options_chaining() {
        let opts = ScanOptions::new()
            .with_max_depth(4)
            .with_docker(false)
            .with_timeout(Duration::from_secs(30))
            .with_probe_timeout(Duration::from_secs(5))
            .with_threads(8)
            .with_one_file_system(true)
            .with_exclude(vec!["vendor".to_string()]);

        assert_eq!(opts.max_depth, Some(4));
        assert!(!opts.include_docker);
        assert_eq!(opts.timeout, Some(Duration::from_secs(30)));
        assert_eq!(opts.probe_timeout, Some(Duration::from_secs(5)));
        assert_eq!(opts.threads, 8);
        assert!(opts.one_file_system);
        assert!(opts.is_excluded("vendor"));
        assert!(!opts.is_excluded("src"));
    }

    #[test]
    fn test_is_linux_virtual_fs() {
        assert!(ScanOptions::is_linux_virtual_fs(Path::new("/proc")));
        assert!(ScanOptions::is_linux_virtual_fs(Path::new("/proc/1/status")));
        assert!(ScanOptions::is_linux_virtual_fs(Path::new("/dev/sda")));
        assert!(ScanOptions::is_linux_virtual_fs(Path::new("/sys/class/net")));
        assert!(ScanOptions::is_linux_virtual_fs(Path::new("/run/user/1000")));

        assert!(!ScanOptions::is_linux_virtual_fs(Path::new("/home/user")));
        assert!(!ScanOptions::is_linux_virtual_fs(Path::new("/tmp")));
        // Component-wise, not string prefix.
        assert!(!ScanOptions::is_linux_virtual_fs(Path::new("/devel")));
        assert!(!ScanOptions::is_linux_virtual_fs(Path::new("/home/user/proc")));
    }
}
