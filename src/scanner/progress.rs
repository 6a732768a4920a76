//! Progress counters shared between a running scan and its caller.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Progress tracker for a scan.
#[derive(Debug, Default)]
pub struct ScanProgress {
    /// Directories read by the walk.
    dirs_visited: AtomicUsize,
    /// Category roots found so far.
    discovered: AtomicUsize,
    /// Category roots whose size is known.
    measured: AtomicUsize,
    /// Category root currently being measured.
    current: Mutex<Option<PathBuf>>,
}

impl ScanProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn visit_dir(&self) {
        self.dirs_visited.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn discover(&self) {
        self.discovered.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn start_measuring(&self, path: &Path) {
        if let Ok(mut current) = self.current.lock() {
            *current = Some(path.to_path_buf());
        }
    }

    /// Count `path` as sized and clear it from `current` unless another root
    /// has been started since.
    pub(crate) fn finish_measuring(&self, path: &Path) {
        self.measured.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut current) = self.current.lock() {
            if current.as_deref() == Some(path) {
                *current = None;
            }
        }
    }

    pub fn dirs_visited(&self) -> usize {
        self.dirs_visited.load(Ordering::Relaxed)
    }

    pub fn discovered(&self) -> usize {
        self.discovered.load(Ordering::Relaxed)
    }

    pub fn measured(&self) -> usize {
        self.measured.load(Ordering::Relaxed)
    }

    /// Category root most recently handed to a probe and not yet sized.
    pub fn current(&self) -> Option<PathBuf> {
        self.current.lock().ok().and_then(|c| c.clone())
    }
}
