//! The classifier: a depth-first walk that stops at category roots.

use std::collections::BTreeSet;
use std::fs;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Instant, SystemTime};

use crate::catalog::{Category, DirShape, PatternCatalog};
use crate::error::{ProbeError, ReclaimError, Result};
use crate::probe::SizeProbe;

use super::hit::{ScanHit, ScanWarning, WarningReason};
use super::options::ScanOptions;
use super::progress::ScanProgress;

/// A directory confirmed as a category root, not yet sized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRoot {
    pub category: Category,
    pub path: PathBuf,
    /// Directories between the scan root and this one (root = 0).
    pub depth: usize,
    pub discovered_at: SystemTime,
}

/// Result of sizing one [`CategoryRoot`].
#[derive(Debug, Clone, Default)]
pub struct RootMeasurement {
    pub hit: Option<ScanHit>,
    pub warnings: Vec<ScanWarning>,
}

/// Canonicalize the scan root, failing for anything that is not a directory.
pub fn resolve_root(root: &Path) -> Result<PathBuf> {
    let canonical = root.canonicalize().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ReclaimError::RootNotFound(root.to_path_buf())
        } else {
            ReclaimError::Io {
                path: root.to_path_buf(),
                source: e,
            }
        }
    })?;

    let metadata = fs::metadata(&canonical).map_err(|e| ReclaimError::Io {
        path: canonical.clone(),
        source: e,
    })?;
    if !metadata.is_dir() {
        return Err(ReclaimError::RootNotADirectory(root.to_path_buf()));
    }

    Ok(canonical)
}

/// Walks a tree, classifies directories against a [`PatternCatalog`] and
/// sizes category roots with a [`SizeProbe`].
pub struct Classifier {
    catalog: PatternCatalog,
    probe: Box<dyn SizeProbe>,
}

impl Classifier {
    pub fn new(catalog: PatternCatalog, probe: Box<dyn SizeProbe>) -> Self {
        Self { catalog, probe }
    }

    pub fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    /// Lazily find category roots below `root` without sizing them.
    ///
    /// Fails only when `root` does not exist or is not a directory.
    pub fn discover<'a>(&'a self, root: &Path, options: &'a ScanOptions) -> Result<Discovery<'a>> {
        let root = resolve_root(root)?;
        let root_dev = if options.one_file_system {
            Some(
                fs::metadata(&root)
                    .map_err(|e| ReclaimError::Io {
                        path: root.clone(),
                        source: e,
                    })?
                    .dev(),
            )
        } else {
            None
        };

        Ok(Discovery {
            catalog: &self.catalog,
            options,
            root_dev,
            stack: vec![(root, 0)],
            warnings: Vec::new(),
            deadline: options.timeout.map(|t| Instant::now() + t),
            interrupted: false,
            dirs_visited: 0,
            progress: None,
        })
    }

    /// Lazily walk `root`, yielding sized hits in discovery order.
    pub fn walk<'a>(&'a self, root: &Path, options: &'a ScanOptions) -> Result<Walk<'a>> {
        Ok(Walk {
            discovery: self.discover(root, options)?,
            classifier: self,
        })
    }

    /// Size a category root. Probe failures become warnings.
    pub fn measure(&self, root: &CategoryRoot) -> RootMeasurement {
        match self.probe.measure(&root.path) {
            Ok(measurement) => {
                let mut warnings = measurement.skipped;
                if measurement.approximate {
                    warnings.push(ScanWarning::new(&root.path, WarningReason::ProbeTimeout));
                }
                tracing::debug!(
                    category = %root.category,
                    path = %root.path.display(),
                    size_kb = measurement.size_kb,
                    "Measured category root"
                );
                RootMeasurement {
                    hit: Some(self.hit(root, measurement.size_kb, measurement.approximate)),
                    warnings,
                }
            }
            Err(ProbeError::Timeout(_)) => RootMeasurement {
                hit: Some(self.hit(root, 0, true)),
                warnings: vec![ScanWarning::new(&root.path, WarningReason::ProbeTimeout)],
            },
            Err(ProbeError::Vanished(path)) => {
                tracing::warn!(path = %path.display(), "Category root vanished");
                RootMeasurement {
                    hit: None,
                    warnings: vec![ScanWarning::new(path, WarningReason::Vanished)],
                }
            }
            Err(e) => {
                tracing::warn!(path = %root.path.display(), error = %e, "Cannot measure category root");
                RootMeasurement {
                    hit: None,
                    warnings: vec![ScanWarning::new(
                        &root.path,
                        WarningReason::Unreadable(e.to_string()),
                    )],
                }
            }
        }
    }

    fn hit(&self, root: &CategoryRoot, size_kb: u64, approximate: bool) -> ScanHit {
        ScanHit {
            category: root.category,
            path: root.path.clone(),
            size_kb,
            approximate,
            discovered_at: root.discovered_at,
        }
    }
}

/// Lazy depth-first search for category roots.
///
/// Children are visited in name order, so the sequence is deterministic for
/// a fixed tree. Symlinks are never followed. Once a directory is a category
/// root its descendants are never inspected, which keeps roots disjoint.
pub struct Discovery<'a> {
    catalog: &'a PatternCatalog,
    options: &'a ScanOptions,
    root_dev: Option<u64>,
    stack: Vec<(PathBuf, usize)>,
    warnings: Vec<ScanWarning>,
    deadline: Option<Instant>,
    interrupted: bool,
    dirs_visited: u64,
    progress: Option<Arc<ScanProgress>>,
}

impl<'a> Discovery<'a> {
    /// Replace the deadline derived from `options.timeout`.
    pub fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_progress(mut self, progress: Option<Arc<ScanProgress>>) -> Self {
        self.progress = progress;
        self
    }

    /// Warnings recorded so far, in the order they happened.
    pub fn warnings(&self) -> &[ScanWarning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<ScanWarning> {
        self.warnings
    }

    /// True when the deadline stopped the walk with directories left.
    pub fn is_partial(&self) -> bool {
        self.interrupted
    }

    pub fn dirs_visited(&self) -> u64 {
        self.dirs_visited
    }

    fn deadline_passed(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    fn visit(&mut self, path: PathBuf, depth: usize) -> Option<CategoryRoot> {
        let read_dir = match fs::read_dir(&path) {
            Ok(rd) => rd,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable directory");
                self.warnings.push(ScanWarning::from_io(&path, &e));
                return None;
            }
        };

        self.dirs_visited += 1;
        if let Some(progress) = &self.progress {
            progress.visit_dir();
        }

        let mut markers = BTreeSet::new();
        let mut children = Vec::new();
        for entry in read_dir {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    self.warnings.push(ScanWarning::from_io(&path, &e));
                    continue;
                }
            };
            // file_type() does not follow symlinks, so links are never descended.
            match entry.file_type() {
                Ok(t) if t.is_dir() => children.push(entry.path()),
                Ok(_) => {}
                Err(e) => {
                    self.warnings.push(ScanWarning::from_io(&entry.path(), &e));
                    continue;
                }
            }
            markers.insert(entry.file_name().to_string_lossy().into_owned());
        }

        let shape = DirShape::new(path, markers);
        if let Some(rule) = self.catalog.classify(&shape) {
            if let Some(progress) = &self.progress {
                progress.discover();
            }
            return Some(CategoryRoot {
                category: rule.category,
                path: shape.path,
                depth,
                discovered_at: SystemTime::now(),
            });
        }

        if self.options.max_depth.is_some_and(|max| depth >= max) {
            return None;
        }

        children.sort();
        for child in children.into_iter().rev() {
            if self.should_descend(&child) {
                self.stack.push((child, depth + 1));
            }
        }

        None
    }

    fn should_descend(&self, path: &Path) -> bool {
        if ScanOptions::is_linux_virtual_fs(path) {
            return false;
        }

        let excluded = path
            .file_name()
            .is_some_and(|n| self.options.is_excluded(&n.to_string_lossy()));
        if excluded {
            return false;
        }

        if let Some(root_dev) = self.root_dev {
            // Unreadable metadata is reported when the directory is visited.
            if let Ok(meta) = fs::symlink_metadata(path) {
                if meta.dev() != root_dev {
                    return false;
                }
            }
        }

        true
    }
}

impl Iterator for Discovery<'_> {
    type Item = CategoryRoot;

    fn next(&mut self) -> Option<CategoryRoot> {
        while let Some((path, depth)) = self.stack.pop() {
            if self.deadline_passed() {
                tracing::warn!(
                    remaining = self.stack.len() + 1,
                    "Scan deadline exceeded, stopping walk"
                );
                self.interrupted = true;
                self.stack.clear();
                return None;
            }
            if let Some(root) = self.visit(path, depth) {
                return Some(root);
            }
        }
        None
    }
}

/// Lazy sequence of sized [`ScanHit`]s. The consumer may stop early.
pub struct Walk<'a> {
    discovery: Discovery<'a>,
    classifier: &'a Classifier,
}

impl Walk<'_> {
    pub fn warnings(&self) -> &[ScanWarning] {
        self.discovery.warnings()
    }

    pub fn is_partial(&self) -> bool {
        self.discovery.is_partial()
    }
}

impl Iterator for Walk<'_> {
    type Item = ScanHit;

    fn next(&mut self) -> Option<ScanHit> {
        loop {
            let root = self.discovery.next()?;
            let measured = self.classifier.measure(&root);
            self.discovery.warnings.extend(measured.warnings);
            if let Some(hit) = measured.hit {
                return Some(hit);
            }
        }
    }
}
