//! The scan entry point: walk, size in parallel, aggregate, recommend.

use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};
use std::time::{Instant, SystemTime};

use crate::catalog::{Category, PatternCatalog};
use crate::error::{ReclaimError, Result};
use crate::probe::{check_disk_usage, DiskOverview, DockerCli, DockerProbe, DockerUsage, FsSizeProbe};
use crate::recommend::{Recommendation, RecommendationEngine};

use super::aggregate::{Aggregator, CategoryTotal};
use super::hit::{ScanHit, ScanWarning, WarningReason};
use super::options::ScanOptions;
use super::progress::ScanProgress;
use super::walker::{resolve_root, CategoryRoot, Classifier, Discovery, RootMeasurement};

/// Immutable snapshot handed to display and JSON layers.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    /// Canonical root that was scanned
    pub root: PathBuf,
    pub started_at: SystemTime,
    pub finished_at: SystemTime,
    pub totals: BTreeMap<Category, CategoryTotal>,
    pub recommendations: Vec<Recommendation>,
    /// Raw container runtime accounting, when it was queried successfully
    pub docker: Option<DockerUsage>,
    /// Capacity of the filesystem holding the root
    pub disk: Option<DiskOverview>,
    pub warnings: Vec<ScanWarning>,
    /// The overall deadline stopped the scan early; totals undercount
    pub partial: bool,
    /// KiB attributed to any category (informational)
    pub total_scanned_kb: u64,
    pub dirs_visited: u64,
}

impl ScanResult {
    /// True when the result is known to undercount a full scan.
    pub fn approximate(&self) -> bool {
        self.partial || self.totals.values().any(|t| t.is_approximate())
    }

    pub fn total_reclaimable_kb(&self) -> u64 {
        self.recommendations.iter().map(|r| r.reclaimable_kb).sum()
    }

    pub fn total(&self, category: Category) -> Option<&CategoryTotal> {
        self.totals.get(&category)
    }
}

struct TreeOutcome {
    hits: Vec<ScanHit>,
    warnings: Vec<ScanWarning>,
    partial: bool,
    dirs_visited: u64,
}

/// Runs scans with a fixed catalog and set of probes.
pub struct Scanner {
    classifier: Classifier,
    docker: Box<dyn DockerProbe>,
    progress: Option<Arc<ScanProgress>>,
}

impl Scanner {
    pub fn new(classifier: Classifier, docker: Box<dyn DockerProbe>) -> Self {
        Self {
            classifier,
            docker,
            progress: None,
        }
    }

    /// Scanner backed by the real filesystem and the `docker` CLI.
    pub fn with_defaults(catalog: PatternCatalog, options: &ScanOptions) -> Self {
        let probe = FsSizeProbe::with_timeout(options.probe_timeout);
        Self::new(
            Classifier::new(catalog, Box::new(probe)),
            Box::new(DockerCli::new()),
        )
    }

    pub fn with_progress(mut self, progress: Arc<ScanProgress>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Scan `root`. Fails only when the root is missing or not a directory;
    /// every other problem ends up in [`ScanResult::warnings`].
    pub fn scan(&self, root: &Path, options: &ScanOptions) -> Result<ScanResult> {
        let started_at = SystemTime::now();
        let deadline = options.timeout.map(|t| Instant::now() + t);
        let root = resolve_root(root)?;

        tracing::info!(root = %root.display(), "Starting scan");

        let discovery = self
            .classifier
            .discover(&root, options)?
            .with_deadline(deadline)
            .with_progress(self.progress.clone());

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(options.threads)
            .build()
            .map_err(|e| ReclaimError::WorkerPool(e.to_string()))?;

        let (tree, docker) = pool.install(|| {
            rayon::join(
                || self.scan_tree(discovery, deadline),
                || options.include_docker.then(|| self.docker.usage()),
            )
        });

        let mut warnings = tree.warnings;
        let mut aggregator = Aggregator::new();
        for hit in tree.hits {
            aggregator.accumulate(hit);
        }

        let docker = match docker {
            Some(Ok(usage)) => {
                for hit in usage.to_hits(SystemTime::now()) {
                    aggregator.accumulate(hit);
                }
                Some(usage)
            }
            Some(Err(e)) => {
                tracing::warn!(error = %e, "Docker usage unavailable");
                warnings.push(ScanWarning::new(
                    "docker",
                    WarningReason::ExternalToolUnavailable(e.to_string()),
                ));
                None
            }
            None => None,
        };

        let disk = match check_disk_usage(&root) {
            Ok(overview) => Some(overview),
            Err(e) => {
                warnings.push(ScanWarning::new(
                    &root,
                    WarningReason::DiskInfoUnavailable(e.to_string()),
                ));
                None
            }
        };

        let total_scanned_kb = aggregator.total_kb();
        let totals = aggregator.finalize();
        let recommendations = RecommendationEngine::recommend(&totals);

        tracing::info!(
            categories = totals.len(),
            total_kb = total_scanned_kb,
            warnings = warnings.len(),
            partial = tree.partial,
            "Scan finished"
        );

        Ok(ScanResult {
            root,
            started_at,
            finished_at: SystemTime::now(),
            totals,
            recommendations,
            docker,
            disk,
            warnings,
            partial: tree.partial,
            total_scanned_kb,
            dirs_visited: tree.dirs_visited,
        })
    }

    /// Walk on a dedicated thread and size each category root on the pool
    /// as soon as it is found, so a deadline keeps whatever was sized before
    /// it. Results are put back in discovery order before aggregation.
    fn scan_tree(&self, discovery: Discovery<'_>, deadline: Option<Instant>) -> TreeOutcome {
        let (tx, rx) = mpsc::channel::<(usize, CategoryRoot)>();

        let (discovery, mut measured) = std::thread::scope(|s| {
            let walker = s.spawn(move || {
                let mut discovery = discovery;
                for (index, root) in discovery.by_ref().enumerate() {
                    if tx.send((index, root)).is_err() {
                        break;
                    }
                }
                discovery
            });

            let measured: Vec<(usize, Option<RootMeasurement>)> = rx
                .into_iter()
                .par_bridge()
                .map(|(index, root)| (index, self.measure_before(&root, deadline)))
                .collect();

            match walker.join() {
                Ok(discovery) => (discovery, measured),
                Err(panic) => std::panic::resume_unwind(panic),
            }
        });
        measured.sort_by_key(|(index, _)| *index);

        let mut partial = discovery.is_partial();
        let dirs_visited = discovery.dirs_visited();
        let mut warnings = discovery.into_warnings();

        let mut hits = Vec::with_capacity(measured.len());
        for (_, measurement) in measured {
            match measurement {
                Some(m) => {
                    warnings.extend(m.warnings);
                    hits.extend(m.hit);
                }
                None => partial = true,
            }
        }

        TreeOutcome {
            hits,
            warnings,
            partial,
            dirs_visited,
        }
    }

    /// Size one root unless the deadline has already passed.
    fn measure_before(
        &self,
        root: &CategoryRoot,
        deadline: Option<Instant>,
    ) -> Option<RootMeasurement> {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            tracing::debug!(path = %root.path.display(), "Deadline passed, not measuring");
            return None;
        }
        if let Some(progress) = &self.progress {
            progress.start_measuring(&root.path);
        }
        let measurement = self.classifier.measure(root);
        if let Some(progress) = &self.progress {
            progress.finish_measuring(&root.path);
        }
        Some(measurement)
    }
}

/// Scan `root` with the built-in catalog, the filesystem probe and the
/// `docker` CLI.
pub fn scan(root: &Path, options: &ScanOptions) -> Result<ScanResult> {
    Scanner::with_defaults(PatternCatalog::new(), options).scan(root, options)
}
