//! Per-category accumulation of scan hits.

use serde::Serialize;
use std::collections::BTreeMap;

use super::hit::ScanHit;
use crate::catalog::Category;

/// Aggregated usage for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    /// Always the sum of `instances[*].size_kb`.
    pub total_size_kb: u64,
    pub instance_count: usize,
    /// Hits in discovery order.
    pub instances: Vec<ScanHit>,
}

impl CategoryTotal {
    fn new(category: Category) -> Self {
        Self {
            category,
            total_size_kb: 0,
            instance_count: 0,
            instances: Vec::new(),
        }
    }

    /// True when any instance was sized approximately.
    pub fn is_approximate(&self) -> bool {
        self.instances.iter().any(|h| h.approximate)
    }
}

/// Folds [`ScanHit`]s into [`CategoryTotal`]s. One instance per scan.
///
/// Callers must hand over each hit once, and hits must be disjoint (no hit
/// path below another). The classifier guarantees both; they are not
/// re-checked here.
#[derive(Debug, Default)]
pub struct Aggregator {
    totals: BTreeMap<Category, CategoryTotal>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accumulate(&mut self, hit: ScanHit) {
        let total = self
            .totals
            .entry(hit.category)
            .or_insert_with(|| CategoryTotal::new(hit.category));
        total.total_size_kb += hit.size_kb;
        total.instance_count += 1;
        total.instances.push(hit);
    }

    /// Total KiB accumulated so far across all categories.
    pub fn total_kb(&self) -> u64 {
        self.totals.values().map(|t| t.total_size_kb).sum()
    }

    /// Hand out the totals. Consumes the aggregator, so a session can only
    /// be finalized once.
    pub fn finalize(self) -> BTreeMap<Category, CategoryTotal> {
        self.totals
    }
}
