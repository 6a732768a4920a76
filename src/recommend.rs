//! Ranked cleanup recommendations derived from category totals.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::catalog::{Category, Safety};
use crate::scanner::CategoryTotal;

/// A read-only suggestion for one category. Never acted on by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    /// 1-based position after sorting.
    pub rank: usize,
    pub category: Category,
    pub label: &'static str,
    pub reclaimable_kb: u64,
    pub safety: Safety,
    pub action: &'static str,
    pub command: Option<&'static str>,
    pub instance_count: usize,
    /// Some instance was sized approximately, so `reclaimable_kb` undercounts.
    pub approximate: bool,
}

/// Pure policy turning totals into an ordered list of recommendations.
pub struct RecommendationEngine;

impl RecommendationEngine {
    /// One recommendation per category with a non-zero total, largest first.
    ///
    /// Ties are broken by category id so identical inputs always produce the
    /// same order.
    pub fn recommend(totals: &BTreeMap<Category, CategoryTotal>) -> Vec<Recommendation> {
        let mut recs: Vec<Recommendation> = totals
            .values()
            .filter(|t| t.total_size_kb > 0)
            .map(|t| Recommendation {
                rank: 0,
                category: t.category,
                label: t.category.label(),
                reclaimable_kb: t.total_size_kb,
                safety: t.category.default_safety(),
                action: t.category.action(),
                command: t.category.command(),
                instance_count: t.instance_count,
                approximate: t.is_approximate(),
            })
            .collect();

        recs.sort_by(|a, b| {
            b.reclaimable_kb
                .cmp(&a.reclaimable_kb)
                .then_with(|| a.category.id().cmp(b.category.id()))
        });

        for (i, rec) in recs.iter_mut().enumerate() {
            rec.rank = i + 1;
        }

        recs
    }

    /// Recommendations that can be acted on without review, rank order kept.
    pub fn safe_only(recommendations: &[Recommendation]) -> Vec<&Recommendation> {
        recommendations
            .iter()
            .filter(|r| r.safety == Safety::Safe)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::{Aggregator, ScanHit};
    use std::path::PathBuf;
    use std::time::SystemTime;

    fn totals(entries: &[(Category, u64)]) -> BTreeMap<Category, CategoryTotal> {
        let mut agg = Aggregator::new();
        for (i, (category, size_kb)) in entries.iter().enumerate() {
            agg.accumulate(ScanHit {
                category: *category,
                path: PathBuf::from(format!("/hit{}", i)),
                size_kb: *size_kb,
                approximate: false,
                discovered_at: SystemTime::UNIX_EPOCH,
            });
        }
        agg.finalize()
    }

    #[test]
    fn test_sorted_descending_by_size() {
        let recs = RecommendationEngine::recommend(&totals(&[
            (Category::Venv, 500),
            (Category::NodeModules, 2000),
            (Category::Docker, 1000),
        ]));
        let order: Vec<Category> = recs.iter().map(|r| r.category).collect();
        assert_eq!(
            order,
            vec![Category::NodeModules, Category::Docker, Category::Venv]
        );
        let ranks: Vec<usize> = recs.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn test_ties_broken_by_category_id() {
        let recs = RecommendationEngine::recommend(&totals(&[
            (Category::Venv, 100),
            (Category::Cache, 100),
            (Category::Git, 100),
        ]));
        let order: Vec<&str> = recs.iter().map(|r| r.category.id()).collect();
        assert_eq!(order, vec!["cache", "git", "venv"]);
    }

    #[test]
    fn test_zero_size_categories_are_omitted() {
        let recs = RecommendationEngine::recommend(&totals(&[
            (Category::Logs, 0),
            (Category::Trash, 10),
        ]));
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].category, Category::Trash);
    }

    #[test]
    fn test_uses_category_defaults() {
        let recs = RecommendationEngine::recommend(&totals(&[
            (Category::NodeModules, 10),
            (Category::NodeModules, 5),
            (Category::ModelCheckpoint, 1),
        ]));
        assert_eq!(recs[0].safety, Safety::Safe);
        assert_eq!(recs[0].reclaimable_kb, 15);
        assert_eq!(recs[0].instance_count, 2);
        assert_eq!(recs[0].action, Category::NodeModules.action());
        assert_eq!(recs[1].safety, Safety::Review);
    }

    #[test]
    fn test_empty_totals() {
        assert!(RecommendationEngine::recommend(&BTreeMap::new()).is_empty());
    }

    #[test]
    fn test_safe_only_keeps_rank_order() {
        let recs = RecommendationEngine::recommend(&totals(&[
            (Category::Docker, 900),
            (Category::Cache, 500),
            (Category::Venv, 700),
        ]));
        let safe: Vec<Category> = RecommendationEngine::safe_only(&recs)
            .iter()
            .map(|r| r.category)
            .collect();
        assert_eq!(safe, vec![Category::Venv, Category::Cache]);
    }

    #[test]
    fn test_deterministic_for_identical_input() {
        let input = totals(&[
            (Category::Git, 3),
            (Category::Xcode, 3),
            (Category::Cache, 9),
        ]);
        assert_eq!(
            RecommendationEngine::recommend(&input),
            RecommendationEngine::recommend(&input)
        );
    }
}
