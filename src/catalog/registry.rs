//! The ordered pattern catalog consulted by the classifier.

use super::category::Category;
use super::rule::{CategoryRule, DirShape};
use super::rules::builtin_rules;
use std::collections::HashSet;

/// Ordered table of [`CategoryRule`]s; the first match wins.
///
/// Filtering keeps the relative priority of the remaining rules, which is
/// what config options like `categories = ["venv", "cache"]` rely on.
#[derive(Debug, Clone)]
pub struct PatternCatalog {
    rules: Vec<CategoryRule>,
}

impl PatternCatalog {
    /// Create a catalog with all built-in rules.
    pub fn new() -> Self {
        Self {
            rules: builtin_rules(),
        }
    }

    /// Create a catalog from explicit rules, in priority order.
    pub fn from_rules(rules: Vec<CategoryRule>) -> Self {
        Self { rules }
    }

    /// Create a catalog with only the rules for the given categories.
    ///
    /// # Example
    /// ```
    /// use rusty_reclaim::catalog::{Category, PatternCatalog};
    ///
    /// let catalog = PatternCatalog::with_categories(&[Category::Venv, Category::NodeModules]);
    /// assert_eq!(catalog.len(), 2);
    /// ```
    pub fn with_categories(categories: &[Category]) -> Self {
        let wanted: HashSet<Category> = categories.iter().copied().collect();
        Self {
            rules: builtin_rules()
                .into_iter()
                .filter(|r| wanted.contains(&r.category))
                .collect(),
        }
    }

    /// Create a catalog without the rules for the given categories.
    pub fn without_categories(categories: &[Category]) -> Self {
        let unwanted: HashSet<Category> = categories.iter().copied().collect();
        Self {
            rules: builtin_rules()
                .into_iter()
                .filter(|r| !unwanted.contains(&r.category))
                .collect(),
        }
    }

    /// First rule matching the directory, if any. No I/O.
    pub fn classify(&self, shape: &DirShape) -> Option<&CategoryRule> {
        self.rules.iter().find(|r| r.matches(shape))
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Categories in priority order.
    pub fn categories(&self) -> Vec<Category> {
        self.rules.iter().map(|r| r.category).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for PatternCatalog {
    fn default() -> Self {
        Self::new()
    }
}
