//! Artifact categories and the ordered rule table that assigns them.
//!
//! This module provides:
//! - [`Category`] and [`Safety`] with their fixed metadata
//! - [`Matcher`] predicates over a directory's [`DirShape`]
//! - [`PatternCatalog`], the first-match-wins rule table

mod category;
mod registry;
mod rule;
mod rules;

pub use category::{Category, Safety};
pub use registry::PatternCatalog;
pub use rule::{CategoryRule, DirShape, Matcher};
pub use rules::builtin_rules;
