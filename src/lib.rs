//! Rusty Reclaim - find where developer disk space went
//!
//! This crate provides functionality for:
//! - Walking a directory tree and classifying developer artifacts
//!   (dependency trees, build outputs, caches, virtual environments...)
//! - Sizing each category and querying Docker's own accounting
//! - Ranking categories into read-only cleanup recommendations
//!
//! Nothing is ever deleted by this crate.

pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod probe;
pub mod recommend;
pub mod report;
pub mod scanner;

// Re-export commonly used types
pub use catalog::{Category, PatternCatalog, Safety};
pub use config::Config;
pub use error::{ReclaimError, Result};
pub use recommend::{Recommendation, RecommendationEngine};
pub use scanner::{scan, ScanOptions, ScanResult, Scanner};
