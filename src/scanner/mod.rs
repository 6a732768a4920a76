//! Directory walking, category classification and aggregation.

mod aggregate;
mod engine;
mod hit;
mod options;
mod progress;
mod walker;

pub use aggregate::{Aggregator, CategoryTotal};
pub use engine::{scan, ScanResult, Scanner};
pub use hit::{ScanHit, ScanWarning, WarningReason};
pub use options::{ScanOptions, LINUX_VIRTUAL_FS_PATHS};
pub use progress::ScanProgress;
pub use walker::{resolve_root, CategoryRoot, Classifier, Discovery, RootMeasurement, Walk};
