//! Built-in rule table.
//!
//! Order is priority: the first rule that matches a directory decides its
//! category. Marker-based rules come before bare name rules, and the generic
//! `cache` rule is last so that more specific categories win.

use super::category::Category;
use super::rule::{CategoryRule, Matcher};

/// File extensions that mark a directory as holding model weights.
pub const MODEL_WEIGHT_EXTENSIONS: &[&str] =
    &[".pt", ".pkl", ".h5", ".ckpt", ".safetensors", ".bin"];

/// Returns the built-in rules in priority order.
pub fn builtin_rules() -> Vec<CategoryRule> {
    vec![
        CategoryRule::new(
            Category::Venv,
            Matcher::AnyMarker(&["pyvenv.cfg", "conda-meta"]),
        ),
        CategoryRule::new(Category::NodeModules, Matcher::Name(&["node_modules"])),
        CategoryRule::new(
            Category::CargoTarget,
            Matcher::All(vec![
                Matcher::Name(&["target"]),
                Matcher::AnyMarker(&["CACHEDIR.TAG", ".rustc_info.json"]),
            ]),
        ),
        CategoryRule::new(
            Category::Xcode,
            Matcher::Any(vec![
                Matcher::Name(&["DerivedData"]),
                Matcher::PathSuffix(&["Library/Developer/CoreSimulator"]),
            ]),
        ),
        CategoryRule::new(
            Category::ModelCheckpoint,
            Matcher::Any(vec![
                Matcher::Name(&["checkpoints", "lightning_logs"]),
                Matcher::PathSuffix(&[".cache/huggingface", ".cache/torch"]),
                Matcher::MarkerSuffix(MODEL_WEIGHT_EXTENSIONS),
            ]),
        ),
        CategoryRule::new(
            Category::Git,
            Matcher::All(vec![
                Matcher::Name(&[".git"]),
                Matcher::AllMarkers(&["HEAD", "objects"]),
            ]),
        ),
        CategoryRule::new(
            Category::Trash,
            Matcher::Any(vec![
                Matcher::Name(&[".Trash"]),
                Matcher::PathSuffix(&[".local/share/Trash"]),
            ]),
        ),
        CategoryRule::new(Category::Logs, Matcher::PathSuffix(&["Library/Logs"])),
        CategoryRule::new(
            Category::Cache,
            Matcher::Any(vec![
                Matcher::Name(&[
                    "__pycache__",
                    ".pytest_cache",
                    ".mypy_cache",
                    ".ruff_cache",
                    ".npm",
                    ".pnpm-store",
                    ".gradle",
                    "Caches",
                ]),
                Matcher::PathSuffix(&[
                    ".cache/pip",
                    ".cache/yarn",
                    ".cache/go-build",
                    ".cache/pnpm",
                    ".cache/npm",
                ]),
                Matcher::AnyMarker(&["CACHEDIR.TAG"]),
            ]),
        ),
    ]
}
