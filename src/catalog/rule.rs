//! Path-shape predicates and the rules built from them.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::category::{Category, Safety};

/// What the classifier knows about a directory when it asks the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirShape {
    /// Full path of the directory.
    pub path: PathBuf,
    /// Last path component (empty for `/`).
    pub name: String,
    /// Names of the entries directly inside the directory, files and
    /// subdirectories alike.
    pub markers: BTreeSet<String>,
}

impl DirShape {
    pub fn new<I, S>(path: impl Into<PathBuf>, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            name,
            markers: markers.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_marker(&self, marker: &str) -> bool {
        self.markers.contains(marker)
    }
}

/// Predicate over a [`DirShape`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    /// Directory name is one of these.
    Name(&'static [&'static str]),
    /// At least one of these entries exists directly inside.
    AnyMarker(&'static [&'static str]),
    /// Every one of these entries exists directly inside.
    AllMarkers(&'static [&'static str]),
    /// Path ends with one of these relative paths (component-wise).
    PathSuffix(&'static [&'static str]),
    /// Some entry directly inside has a name ending in one of these
    /// extensions, with a non-empty stem.
    MarkerSuffix(&'static [&'static str]),
    All(Vec<Matcher>),
    Any(Vec<Matcher>),
}

impl Matcher {
    pub fn matches(&self, shape: &DirShape) -> bool {
        match self {
            Matcher::Name(names) => names.contains(&shape.name.as_str()),
            Matcher::AnyMarker(markers) => markers.iter().any(|m| shape.has_marker(m)),
            Matcher::AllMarkers(markers) => markers.iter().all(|m| shape.has_marker(m)),
            Matcher::PathSuffix(suffixes) => {
                suffixes.iter().any(|s| shape.path.ends_with(Path::new(s)))
            }
            Matcher::MarkerSuffix(suffixes) => shape.markers.iter().any(|m| {
                suffixes
                    .iter()
                    .any(|s| m.len() > s.len() && m.ends_with(s))
            }),
            Matcher::All(inner) => inner.iter().all(|m| m.matches(shape)),
            Matcher::Any(inner) => inner.iter().any(|m| m.matches(shape)),
        }
    }
}

/// One row of the pattern catalog: a predicate and the category it assigns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRule {
    pub category: Category,
    pub matcher: Matcher,
}

impl CategoryRule {
    pub fn new(category: Category, matcher: Matcher) -> Self {
        Self { category, matcher }
    }

    pub fn id(&self) -> &'static str {
        self.category.id()
    }

    pub fn safety(&self) -> Safety {
        self.category.default_safety()
    }

    pub fn label(&self) -> &'static str {
        self.category.label()
    }

    pub fn matches(&self, shape: &DirShape) -> bool {
        self.matcher.matches(shape)
    }
}
