//! Artifact categories and their fixed metadata.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How risky it is to act on a recommendation for a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Safety {
    /// Low-risk, the content is rebuilt or re-downloaded on demand.
    Safe,
    /// May hold data that cannot be recovered; a human should look first.
    Review,
}

impl fmt::Display for Safety {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Safety::Safe => f.pad("SAFE"),
            Safety::Review => f.pad("REVIEW"),
        }
    }
}

/// A classification bucket for disk usage.
///
/// Variants are declared in id order so that the derived `Ord` matches
/// lexical ordering of [`Category::id`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Cache,
    CargoTarget,
    Docker,
    Git,
    Logs,
    ModelCheckpoint,
    NodeModules,
    Trash,
    Venv,
    Xcode,
}

impl Category {
    /// Every category, in id order.
    pub const ALL: [Category; 10] = [
        Category::Cache,
        Category::CargoTarget,
        Category::Docker,
        Category::Git,
        Category::Logs,
        Category::ModelCheckpoint,
        Category::NodeModules,
        Category::Trash,
        Category::Venv,
        Category::Xcode,
    ];

    /// Stable identifier, also used in config files and JSON output.
    pub fn id(&self) -> &'static str {
        match self {
            Category::Cache => "cache",
            Category::CargoTarget => "cargo_target",
            Category::Docker => "docker",
            Category::Git => "git",
            Category::Logs => "logs",
            Category::ModelCheckpoint => "model_checkpoint",
            Category::NodeModules => "node_modules",
            Category::Trash => "trash",
            Category::Venv => "venv",
            Category::Xcode => "xcode",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Cache => "Caches",
            Category::CargoTarget => "Cargo build output",
            Category::Docker => "Docker",
            Category::Git => "Git metadata",
            Category::Logs => "Logs",
            Category::ModelCheckpoint => "ML model checkpoints",
            Category::NodeModules => "node_modules",
            Category::Trash => "Trash",
            Category::Venv => "Python virtual environments",
            Category::Xcode => "Xcode / developer data",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Category::Cache => "Package manager, tool and application caches",
            Category::CargoTarget => "Rust `target/` directories produced by cargo",
            Category::Docker => "Docker images, containers, volumes and build cache",
            Category::Git => "Version-control object stores (.git directories)",
            Category::Logs => "Application log files",
            Category::ModelCheckpoint => "Machine learning weights, checkpoints and hub caches",
            Category::NodeModules => "Node.js dependency directories",
            Category::Trash => "Files already moved to the desktop trash",
            Category::Venv => "Python virtual environments (venv, virtualenv, conda)",
            Category::Xcode => "Xcode derived data and simulator images",
        }
    }

    /// Safety tier every recommendation for this category starts with.
    pub fn default_safety(&self) -> Safety {
        match self {
            Category::Cache
            | Category::CargoTarget
            | Category::Logs
            | Category::NodeModules
            | Category::Trash
            | Category::Venv => Safety::Safe,
            Category::Docker | Category::Git | Category::ModelCheckpoint | Category::Xcode => {
                Safety::Review
            }
        }
    }

    /// Human-readable remedial action.
    pub fn action(&self) -> &'static str {
        match self {
            Category::Cache => "Safe to delete; tools rebuild their caches on demand",
            Category::CargoTarget => "Safe to delete; rebuilt by the next `cargo build`",
            Category::Docker => "Review the image and volume list before pruning",
            Category::Git => "Review; history that was never pushed cannot be recovered",
            Category::Logs => "Safe to delete old log files",
            Category::ModelCheckpoint => {
                "Review; re-download only works for weights published upstream"
            }
            Category::NodeModules => "Safe to delete, reinstall via package manager",
            Category::Trash => "Safe to empty the trash",
            Category::Venv => "Safe to delete; recreate with `python -m venv` and reinstall",
            Category::Xcode => "Review; delete DerivedData and remove unused simulators via Xcode",
        }
    }

    /// Shell command an external executor could run, if one applies.
    pub fn command(&self) -> Option<&'static str> {
        match self {
            Category::Cache => Some("npm cache clean --force && pip cache purge"),
            Category::CargoTarget => Some("cargo clean"),
            Category::Docker => Some("docker system prune -a"),
            Category::Git => Some("git gc --aggressive --prune=now"),
            Category::Logs => Some("rm -rf ~/Library/Logs/*"),
            Category::ModelCheckpoint => None,
            Category::NodeModules => {
                Some("find . -name node_modules -type d -prune -exec rm -rf {} +")
            }
            Category::Trash => Some("rm -rf ~/.local/share/Trash/* ~/.Trash/*"),
            Category::Venv => None,
            Category::Xcode => Some("rm -rf ~/Library/Developer/Xcode/DerivedData"),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.id())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.id() == s)
            .ok_or_else(|| format!("unknown category '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ord_matches_id_order() {
        let mut ids: Vec<&str> = Category::ALL.iter().map(|c| c.id()).collect();
        let declared = ids.clone();
        ids.sort();
        assert_eq!(ids, declared);

        let mut sorted = Category::ALL.to_vec();
        sorted.sort();
        assert_eq!(sorted, Category::ALL.to_vec());
    }

    #[test]
    fn test_from_str_round_trips_ids() {
        for category in Category::ALL {
            assert_eq!(category.id().parse::<Category>(), Ok(category));
        }
        assert!("bogus".parse::<Category>().is_err());
    }

    #[test]
    fn test_default_safety_tiers() {
        assert_eq!(Category::NodeModules.default_safety(), Safety::Safe);
        assert_eq!(Category::Venv.default_safety(), Safety::Safe);
        assert_eq!(Category::Docker.default_safety(), Safety::Review);
        assert_eq!(Category::ModelCheckpoint.default_safety(), Safety::Review);
    }

    #[test]
    fn test_serde_ids() {
        let json = serde_json::to_string(&Category::ModelCheckpoint).unwrap();
        assert_eq!(json, "\"model_checkpoint\"");
        let json = serde_json::to_string(&Safety::Review).unwrap();
        assert_eq!(json, "\"REVIEW\"");
    }
}
