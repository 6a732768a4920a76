use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::catalog::{Category, PatternCatalog};
use crate::error::ConfigError;
use crate::scanner::ScanOptions;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scanner: ScannerConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Maximum descent depth below the root (unset = unlimited)
    pub max_depth: Option<usize>,
    /// Query Docker for its own usage accounting
    pub include_docker: bool,
    /// Overall scan deadline in seconds (unset = none)
    pub timeout_secs: Option<u64>,
    /// Per category root measurement limit in seconds
    pub probe_timeout_secs: Option<u64>,
    /// Number of parallel threads (0 = auto)
    pub parallel_threads: usize,
    /// Don't cross filesystem boundaries
    pub one_file_system: bool,
    /// Directory names to skip entirely
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Category ids to detect (empty = all)
    pub categories: Vec<String>,
    /// Category ids to never report
    pub disabled: Vec<String>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            include_docker: true,
            timeout_secs: None,
            probe_timeout_secs: Some(60),
            parallel_threads: 0,
            one_file_system: false,
            exclude: vec![],
        }
    }
}

impl Config {
    /// Default location: `$XDG_CONFIG_HOME/rusty-reclaim/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("rusty-reclaim").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default location is
    /// tried and a missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) if p.exists() => p,
                _ => return Ok(Self::default()),
            },
        };

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::ReadError {
            path: path.clone(),
            source,
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ParseError { path, source })?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scanner.timeout_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "scanner.timeout_secs must be positive".to_string(),
            ));
        }
        if self.scanner.probe_timeout_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "scanner.probe_timeout_secs must be positive".to_string(),
            ));
        }
        self.enabled_categories()?;
        self.disabled_categories()?;
        Ok(())
    }

    fn enabled_categories(&self) -> Result<Vec<Category>, ConfigError> {
        parse_categories(&self.catalog.categories)
    }

    fn disabled_categories(&self) -> Result<Vec<Category>, ConfigError> {
        parse_categories(&self.catalog.disabled)
    }

    /// The built-in catalog narrowed by the `[catalog]` section.
    pub fn catalog(&self) -> Result<PatternCatalog, ConfigError> {
        let enabled = self.enabled_categories()?;
        let disabled = self.disabled_categories()?;
        let catalog = if enabled.is_empty() {
            PatternCatalog::without_categories(&disabled)
        } else {
            PatternCatalog::with_categories(&enabled)
        };
        if enabled.is_empty() || disabled.is_empty() {
            return Ok(catalog);
        }
        let rules = catalog
            .rules()
            .iter()
            .filter(|r| !disabled.contains(&r.category))
            .cloned()
            .collect();
        Ok(PatternCatalog::from_rules(rules))
    }

    /// Whether the Docker category survives the `[catalog]` filters.
    pub fn docker_enabled(&self) -> bool {
        let enabled = self.enabled_categories().unwrap_or_default();
        let disabled = self.disabled_categories().unwrap_or_default();
        self.scanner.include_docker
            && (enabled.is_empty() || enabled.contains(&Category::Docker))
            && !disabled.contains(&Category::Docker)
    }

    /// Scan options seeded from the `[scanner]` section.
    pub fn scan_options(&self) -> ScanOptions {
        let mut options = ScanOptions::new()
            .with_docker(self.docker_enabled())
            .with_threads(self.scanner.parallel_threads)
            .with_one_file_system(self.scanner.one_file_system)
            .with_exclude(self.scanner.exclude.clone());
        options.max_depth = self.scanner.max_depth;
        options.timeout = self.scanner.timeout_secs.map(Duration::from_secs);
        options.probe_timeout = self.scanner.probe_timeout_secs.map(Duration::from_secs);
        options
    }
}

fn parse_categories(ids: &[String]) -> Result<Vec<Category>, ConfigError> {
    ids.iter()
        .map(|id| id.parse::<Category>().map_err(ConfigError::Invalid))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(config.scanner.include_docker);
        assert_eq!(config.scanner.probe_timeout_secs, Some(60));
    }

    #[test]
    fn config_serializes_to_toml() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[scanner]"));
        assert!(toml_str.contains("[catalog]"));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut config = Config::default();
        config.scanner.timeout_secs = Some(0);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn unknown_category_is_rejected() {
        let mut config = Config::default();
        config.catalog.disabled = vec!["bogus".to_string()];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("bogus"));
    }

    #[test]
    fn catalog_filters_apply() {
        let mut config = Config::default();
        config.catalog.disabled = vec!["git".to_string(), "trash".to_string()];
        let catalog = config.catalog().unwrap();
        let categories = catalog.categories();
        assert!(!categories.contains(&Category::Git));
        assert!(!categories.contains(&Category::Trash));
        assert!(categories.contains(&Category::NodeModules));
    }

    #[test]
    fn disabling_docker_turns_off_the_query() {
        let mut config = Config::default();
        assert!(config.scan_options().include_docker);
        config.catalog.disabled = vec!["docker".to_string()];
        assert!(!config.scan_options().include_docker);

        let mut config = Config::default();
        config.catalog.categories = vec!["venv".to_string()];
        assert!(!config.docker_enabled());
    }

    #[test]
    fn scan_options_follow_scanner_section() {
        let mut config = Config::default();
        config.scanner.max_depth = Some(4);
        config.scanner.timeout_secs = Some(30);
        config.scanner.exclude = vec!["vendor".to_string()];
        let options = config.scan_options();
        assert_eq!(options.max_depth, Some(4));
        assert_eq!(options.timeout, Some(Duration::from_secs(30)));
        assert_eq!(options.exclude, vec!["vendor".to_string()]);
    }
}
