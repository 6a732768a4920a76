use std::path::PathBuf;
use thiserror::Error;

/// Fatal library errors. Anything not listed here degrades into a
/// [`ScanWarning`](crate::scanner::ScanWarning) on the result instead.
#[derive(Error, Debug)]
pub enum ReclaimError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Scan root not found: {0}")]
    RootNotFound(PathBuf),

    #[error("Scan root is not a directory: {0}")]
    RootNotADirectory(PathBuf),

    #[error("IO error at path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to start worker pool: {0}")]
    WorkerPool(String),
}

/// Errors reported by size probes. Never fatal to a scan.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Path vanished before it could be measured: {0}")]
    Vanished(PathBuf),

    #[error("Cannot read '{path}': {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Probe timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("External tool unavailable: {0}")]
    Unavailable(String),

    #[error("Unexpected probe output: {0}")]
    Parse(String),
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ReclaimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = ConfigError::Invalid("probe_timeout_secs must be positive".into());
        assert!(err.to_string().contains("probe_timeout_secs"));

        let err = ReclaimError::RootNotADirectory(PathBuf::from("/etc/hosts"));
        assert_eq!(err.to_string(), "Scan root is not a directory: /etc/hosts");
    }

    #[test]
    fn error_conversion() {
        let config_err = ConfigError::Invalid("test".into());
        let err: ReclaimError = config_err.into();
        assert!(matches!(err, ReclaimError::Config(_)));
    }

    #[test]
    fn probe_error_mentions_tool() {
        let err = ProbeError::Unavailable("docker: not found".into());
        assert!(err.to_string().contains("docker"));
    }
}
