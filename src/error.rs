use std::path::PathBuf;

use thiserror::Error;

use crate::steps::StepKind;

/// Unified error type for release-pack operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version not found: no '{symbol}' declaration in {}", .path.display())]
    VersionNotFound { path: PathBuf, symbol: String },

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Version overflow: {value} cannot be incremented")]
    VersionOverflow { value: u64 },

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("{step} step failed: {message}")]
    Step { step: StepKind, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in release-pack
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        ReleaseError::Version(msg.into())
    }

    /// Create a packaging step failure for the named step
    pub fn step(step: StepKind, msg: impl Into<String>) -> Self {
        ReleaseError::Step {
            step,
            message: msg.into(),
        }
    }

    /// Whether this error means the version file had no version declaration
    pub fn is_version_not_found(&self) -> bool {
        matches!(self, ReleaseError::VersionNotFound { .. })
    }
}

impl From<toml::de::Error> for ReleaseError {
    fn from(err: toml::de::Error) -> Self {
        ReleaseError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReleaseError::config("test config issue");
        assert_eq!(err.to_string(), "Configuration error: test config issue");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ReleaseError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_version_not_found_names_symbol_and_path() {
        let err = ReleaseError::VersionNotFound {
            path: PathBuf::from("dir/version.nut"),
            symbol: "SELF_VERSION".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("SELF_VERSION"));
        assert!(msg.contains("dir/version.nut"));
        assert!(err.is_version_not_found());
    }

    #[test]
    fn test_step_error_names_step() {
        let err = ReleaseError::step(StepKind::Archive, "tar exited with status 2");
        assert_eq!(err.to_string(), "archive step failed: tar exited with status 2");
        assert!(!err.is_version_not_found());
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (ReleaseError::config("x"), "Configuration error"),
            (ReleaseError::version("x"), "Version parsing error"),
            (
                ReleaseError::VersionOverflow { value: u64::MAX },
                "Version overflow",
            ),
            (ReleaseError::step(StepKind::Stage, "x"), "stage step failed"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }

    #[test]
    fn test_toml_error_becomes_config_error() {
        let toml_err = toml::from_str::<toml::Value>("not = [valid").unwrap_err();
        let err: ReleaseError = toml_err.into();
        assert!(err.to_string().starts_with("Configuration error"));
    }
}
