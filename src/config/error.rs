//! Errors raised while locating, parsing or checking configuration.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// A loaded value is out of range or malformed
    #[error("Invalid {field}: {message}")]
    ValidationError { field: String, message: String },

    /// `ROSTER_APP_ENV` or `--env` named no known environment
    #[error("Unknown environment '{value}'. Valid values are: development, test, staging, production")]
    UnknownEnvironment { value: String },

    /// `ROSTER_CONFIG_DIR` and `ROSTER_CONFIG_FILE` were both set
    #[error("Conflicting configuration sources: {0}")]
    MutualExclusivityError(String),

    #[error(transparent)]
    Source(#[from] config::ConfigError),
}

impl ConfigError {
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        ConfigError::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn file_not_found<S: Into<String>>(path: S) -> Self {
        ConfigError::FileNotFound(path.into())
    }

    pub fn mutual_exclusivity<S: Into<String>>(message: S) -> Self {
        ConfigError::MutualExclusivityError(message.into())
    }
}
