//! Configuration errors

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating [`crate::Settings`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required key was not set anywhere.
    #[error("{0} is required but not set")]
    Missing(&'static str),

    /// A required key was set to an empty string.
    #[error("{0} must not be empty")]
    Empty(&'static str),

    /// A key was set to a value outside its accepted range or format.
    #[error("invalid value for {key}: {reason}")]
    InvalidValue {
        /// Environment variable name
        key: &'static str,
        /// What was wrong with it
        reason: String,
    },

    /// The `.env` file exists but could not be parsed.
    #[error("failed to read env file {}: {source}", path.display())]
    EnvFile {
        /// Path of the offending file
        path: PathBuf,
        /// Parser error
        #[source]
        source: dotenvy::Error,
    },

    /// The layered sources could not be merged or deserialized.
    #[error("configuration error: {0}")]
    Source(#[from] config::ConfigError),
}

/// Result type for configuration loading
pub type Result<T> = std::result::Result<T, ConfigError>;
