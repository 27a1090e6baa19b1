//! Configuration error types.

use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("invalid request timeout")]
    InvalidTimeout,

    #[error("invalid max_tokens")]
    InvalidMaxTokens,

    #[error("session directory must be set for the file storage backend")]
    MissingSessionDir,
}
