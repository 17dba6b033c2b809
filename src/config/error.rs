//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Store base URL must start with http:// or https://")]
    InvalidStoreUrl,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Group and decimal separators must differ")]
    AmbiguousSeparators,

    #[error("Invalid log filter: {0}")]
    InvalidLogFilter(String),
}
