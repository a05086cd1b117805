//! Domain error types

use thiserror::Error;

/// Errors raised while building domain values from configuration
#[derive(Error, Debug)]
pub enum DomainError {
    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration text could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<toml::de::Error> for DomainError {
    fn from(e: toml::de::Error) -> Self {
        DomainError::Parse(e.to_string())
    }
}
