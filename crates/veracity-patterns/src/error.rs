//! Error types for pattern analysis

use thiserror::Error;
use veracity_domain::DomainError;

/// Errors that can occur while configuring the pattern detector
///
/// Analysis itself never fails: degenerate data yields zero-confidence
/// sub-results instead.
#[derive(Error, Debug)]
pub enum PatternError {
    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration text could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for PatternError {
    fn from(e: toml::de::Error) -> Self {
        PatternError::Parse(e.to_string())
    }
}

impl From<toml::ser::Error> for PatternError {
    fn from(e: toml::ser::Error) -> Self {
        PatternError::Serialization(e.to_string())
    }
}

impl From<DomainError> for PatternError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Config(msg) => PatternError::Config(msg),
            DomainError::Parse(msg) => PatternError::Parse(msg),
        }
    }
}
