//! Error types for clustering operations

use thiserror::Error;

/// Errors that can occur while configuring or running the clustering engine
///
/// Per-document problems are never errors here; they are reported as
/// skipped documents on the result.
#[derive(Error, Debug)]
pub enum ClusterError {
    /// A parameter is outside its valid range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Not enough usable documents for a diagnostic
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Configuration text could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for ClusterError {
    fn from(e: toml::de::Error) -> Self {
        ClusterError::Parse(e.to_string())
    }
}

impl From<toml::ser::Error> for ClusterError {
    fn from(e: toml::ser::Error) -> Self {
        ClusterError::Serialization(e.to_string())
    }
}
