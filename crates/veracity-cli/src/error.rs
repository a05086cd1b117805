//! Error types for the CLI application.

use thiserror::Error;
use veracity_cluster::ClusterError;
use veracity_domain::DomainError;
use veracity_patterns::PatternError;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Clustering error
    #[error("Clustering error: {0}")]
    Cluster(#[from] ClusterError),

    /// Pattern analysis error
    #[error("Pattern analysis error: {0}")]
    Pattern(#[from] PatternError),

    /// Credibility table error
    #[error("Credibility table error: {0}")]
    Domain(#[from] DomainError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}
