//! Command implementations.
//!
//! Each command renders its report to a string; `main` decides where it
//! goes.

pub mod analyze;
pub mod cluster;
pub mod diagnose;
pub mod tune;

pub use self::analyze::execute_analyze;
pub use self::cluster::execute_cluster;
pub use self::diagnose::execute_diagnose;
pub use self::tune::execute_tune;

use crate::cli::DensityArgs;
use crate::error::{CliError, Result};
use std::fs;
use std::path::Path;
use tracing::debug;
use veracity_cluster::ClusterConfig;
use veracity_domain::Document;

/// Read a JSON array of documents.
pub fn load_documents(path: &Path) -> Result<Vec<Document>> {
    let contents = fs::read_to_string(path).map_err(|e| {
        CliError::InvalidInput(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let documents: Vec<Document> = serde_json::from_str(&contents).map_err(|e| {
        CliError::InvalidInput(format!("{} is not a JSON array of documents: {}", path.display(), e))
    })?;
    debug!("Loaded {} documents from {}", documents.len(), path.display());
    Ok(documents)
}

/// Apply command-line density overrides on top of the configured values.
pub fn cluster_config(base: &ClusterConfig, overrides: &DensityArgs) -> Result<ClusterConfig> {
    let mut config = base.clone();
    if let Some(eps) = overrides.eps {
        config.eps = eps;
    }
    if let Some(min_samples) = overrides.min_samples {
        config.min_samples = min_samples;
    }
    config.validate()?;
    Ok(config)
}
