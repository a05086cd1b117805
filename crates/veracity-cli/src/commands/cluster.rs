//! Cluster command implementation.

use super::{cluster_config, load_documents};
use crate::cli::ClusterArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use veracity_cluster::{ClusterEngine, ClusterStatistics};

/// Execute the cluster command.
pub fn execute_cluster(args: ClusterArgs, config: &Config, formatter: &Formatter) -> Result<String> {
    let documents = load_documents(&args.input)?;
    let engine = ClusterEngine::new(cluster_config(&config.cluster, &args.density)?)?;

    let clustering = engine.cluster(&documents);
    let stats = ClusterStatistics::from_clustering(&clustering);

    formatter.format_clustering(&clustering, &stats)
}
