//! Analyze command implementation.

use super::{cluster_config, load_documents};
use crate::cli::AnalyzeArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use tracing::info;
use veracity_cluster::ClusterEngine;
use veracity_patterns::PatternDetector;

/// Execute the analyze command.
pub fn execute_analyze(args: AnalyzeArgs, config: &Config, formatter: &Formatter) -> Result<String> {
    if let Some(threshold) = args.threshold {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(CliError::InvalidInput(format!(
                "Threshold must be between 0.0 and 1.0, got {}",
                threshold
            )));
        }
    }

    let documents = load_documents(&args.input)?;
    let engine = ClusterEngine::new(cluster_config(&config.cluster, &args.density)?)?;
    let detector = PatternDetector::new(config.patterns.clone(), config.credibility_table()?)?;

    let clustering = engine.cluster(&documents);
    let batch = detector.analyze_all(&clustering);
    info!(
        "Analyzed {} clusters, {} high risk",
        batch.summary.total_clusters_analyzed, batch.summary.high_risk_clusters
    );

    formatter.format_batch(&batch, args.threshold)
}
