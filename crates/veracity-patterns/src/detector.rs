//! Pattern detector: runs the four analyzers and aggregates them

use crate::aggregate::{AggregationStrategy, RiskAggregator};
use crate::analysis::{BatchAnalysis, PatternAnalysis, RiskSummary};
use crate::{
    analyze_credibility, analyze_growth, detect_contradictions, track_evolution, PatternConfig,
    PatternError,
};
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::{info, warn};
use veracity_cluster::Clustering;
use veracity_domain::{Availability, ClusterId, Document, SourceCredibilityTable};

/// Stateless cluster risk analyzer
///
/// Holds validated configuration and an immutable credibility table. Every
/// call works only on the documents it is given, so one detector can be
/// shared across threads.
///
/// # Examples
///
/// ```
/// use veracity_domain::{ClusterId, Document, SourceCredibilityTable};
/// use veracity_patterns::{PatternConfig, PatternDetector};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let detector = PatternDetector::new(
///     PatternConfig::default(),
///     SourceCredibilityTable::reference(),
/// )?;
///
/// let docs = vec![
///     Document::new("a", "Bridge closed").with_source("Reuters"),
///     Document::new("b", "Bridge closed for repairs").with_source("BBC"),
/// ];
/// let analysis = detector.analyze_cluster(&ClusterId::new("cluster_0"), &docs);
/// assert_eq!(analysis.datapoint_count, 2);
/// assert!((0.0..=1.0).contains(&analysis.overall_risk_score));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PatternDetector {
    config: PatternConfig,
    credibility: SourceCredibilityTable,
    aggregator: RiskAggregator,
}

impl PatternDetector {
    /// Create a detector, rejecting invalid configuration
    pub fn new(
        config: PatternConfig,
        credibility: SourceCredibilityTable,
    ) -> Result<Self, PatternError> {
        config.validate()?;
        let aggregator = RiskAggregator::new(config.risk.clone())?;
        Ok(Self {
            config,
            credibility,
            aggregator,
        })
    }

    /// Replace the aggregation strategy with a custom one
    pub fn with_strategy(mut self, strategy: Box<dyn AggregationStrategy>) -> Self {
        self.aggregator = self.aggregator.with_strategy(strategy);
        self
    }

    /// Active configuration
    pub fn config(&self) -> &PatternConfig {
        &self.config
    }

    /// Credibility table in use
    pub fn credibility_table(&self) -> &SourceCredibilityTable {
        &self.credibility
    }

    /// Analyze one cluster's documents
    pub fn analyze_cluster(&self, cluster_id: &ClusterId, documents: &[Document]) -> PatternAnalysis {
        let ((growth, credibility), (contradiction, evolution)) = rayon::join(
            || {
                rayon::join(
                    || analyze_growth(documents, &self.config.growth),
                    || {
                        analyze_credibility(
                            documents,
                            &self.credibility,
                            &self.config.credibility,
                        )
                    },
                )
            },
            || {
                rayon::join(
                    || detect_contradictions(documents, &self.config.contradiction),
                    || track_evolution(documents, &self.config.evolution),
                )
            },
        );

        for (name, availability) in [
            ("growth", growth.availability),
            ("credibility", credibility.availability),
            ("contradiction", contradiction.availability),
            ("evolution", evolution.availability),
        ] {
            if availability != Availability::Available {
                warn!(
                    "Cluster {}: {} analysis is {:?}",
                    cluster_id, name, availability
                );
            }
        }

        let analysis = self.aggregator.aggregate(
            cluster_id.clone(),
            documents.len(),
            growth,
            credibility,
            contradiction,
            evolution,
        );

        info!(
            "Cluster {}: {} documents, risk {:.3} ({}), {} flag(s)",
            cluster_id,
            analysis.datapoint_count,
            analysis.overall_risk_score,
            analysis.risk_level,
            analysis.flags.flag_count
        );

        analysis
    }

    /// Analyze every cluster of a clustering run in parallel
    pub fn analyze_all(&self, clustering: &Clustering) -> BatchAnalysis {
        info!("Analyzing {} clusters", clustering.cluster_count());

        let analyses: BTreeMap<ClusterId, PatternAnalysis> = clustering
            .clusters
            .par_iter()
            .map(|(id, docs)| (id.clone(), self.analyze_cluster(id, docs)))
            .collect();

        let summary = RiskSummary::from_analyses(analyses.values());
        info!(
            "Batch complete: {} high, {} medium, {} low risk",
            summary.high_risk_clusters, summary.medium_risk_clusters, summary.low_risk_clusters
        );

        BatchAnalysis {
            analyses,
            summary,
            noise_count: clustering.noise_count(),
            skipped_count: clustering.skipped_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::MaxAggregation;
    use chrono::{Duration, TimeZone, Utc};
    use veracity_cluster::{ClusterConfig, ClusterEngine};
    use veracity_domain::RiskLevel;

    fn detector() -> PatternDetector {
        PatternDetector::new(PatternConfig::default(), SourceCredibilityTable::reference()).unwrap()
    }

    fn newsroom() -> Vec<Document> {
        let base = Utc.with_ymd_and_hms(2024, 5, 4, 9, 0, 0).unwrap();
        vec![
            Document::new("s1", "Storm floods coastal town")
                .with_source("Reuters")
                .with_embedding(vec![1.0, 0.0, 0.0])
                .published(base),
            Document::new("s2", "Coastal town flooding worsens")
                .with_source("BBC")
                .with_embedding(vec![0.98, 0.05, 0.0])
                .published(base + Duration::hours(2)),
            Document::new("s3", "Town flooding photos debunked")
                .with_source("Blog")
                .with_embedding(vec![0.97, 0.1, 0.0])
                .published(base + Duration::hours(3)),
            Document::new("e1", "Council vote delayed")
                .with_source("The Hindu")
                .with_embedding(vec![0.0, 0.0, 1.0])
                .published(base),
            Document::new("e2", "Council vote postponed again")
                .with_source("NPR")
                .with_embedding(vec![0.0, 0.05, 0.99])
                .published(base + Duration::hours(1)),
        ]
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = PatternConfig::default();
        config.risk.high_threshold = 2.0;
        assert!(PatternDetector::new(config, SourceCredibilityTable::reference()).is_err());
    }

    #[test]
    fn test_analyze_all() {
        let engine = ClusterEngine::new(ClusterConfig::default()).unwrap();
        let clustering = engine.cluster(&newsroom());
        assert_eq!(clustering.cluster_count(), 2);

        let batch = detector().analyze_all(&clustering);
        assert_eq!(batch.summary.total_clusters_analyzed, 2);
        assert_eq!(batch.analyses.len(), 2);

        let storm = &batch.analyses[&ClusterId::from_index(0)];
        assert_eq!(storm.datapoint_count, 3);
        assert!(storm.contradiction.contradiction_count >= 1);
        assert!(storm.flags.has_contradictions);
        assert_eq!(storm.aggregation, "mean");

        let mean = storm.sub_scores().iter().sum::<f64>() / 4.0;
        assert!((storm.overall_risk_score - mean).abs() < 1e-12);

        let counted = batch.summary.high_risk_clusters
            + batch.summary.medium_risk_clusters
            + batch.summary.low_risk_clusters;
        assert_eq!(counted, 2);
    }

    #[test]
    fn test_above_threshold_sorted() {
        let engine = ClusterEngine::new(ClusterConfig::default()).unwrap();
        let batch = detector().analyze_all(&engine.cluster(&newsroom()));

        let all = batch.above_threshold(0.0);
        assert_eq!(all.len(), 2);
        assert!(all[0].overall_risk_score >= all[1].overall_risk_score);
        assert!(batch.above_threshold(1.1).is_empty());
    }

    #[test]
    fn test_degraded_analyzers_do_not_fail() {
        let docs = vec![Document::new("x", "Lone untimed story")];
        let analysis = detector().analyze_cluster(&ClusterId::new("solo"), &docs);

        assert_eq!(analysis.growth.availability, Availability::Unavailable);
        assert_eq!(analysis.evolution.availability, Availability::Unavailable);
        assert_eq!(analysis.contradiction.availability, Availability::Degraded);
        assert_eq!(analysis.credibility.availability, Availability::Available);
        assert!((0.0..=1.0).contains(&analysis.overall_risk_score));
    }

    #[test]
    fn test_custom_strategy() {
        let detector = detector().with_strategy(Box::new(MaxAggregation));
        let analysis = detector.analyze_cluster(&ClusterId::new("c"), &newsroom()[..3]);

        let max = analysis.sub_scores().iter().copied().fold(0.0, f64::max);
        assert_eq!(analysis.overall_risk_score, max);
        assert_eq!(analysis.aggregation, "max");
    }

    #[test]
    fn test_analysis_serializes_snake_case() {
        let analysis = detector().analyze_cluster(&ClusterId::new("c"), &newsroom()[..3]);
        let json = serde_json::to_value(&analysis).unwrap();

        assert!(matches!(json["risk_level"].as_str(), Some("low" | "medium" | "high")));
        // s1 and s2 report the same flood; only the debunking s3 opposes them
        let pairs = json["contradiction"]["contradiction_pairs"].as_array().unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0]["contradiction_type"], "fact_check_vs_claim");
        assert_eq!(pairs[0]["strength"], "strong");
        assert_eq!(pairs[0]["basis"], "embedding");
        assert_eq!(pairs[1]["second"]["id"], "s3");
        assert!(json["analyzed_at"].as_str().is_some());
        assert!(json["growth"]["first_published_at"].as_str().is_some());
    }

    #[test]
    fn test_credible_same_story_coverage_stays_unflagged() {
        let base = Utc.with_ymd_and_hms(2024, 5, 4, 9, 0, 0).unwrap();
        let docs: Vec<Document> = [
            ("r", "Storm floods coastal town", "Reuters"),
            ("b", "Coastal town flooded as storm hits", "BBC"),
            ("ap", "Storm leaves coastal town under water", "AP News"),
            ("g", "Residents evacuated as coastal town floods", "The Guardian"),
        ]
        .iter()
        .enumerate()
        .map(|(i, (id, title, source))| {
            Document::new(*id, *title)
                .with_source(*source)
                .with_embedding(vec![1.0, 0.02 * i as f32, 0.0])
                .published(base + Duration::hours(i as i64))
        })
        .collect();

        let analysis = detector().analyze_cluster(&ClusterId::new("storm"), &docs);
        assert_eq!(analysis.contradiction.contradiction_count, 0);
        assert!(!analysis.flags.has_contradictions);
        assert_eq!(analysis.contradiction.risk_score, 0.0);
    }

    #[test]
    fn test_summary_report() {
        let engine = ClusterEngine::new(ClusterConfig::default()).unwrap();
        let batch = detector().analyze_all(&engine.cluster(&newsroom()));
        let report = batch.summary.summary();
        assert!(report.contains("Clusters analyzed: 2"));
        assert!(!batch.analyses.values().any(|a| a.risk_level > RiskLevel::High));
    }
}
