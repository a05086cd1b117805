//! Analysis records produced for each cluster and for a whole batch

use crate::contradiction::ContradictionResult;
use crate::credibility::CredibilityResult;
use crate::evolution::EvolutionResult;
use crate::growth::GrowthResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use veracity_domain::{ClusterId, RiskFlags, RiskLevel};

/// Risk assessment of one cluster
///
/// Created fresh by every analysis call and never mutated afterwards. A
/// collaborator that persists it should key it by
/// `(cluster_id, analyzed_at)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternAnalysis {
    /// Cluster analyzed
    pub cluster_id: ClusterId,
    /// Documents in the cluster
    pub datapoint_count: usize,
    /// Aggregated score in [0, 1]
    pub overall_risk_score: f64,
    /// Bucket of the aggregated score
    pub risk_level: RiskLevel,
    /// Red flags raised
    pub flags: RiskFlags,
    /// Growth evidence
    pub growth: GrowthResult,
    /// Credibility evidence
    pub credibility: CredibilityResult,
    /// Contradiction evidence
    pub contradiction: ContradictionResult,
    /// Narrative drift evidence
    pub evolution: EvolutionResult,
    /// Suggested next step
    pub recommendation: String,
    /// Name of the aggregation strategy used
    pub aggregation: String,
    /// When the analysis ran
    pub analyzed_at: DateTime<Utc>,
}

impl PatternAnalysis {
    /// The four sub-scores in aggregation order
    pub fn sub_scores(&self) -> [f64; 4] {
        [
            self.growth.risk_score,
            self.credibility.risk_score,
            self.contradiction.risk_score,
            self.evolution.risk_score,
        ]
    }
}

/// Risk counts over a batch of clusters
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RiskSummary {
    /// Clusters analyzed
    pub total_clusters_analyzed: usize,
    /// Clusters rated high
    pub high_risk_clusters: usize,
    /// Clusters rated medium
    pub medium_risk_clusters: usize,
    /// Clusters rated low
    pub low_risk_clusters: usize,
    /// Mean overall score, 0 for an empty batch
    pub average_risk_score: f64,
    /// Labels of clusters rated high
    pub high_risk_cluster_ids: Vec<ClusterId>,
}

impl RiskSummary {
    /// Summarize a set of analyses
    pub fn from_analyses<'a>(analyses: impl IntoIterator<Item = &'a PatternAnalysis>) -> Self {
        let mut summary = Self::default();
        let mut score_sum = 0.0;

        for analysis in analyses {
            summary.total_clusters_analyzed += 1;
            score_sum += analysis.overall_risk_score;
            match analysis.risk_level {
                RiskLevel::High => {
                    summary.high_risk_clusters += 1;
                    summary.high_risk_cluster_ids.push(analysis.cluster_id.clone());
                }
                RiskLevel::Medium => summary.medium_risk_clusters += 1,
                RiskLevel::Low => summary.low_risk_clusters += 1,
            }
        }

        if summary.total_clusters_analyzed > 0 {
            summary.average_risk_score = score_sum / summary.total_clusters_analyzed as f64;
        }
        summary
    }

    /// Generate a human-readable report
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Risk Summary".to_string(),
            "============".to_string(),
            format!("Clusters analyzed: {}", self.total_clusters_analyzed),
            format!("High risk: {}", self.high_risk_clusters),
            format!("Medium risk: {}", self.medium_risk_clusters),
            format!("Low risk: {}", self.low_risk_clusters),
            format!("Average risk score: {:.3}", self.average_risk_score),
        ];
        if !self.high_risk_cluster_ids.is_empty() {
            let ids: Vec<&str> = self.high_risk_cluster_ids.iter().map(ClusterId::as_str).collect();
            lines.push(format!("High risk clusters: {}", ids.join(", ")));
        }
        lines.join("\n")
    }
}

/// Analyses of every cluster in one clustering run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchAnalysis {
    /// Per-cluster analyses
    pub analyses: BTreeMap<ClusterId, PatternAnalysis>,
    /// Aggregate counts
    pub summary: RiskSummary,
    /// Documents left out as noise by clustering
    pub noise_count: usize,
    /// Documents skipped by clustering
    pub skipped_count: usize,
}

impl BatchAnalysis {
    /// Clusters scoring at least `threshold`, highest first
    pub fn above_threshold(&self, threshold: f64) -> Vec<&PatternAnalysis> {
        let mut hits: Vec<&PatternAnalysis> = self
            .analyses
            .values()
            .filter(|a| a.overall_risk_score >= threshold)
            .collect();
        hits.sort_by(|a, b| b.overall_risk_score.total_cmp(&a.overall_risk_score));
        hits
    }
}
