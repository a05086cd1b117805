//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use veracity_cluster::{ClusterStatistics, Clustering, SimilarPair, SimilarityProfile, TuningResult};
use veracity_domain::{RiskFlags, RiskLevel};
use veracity_patterns::{BatchAnalysis, PatternAnalysis};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Document ids listed per cluster row before eliding the rest.
const MAX_LISTED_IDS: usize = 5;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a clustering run with its statistics.
    pub fn format_clustering(
        &self,
        clustering: &Clustering,
        stats: &ClusterStatistics,
    ) -> Result<String> {
        if self.format == OutputFormat::Json {
            let value = serde_json::json!({
                "eps": clustering.eps,
                "min_samples": clustering.min_samples,
                "assignments": clustering.assignments(),
                "noise": clustering.noise,
                "skipped": clustering.skipped,
                "statistics": stats,
            });
            return Ok(serde_json::to_string_pretty(&value)?);
        }

        let mut out = Vec::new();
        if clustering.cluster_count() == 0 {
            out.push(self.colorize("No clusters found.", "yellow"));
        } else {
            let mut builder = Builder::default();
            builder.push_record(["Cluster", "Size", "Cohesion", "Documents"]);
            for (id, members) in clustering.assignments() {
                let cohesion = stats
                    .cohesion
                    .get(&id)
                    .map(|c| format!("{:.3}", c))
                    .unwrap_or_else(|| "-".to_string());
                let mut listed: Vec<String> = members
                    .iter()
                    .take(MAX_LISTED_IDS)
                    .map(ToString::to_string)
                    .collect();
                if members.len() > MAX_LISTED_IDS {
                    listed.push(format!("(+{} more)", members.len() - MAX_LISTED_IDS));
                }
                builder.push_record([
                    id.to_string(),
                    members.len().to_string(),
                    cohesion,
                    listed.join(", "),
                ]);
            }
            out.push(self.table(builder));
        }

        out.push(stats.summary());
        for skipped in &clustering.skipped {
            out.push(self.warning(&format!("Skipped {}: {}", skipped.id, skipped.reason)));
        }
        Ok(out.join("\n\n"))
    }

    /// Format a batch analysis, optionally keeping only clusters at or
    /// above a risk threshold.
    pub fn format_batch(&self, batch: &BatchAnalysis, threshold: Option<f64>) -> Result<String> {
        let analyses: Vec<&PatternAnalysis> = match threshold {
            Some(t) => batch.above_threshold(t),
            None => batch.analyses.values().collect(),
        };

        if self.format == OutputFormat::Json {
            return Ok(match threshold {
                Some(t) => serde_json::to_string_pretty(&serde_json::json!({
                    "threshold": t,
                    "analyses": analyses,
                    "summary": batch.summary,
                }))?,
                None => serde_json::to_string_pretty(batch)?,
            });
        }

        let mut out = Vec::new();
        if analyses.is_empty() {
            out.push(self.colorize("No clusters to report.", "yellow"));
        } else {
            let mut builder = Builder::default();
            builder.push_record([
                "Cluster", "Docs", "Risk", "Level", "Growth", "Cred", "Contra", "Evo", "Flags",
            ]);
            for analysis in &analyses {
                let [growth, credibility, contradiction, evolution] = analysis.sub_scores();
                builder.push_record([
                    analysis.cluster_id.to_string(),
                    analysis.datapoint_count.to_string(),
                    format!("{:.3}", analysis.overall_risk_score),
                    self.risk_level(analysis.risk_level),
                    format!("{:.2}", growth),
                    format!("{:.2}", credibility),
                    format!("{:.2}", contradiction),
                    format!("{:.2}", evolution),
                    flag_labels(&analysis.flags),
                ]);
            }
            out.push(self.table(builder));

            let notes: Vec<String> = analyses
                .iter()
                .map(|a| format!("{}: {}", a.cluster_id, a.recommendation))
                .collect();
            out.push(notes.join("\n"));
        }

        out.push(batch.summary.summary());
        if batch.noise_count > 0 || batch.skipped_count > 0 {
            out.push(self.info(&format!(
                "{} noise document(s), {} skipped document(s) not analyzed",
                batch.noise_count, batch.skipped_count
            )));
        }
        Ok(out.join("\n\n"))
    }

    /// Format ranked tuning results, best first.
    pub fn format_tuning(
        &self,
        results: &[TuningResult],
        top: usize,
        recommended: Option<&TuningResult>,
    ) -> Result<String> {
        let shown = &results[..results.len().min(top)];

        if self.format == OutputFormat::Json {
            let value = serde_json::json!({
                "evaluated": results.len(),
                "results": shown,
                "recommended": recommended,
            });
            return Ok(serde_json::to_string_pretty(&value)?);
        }

        if shown.is_empty() {
            return Ok(self.colorize("No parameter combinations evaluated.", "yellow"));
        }

        let mut builder = Builder::default();
        builder.push_record([
            "Rank", "eps", "min_samples", "Clusters", "Clustered", "Noise", "Avg size", "Score",
        ]);
        for (rank, result) in shown.iter().enumerate() {
            builder.push_record([
                (rank + 1).to_string(),
                format!("{:.2}", result.eps),
                result.min_samples.to_string(),
                result.clusters_found.to_string(),
                format!("{:.1}%", result.clustered_fraction * 100.0),
                format!("{:.1}%", result.noise_fraction * 100.0),
                format!("{:.1}", result.average_cluster_size),
                format!("{:.3}", result.score),
            ]);
        }

        let mut out = vec![self.table(builder)];
        match recommended {
            Some(best) if best.clusters_found > 0 => out.push(self.success(&format!(
                "Recommended: eps = {:.2}, min_samples = {}",
                best.eps, best.min_samples
            ))),
            _ => out.push(self.warning("No combination produced any cluster")),
        }
        Ok(out.join("\n\n"))
    }

    /// Format a similarity profile.
    pub fn format_profile(&self, profile: &SimilarityProfile) -> Result<String> {
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(profile)?);
        }

        let mut builder = Builder::default();
        builder.push_record(["Metric", "Value"]);
        builder.push_record(["Documents".to_string(), profile.document_count.to_string()]);
        builder.push_record(["Skipped".to_string(), profile.skipped_count.to_string()]);
        builder.push_record(["Pairs".to_string(), profile.pair_count.to_string()]);
        builder.push_record(["Min similarity".to_string(), format!("{:.4}", profile.min)]);
        builder.push_record(["Max similarity".to_string(), format!("{:.4}", profile.max)]);
        builder.push_record(["Mean similarity".to_string(), format!("{:.4}", profile.mean)]);
        builder.push_record(["Median similarity".to_string(), format!("{:.4}", profile.median)]);

        let out = [
            self.table(builder),
            format!("Most similar pairs\n{}", self.pairs_table(&profile.top_pairs)),
            format!("Least similar pairs\n{}", self.pairs_table(&profile.bottom_pairs)),
            self.info(&format!(
                "Suggested eps range: {:.2} - {:.2}",
                profile.recommended_eps.low, profile.recommended_eps.high
            )),
        ];
        Ok(out.join("\n\n"))
    }

    fn pairs_table(&self, pairs: &[SimilarPair]) -> String {
        let mut builder = Builder::default();
        builder.push_record(["First", "Second", "Similarity", "Distance"]);
        for pair in pairs {
            builder.push_record([
                pair.first.to_string(),
                pair.second.to_string(),
                format!("{:.4}", pair.similarity),
                format!("{:.4}", 1.0 - pair.similarity),
            ]);
        }
        self.table(builder)
    }

    fn table(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    fn risk_level(&self, level: RiskLevel) -> String {
        let color = match level {
            RiskLevel::High => "red",
            RiskLevel::Medium => "yellow",
            RiskLevel::Low => "green",
        };
        self.colorize(level.as_str(), color)
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Short labels for the raised risk flags, or "-" when none are raised.
pub fn flag_labels(flags: &RiskFlags) -> String {
    let labels: Vec<&str> = [
        (flags.rapid_growth, "rapid-growth"),
        (flags.low_credibility, "low-credibility"),
        (flags.has_contradictions, "contradictions"),
        (flags.narrative_evolution, "narrative-shift"),
    ]
    .into_iter()
    .filter_map(|(raised, label)| raised.then_some(label))
    .collect();

    if labels.is_empty() {
        "-".to_string()
    } else {
        labels.join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veracity_cluster::{ClusterConfig, ClusterEngine};
    use veracity_domain::Document;

    fn doc(id: &str, embedding: Vec<f32>) -> Document {
        let mut d = Document::new(id, id);
        d.embedding = embedding;
        d
    }

    fn clustering() -> Clustering {
        let docs = vec![
            doc("a1", vec![1.0, 0.0]),
            doc("a2", vec![0.99, 0.05]),
            doc("b1", vec![0.0, 1.0]),
            doc("b2", vec![0.05, 0.99]),
            doc("lonely", vec![-1.0, -1.0]),
            doc("empty", vec![]),
        ];
        ClusterEngine::new(ClusterConfig::default()).unwrap().cluster(&docs)
    }

    #[test]
    fn test_clustering_table() {
        let clustering = clustering();
        let stats = ClusterStatistics::from_clustering(&clustering);
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_clustering(&clustering, &stats).unwrap();
        assert!(output.contains("Cluster"));
        assert!(output.contains("a1, a2"));
        assert!(output.contains("Noise documents: 1"));
        assert!(output.contains("⚠ Skipped empty"));
    }

    #[test]
    fn test_clustering_json() {
        let clustering = clustering();
        let stats = ClusterStatistics::from_clustering(&clustering);
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_clustering(&clustering, &stats).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["noise"][0], "lonely");
        assert_eq!(value["statistics"]["total_clusters"], 2);
        assert_eq!(value["assignments"].as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_tuning_truncates_to_top() {
        let result = TuningResult {
            eps: 0.3,
            min_samples: 2,
            clusters_found: 2,
            clustered_fraction: 0.8,
            noise_fraction: 0.2,
            average_cluster_size: 2.0,
            min_cluster_size: 2,
            max_cluster_size: 2,
            score: 0.7,
        };
        let results = vec![result.clone(), result.clone(), result];
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_tuning(&results, 2, results.first()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["evaluated"], 3);
        assert_eq!(value["results"].as_array().unwrap().len(), 2);
        assert_eq!(value["recommended"]["min_samples"], 2);
    }

    #[test]
    fn test_flag_labels() {
        assert_eq!(flag_labels(&RiskFlags::default()), "-");
        let flags = RiskFlags::new(true, false, true, false);
        assert_eq!(flag_labels(&flags), "rapid-growth,contradictions");
    }

    #[test]
    fn test_messages_without_color() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("done"), "✓ done");
        assert_eq!(formatter.error("failed"), "✗ failed");
        assert_eq!(formatter.warning("careful"), "⚠ careful");
        assert_eq!(formatter.info("note"), "ℹ note");
    }
}
