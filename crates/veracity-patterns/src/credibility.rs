//! Source credibility analysis

use crate::config::CredibilityConfig;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use veracity_domain::credibility::normalize_source;
use veracity_domain::{Availability, CredibilityLookup, Document};

/// Name used for documents with a blank source
const UNKNOWN_SOURCE: &str = "Unknown";

/// Credibility evidence for one cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredibilityResult {
    /// Share of documents from credible sources
    pub credible_ratio: f64,
    /// Distinct sources, compared after normalization
    pub source_diversity: usize,
    /// Documents from credible sources
    pub credible_count: usize,
    /// Documents from questionable sources
    pub questionable_count: usize,
    /// Distinct credible source names, sorted
    pub credible_sources: Vec<String>,
    /// Distinct questionable source names, sorted
    pub questionable_sources: Vec<String>,
    /// Documents per source, under the first spelling seen
    pub source_breakdown: BTreeMap<String, usize>,
    /// Recognised fact-checkers among the sources, sorted
    pub fact_checkers_present: Vec<String>,
    /// Mean source credibility over documents
    pub average_credibility: f64,
    /// Documents analyzed
    pub total_documents: usize,
    /// Credible share reached the configured bar
    pub meets_credibility_threshold: bool,
    /// Risk contribution in [0, 1]
    pub risk_score: f64,
    /// Confidence in [0, 1]
    pub confidence: f64,
    /// Whether the analysis could run
    pub availability: Availability,
}

impl CredibilityResult {
    /// Zero-risk result for an empty cluster
    pub fn unavailable() -> Self {
        Self {
            credible_ratio: 0.0,
            source_diversity: 0,
            credible_count: 0,
            questionable_count: 0,
            credible_sources: Vec::new(),
            questionable_sources: Vec::new(),
            source_breakdown: BTreeMap::new(),
            fact_checkers_present: Vec::new(),
            average_credibility: 0.0,
            total_documents: 0,
            meets_credibility_threshold: false,
            risk_score: 0.0,
            confidence: 0.0,
            availability: Availability::Unavailable,
        }
    }
}

/// Score a cluster by how credible and how diverse its sources are.
///
/// `lookup` is an explicit table supplied by the caller; nothing global is
/// consulted.
pub fn analyze_credibility<L>(
    documents: &[Document],
    lookup: &L,
    config: &CredibilityConfig,
) -> CredibilityResult
where
    L: CredibilityLookup + ?Sized,
{
    if documents.is_empty() {
        return CredibilityResult::unavailable();
    }

    let mut breakdown: BTreeMap<String, usize> = BTreeMap::new();
    let mut credible_sources = BTreeSet::new();
    let mut questionable_sources = BTreeSet::new();
    let mut fact_checkers = BTreeSet::new();
    let mut credible_count = 0usize;
    let mut questionable_count = 0usize;
    let mut score_sum = 0.0;
    let mut spellings: HashMap<String, String> = HashMap::new();

    for doc in documents {
        let raw = match doc.source_name.trim() {
            "" => UNKNOWN_SOURCE,
            name => name,
        };
        let source = spellings
            .entry(normalize_source(raw))
            .or_insert_with(|| raw.to_string())
            .as_str();
        let score = lookup.credibility(source);
        score_sum += score;
        *breakdown.entry(source.to_string()).or_insert(0) += 1;

        if score >= config.credible_threshold {
            credible_count += 1;
            credible_sources.insert(source.to_string());
        } else if score < config.questionable_below {
            questionable_count += 1;
            questionable_sources.insert(source.to_string());
        }
        if lookup.is_fact_checker(source) {
            fact_checkers.insert(source.to_string());
        }
    }

    let total = documents.len();
    let credible_ratio = credible_count as f64 / total as f64;
    let questionable_ratio = (questionable_count as f64 / total as f64).min(1.0);
    let diversity = breakdown.len();
    let diversity_ratio = (diversity as f64 / config.diversity_saturation as f64).min(1.0);

    let risk_score = (0.5 * (1.0 - credible_ratio)
        + 0.3 * questionable_ratio
        + 0.2 * (1.0 - diversity_ratio))
        .clamp(0.0, 1.0);

    CredibilityResult {
        credible_ratio,
        source_diversity: diversity,
        credible_count,
        questionable_count,
        credible_sources: credible_sources.into_iter().collect(),
        questionable_sources: questionable_sources.into_iter().collect(),
        source_breakdown: breakdown,
        fact_checkers_present: fact_checkers.into_iter().collect(),
        average_credibility: score_sum / total as f64,
        total_documents: total,
        meets_credibility_threshold: credible_ratio >= config.min_credible_ratio,
        risk_score,
        confidence: 1.0,
        availability: Availability::Available,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use veracity_domain::SourceCredibilityTable;

    proptest! {
        /// Property: credible_ratio and risk stay within [0, 1]
        #[test]
        fn test_credibility_bounds(scores in prop::collection::vec(0.0f64..=1.0, 1..30)) {
            let mut table = SourceCredibilityTable::new(0.5).unwrap().with_partial_match(false);
            let mut docs = Vec::new();
            for (i, score) in scores.iter().enumerate() {
                let name = format!("source-{}", i);
                table = table.with_source(&name, *score).unwrap();
                docs.push(Document::new(format!("d{}", i), "t").with_source(name));
            }

            let result = analyze_credibility(&docs, &table, &CredibilityConfig::default());
            prop_assert!((0.0..=1.0).contains(&result.credible_ratio));
            prop_assert!((0.0..=1.0).contains(&result.risk_score));
        }

        /// Property: when every source meets the threshold the ratio is exactly 1
        #[test]
        fn test_all_credible_ratio_is_one(scores in prop::collection::vec(0.7f64..=1.0, 1..30)) {
            let mut table = SourceCredibilityTable::new(0.5).unwrap().with_partial_match(false);
            let mut docs = Vec::new();
            for (i, score) in scores.iter().enumerate() {
                let name = format!("source-{}", i);
                table = table.with_source(&name, *score).unwrap();
                docs.push(Document::new(format!("d{}", i), "t").with_source(name));
            }

            let result = analyze_credibility(&docs, &table, &CredibilityConfig::default());
            prop_assert_eq!(result.credible_ratio, 1.0);
        }
    }
}
