//! Narrative drift tracking
//!
//! Splits a cluster into fixed-width time windows, extracts the dominant
//! title keywords per window and reports windows whose keywords were not
//! dominant in the window before.

use crate::config::EvolutionConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;
use veracity_domain::{extract_keywords, tokenize, Availability, Document};

/// Titles kept per stage
const SAMPLE_TITLES: usize = 3;

/// New keywords kept per change
const MAX_NEW_KEYWORDS: usize = 5;

/// Keywords named in a change description
const DESCRIBED_KEYWORDS: usize = 3;

/// Characters of each sample title kept
const SAMPLE_TITLE_CHARS: usize = 80;

/// One non-empty time window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionStage {
    /// Window number counted from the earliest document
    pub window_index: usize,
    /// Earliest document time in the window
    pub start: DateTime<Utc>,
    /// Latest document time in the window
    pub end: DateTime<Utc>,
    /// Documents in the window
    pub document_count: usize,
    /// Dominant title keywords
    pub key_phrases: Vec<String>,
    /// First few titles
    pub sample_titles: Vec<String>,
}

/// A window whose dominant keywords changed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyChange {
    /// Window where the change appeared
    pub window_index: usize,
    /// Keywords absent from the previous window's key phrases
    pub new_keywords: Vec<String>,
    /// Human-readable summary
    pub description: String,
}

/// Narrative drift evidence for one cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionResult {
    /// At least one narrative shift was detected
    pub has_evolution: bool,
    /// Non-empty windows in time order
    pub evolution_stages: Vec<EvolutionStage>,
    /// Detected shifts
    pub key_changes: Vec<KeyChange>,
    /// Timestamped documents analyzed
    pub total_documents: usize,
    /// Risk contribution in [0, 1]
    pub risk_score: f64,
    /// Confidence in [0, 1]
    pub confidence: f64,
    /// Whether the analysis could run
    pub availability: Availability,
    /// Documents without a publication time
    pub skipped_documents: usize,
}

impl EvolutionResult {
    fn empty(
        total_documents: usize,
        confidence: f64,
        availability: Availability,
        skipped_documents: usize,
    ) -> Self {
        Self {
            has_evolution: false,
            evolution_stages: Vec::new(),
            key_changes: Vec::new(),
            total_documents,
            risk_score: 0.0,
            confidence,
            availability,
            skipped_documents,
        }
    }
}

/// Track how a cluster's dominant vocabulary shifts over time.
pub fn track_evolution(documents: &[Document], config: &EvolutionConfig) -> EvolutionResult {
    let mut timed: Vec<(DateTime<Utc>, &Document)> = documents
        .iter()
        .filter_map(|d| d.published_at.map(|t| (t, d)))
        .collect();
    let skipped = documents.len() - timed.len();
    let n = timed.len();

    if n == 0 {
        return EvolutionResult::empty(0, 0.0, Availability::Unavailable, skipped);
    }
    if n < config.min_documents {
        debug!(
            "Evolution tracking needs {} timestamped documents, found {}",
            config.min_documents, n
        );
        let confidence = n as f64 / config.min_documents as f64;
        return EvolutionResult::empty(n, confidence, Availability::Degraded, skipped);
    }

    // Stable sort keeps input order among equal timestamps
    timed.sort_by_key(|(t, _)| *t);
    let earliest = timed[0].0;
    let window_ms = i64::from(config.window_hours) * 3_600_000;

    let mut windows: BTreeMap<usize, Vec<(DateTime<Utc>, &Document)>> = BTreeMap::new();
    for (t, doc) in timed {
        let offset = (t - earliest).num_milliseconds();
        let index = usize::try_from(offset / window_ms).unwrap_or(usize::MAX);
        windows.entry(index).or_default().push((t, doc));
    }

    let mut stages: Vec<EvolutionStage> = Vec::with_capacity(windows.len());
    let mut key_changes = Vec::new();

    for (index, members) in &windows {
        let tokens: Vec<String> = members
            .iter()
            .flat_map(|(_, doc)| tokenize(&doc.title))
            .collect();
        let key_phrases =
            extract_keywords(&tokens, &config.stop_words, config.min_token_len, config.top_k);

        if let Some(previous) = stages.last() {
            let new_keywords: Vec<String> = key_phrases
                .iter()
                .filter(|k| !previous.key_phrases.contains(k))
                .take(MAX_NEW_KEYWORDS)
                .cloned()
                .collect();
            if !new_keywords.is_empty() {
                let description = format!(
                    "Narrative shift detected: new focus on {}",
                    new_keywords
                        .iter()
                        .take(DESCRIBED_KEYWORDS)
                        .map(String::as_str)
                        .collect::<Vec<_>>()
                        .join(", ")
                );
                key_changes.push(KeyChange {
                    window_index: *index,
                    new_keywords,
                    description,
                });
            }
        }

        let (Some(first), Some(last)) = (members.first(), members.last()) else {
            continue;
        };
        stages.push(EvolutionStage {
            window_index: *index,
            start: first.0,
            end: last.0,
            document_count: members.len(),
            key_phrases,
            sample_titles: members
                .iter()
                .take(SAMPLE_TITLES)
                .map(|(_, doc)| doc.title.chars().take(SAMPLE_TITLE_CHARS).collect())
                .collect(),
        });
    }

    let has_evolution = !key_changes.is_empty();
    let num_windows = stages.len();
    let change_ratio = key_changes.len() as f64 / num_windows.max(1) as f64;
    let stage_ratio = num_windows.min(5) as f64 / 5.0;
    let shift_bonus = if has_evolution { 1.0 } else { 0.0 };
    let risk_score = (0.5 * change_ratio + 0.3 * stage_ratio + 0.2 * shift_bonus).min(1.0);

    EvolutionResult {
        has_evolution,
        evolution_stages: stages,
        key_changes,
        total_documents: n,
        risk_score,
        confidence: 1.0,
        availability: Availability::Available,
        skipped_documents: skipped,
    }
}
