//! Pairwise similarity diagnostics for choosing `eps`
//!
//! Looks at the distribution of cosine similarity across every pair in a
//! batch and suggests a starting eps band. Offline tooling, not part of
//! the clustering path.

use crate::engine::screen;
use crate::ClusterError;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use veracity_domain::{cosine_similarity, Document, DocumentId};

/// One compared pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarPair {
    /// First document
    pub first: DocumentId,
    /// Second document
    pub second: DocumentId,
    /// Cosine similarity
    pub similarity: f64,
}

/// Suggested eps range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpsBand {
    /// Lower end of the suggested range
    pub low: f64,
    /// Upper end of the suggested range
    pub high: f64,
}

impl EpsBand {
    /// Band for a batch whose closest pair has similarity `max_similarity`
    pub fn for_max_similarity(max_similarity: f64) -> Self {
        let (low, high) = if max_similarity < 0.3 {
            (0.15, 0.20)
        } else if max_similarity < 0.5 {
            (0.20, 0.30)
        } else if max_similarity < 0.7 {
            (0.30, 0.40)
        } else {
            (0.40, 0.50)
        };
        Self { low, high }
    }
}

/// Distribution of pairwise similarity over a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityProfile {
    /// Documents with usable embeddings
    pub document_count: usize,
    /// Documents skipped for bad embeddings
    pub skipped_count: usize,
    /// Pairs compared
    pub pair_count: usize,
    /// Lowest pairwise similarity
    pub min: f64,
    /// Highest pairwise similarity
    pub max: f64,
    /// Mean pairwise similarity
    pub mean: f64,
    /// Median pairwise similarity
    pub median: f64,
    /// Most similar pairs, descending
    pub top_pairs: Vec<SimilarPair>,
    /// Least similar pairs, ascending
    pub bottom_pairs: Vec<SimilarPair>,
    /// Suggested eps range
    pub recommended_eps: EpsBand,
}

impl SimilarityProfile {
    /// Profile every pair of usable documents, keeping `sample` extreme
    /// pairs at each end.
    pub fn from_documents(documents: &[Document], sample: usize) -> Result<Self, ClusterError> {
        let (usable, skipped) = screen(documents, None);
        if usable.len() < 2 {
            return Err(ClusterError::InsufficientData(format!(
                "need at least two documents with embeddings, found {}",
                usable.len()
            )));
        }

        let mut pairs: Vec<SimilarPair> = (0..usable.len())
            .into_par_iter()
            .flat_map_iter(|i| {
                let usable = &usable;
                (i + 1..usable.len()).filter_map(move |j| {
                    cosine_similarity(&usable[i].embedding, &usable[j].embedding).map(
                        |similarity| SimilarPair {
                            first: usable[i].id.clone(),
                            second: usable[j].id.clone(),
                            similarity,
                        },
                    )
                })
            })
            .collect();

        // Stable sort keeps input order among equal similarities
        pairs.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));

        let n = pairs.len();
        let mean = pairs.iter().map(|p| p.similarity).sum::<f64>() / n as f64;
        let median = if n % 2 == 1 {
            pairs[n / 2].similarity
        } else {
            (pairs[n / 2 - 1].similarity + pairs[n / 2].similarity) / 2.0
        };
        let max = pairs[0].similarity;
        let min = pairs[n - 1].similarity;

        Ok(Self {
            document_count: usable.len(),
            skipped_count: skipped.len(),
            pair_count: n,
            min,
            max,
            mean,
            median,
            top_pairs: pairs.iter().take(sample).cloned().collect(),
            bottom_pairs: pairs.iter().rev().take(sample).cloned().collect(),
            recommended_eps: EpsBand::for_max_similarity(max),
        })
    }
}
