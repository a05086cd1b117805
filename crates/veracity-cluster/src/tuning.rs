//! Grid search over density parameters
//!
//! Runs the engine once per `(eps, min_samples)` pair and ranks the
//! configurations by a heuristic score that rewards several reasonably
//! sized clusters covering most of the batch.

use crate::{ClusterConfig, ClusterEngine, ClusterError, Clustering};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::info;
use veracity_domain::Document;

/// Quality of one grid point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuningResult {
    /// Neighbourhood radius
    pub eps: f64,
    /// Core point threshold
    pub min_samples: usize,
    /// Clusters found
    pub clusters_found: usize,
    /// Share of usable documents assigned to a cluster
    pub clustered_fraction: f64,
    /// Share of usable documents labelled noise
    pub noise_fraction: f64,
    /// Mean cluster size
    pub average_cluster_size: f64,
    /// Smallest cluster size
    pub min_cluster_size: usize,
    /// Largest cluster size
    pub max_cluster_size: usize,
    /// Heuristic score, higher is better
    pub score: f64,
}

impl TuningResult {
    fn from_clustering(clustering: &Clustering) -> Self {
        let usable = clustering.clustered_count() + clustering.noise_count();
        let sizes: Vec<usize> = clustering.clusters.values().map(Vec::len).collect();
        let clusters_found = sizes.len();
        let fraction = |count: usize| {
            if usable == 0 {
                0.0
            } else {
                count as f64 / usable as f64
            }
        };

        let mut result = Self {
            eps: clustering.eps,
            min_samples: clustering.min_samples,
            clusters_found,
            clustered_fraction: fraction(clustering.clustered_count()),
            noise_fraction: fraction(clustering.noise_count()),
            average_cluster_size: if clusters_found == 0 {
                0.0
            } else {
                clustering.clustered_count() as f64 / clusters_found as f64
            },
            min_cluster_size: sizes.iter().copied().min().unwrap_or(0),
            max_cluster_size: sizes.iter().copied().max().unwrap_or(0),
            score: 0.0,
        };
        result.score = result.compute_score();
        result
    }

    fn compute_score(&self) -> f64 {
        if self.clusters_found == 0 {
            return 0.0;
        }

        let cluster_score = 30.0 * (self.clusters_found as f64 / 10.0).min(1.0);
        let coverage_score = 30.0 * self.clustered_fraction;
        let noise_score = 20.0 * (1.0 - self.noise_fraction);

        let avg = self.average_cluster_size;
        let mut size_score = if avg < 2.0 {
            10.0 * avg / 2.0
        } else if avg <= 10.0 {
            20.0
        } else {
            (20.0 * (1.0 - (avg - 10.0) / 20.0)).max(0.0)
        };
        if self.min_cluster_size < 2 {
            size_score *= 0.8;
        }

        cluster_score + coverage_score + noise_score + size_score
    }
}

/// Parameter grid to sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSearch {
    /// Candidate eps values
    pub eps_values: Vec<f64>,
    /// Candidate min_samples values
    pub min_samples_values: Vec<usize>,
    /// Settings shared by every grid point
    pub base: ClusterConfig,
}

impl Default for ParameterSearch {
    /// eps 0.20..=0.60 in steps of 0.05, min_samples 1..=4
    fn default() -> Self {
        Self {
            eps_values: (0..=8).map(|i| f64::from(20 + 5 * i) / 100.0).collect(),
            min_samples_values: (1..=4).collect(),
            base: ClusterConfig::default(),
        }
    }
}

impl ParameterSearch {
    /// Default grid over a custom base configuration
    pub fn with_base(base: ClusterConfig) -> Self {
        Self {
            base,
            ..Self::default()
        }
    }

    /// Run every grid point and rank the results, best first.
    ///
    /// Fails before running anything if a grid point is invalid.
    pub fn run(&self, documents: &[Document]) -> Result<Vec<TuningResult>, ClusterError> {
        let engines = self
            .eps_values
            .iter()
            .flat_map(|&eps| {
                self.min_samples_values
                    .iter()
                    .map(move |&min_samples| (eps, min_samples))
            })
            .map(|(eps, min_samples)| {
                ClusterEngine::new(self.base.clone().with_density(eps, min_samples))
            })
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            "Searching {} parameter combinations over {} documents",
            engines.len(),
            documents.len()
        );

        let mut results: Vec<TuningResult> = engines
            .par_iter()
            .map(|engine| TuningResult::from_clustering(&engine.cluster(documents)))
            .collect();

        results.sort_by(rank);
        Ok(results)
    }

    /// Best result with `min_samples >= 2` that found a cluster, falling
    /// back to the overall best.
    pub fn recommend(results: &[TuningResult]) -> Option<&TuningResult> {
        results
            .iter()
            .find(|r| r.min_samples >= 2 && r.clusters_found > 0)
            .or_else(|| results.first())
    }
}

/// Descending score, then smaller eps, then smaller min_samples
fn rank(a: &TuningResult, b: &TuningResult) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.eps.total_cmp(&b.eps))
        .then_with(|| a.min_samples.cmp(&b.min_samples))
}
