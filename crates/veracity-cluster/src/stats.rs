//! Cluster quality statistics

use crate::Clustering;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use veracity_domain::{cosine_similarity, ClusterId, Document};

/// Cluster counts bucketed by size
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeDistribution {
    /// Fewer than 5 documents
    pub small: usize,
    /// 5 to 19 documents
    pub medium: usize,
    /// 20 or more documents
    pub large: usize,
}

impl SizeDistribution {
    fn record(&mut self, size: usize) {
        match size {
            0..=4 => self.small += 1,
            5..=19 => self.medium += 1,
            _ => self.large += 1,
        }
    }
}

/// Summary statistics over one clustering run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterStatistics {
    /// Number of clusters
    pub total_clusters: usize,

    /// Documents assigned to some cluster
    pub total_clustered: usize,

    /// Mean cluster size, 0 when there are no clusters
    pub average_size: f64,

    /// Largest cluster size
    pub largest_size: usize,

    /// Smallest cluster size
    pub smallest_size: usize,

    /// Clusters bucketed by size
    pub size_distribution: SizeDistribution,

    /// Documents that fit no cluster
    pub noise_count: usize,

    /// Documents excluded before clustering
    pub skipped_count: usize,

    /// Mean pairwise cosine similarity inside each cluster
    pub cohesion: BTreeMap<ClusterId, f64>,
}

impl ClusterStatistics {
    /// Compute statistics for a clustering run
    pub fn from_clustering(clustering: &Clustering) -> Self {
        let sizes: Vec<usize> = clustering.clusters.values().map(Vec::len).collect();
        let mut size_distribution = SizeDistribution::default();
        for &size in &sizes {
            size_distribution.record(size);
        }

        let total_clustered: usize = sizes.iter().sum();
        let average_size = if sizes.is_empty() {
            0.0
        } else {
            total_clustered as f64 / sizes.len() as f64
        };

        Self {
            total_clusters: sizes.len(),
            total_clustered,
            average_size,
            largest_size: sizes.iter().copied().max().unwrap_or(0),
            smallest_size: sizes.iter().copied().min().unwrap_or(0),
            size_distribution,
            noise_count: clustering.noise_count(),
            skipped_count: clustering.skipped_count(),
            cohesion: clustering
                .clusters
                .iter()
                .map(|(id, docs)| (id.clone(), cohesion(docs)))
                .collect(),
        }
    }

    /// Generate a human-readable report
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Cluster Statistics".to_string(),
            "==================".to_string(),
            format!("Clusters: {}", self.total_clusters),
            format!("Clustered documents: {}", self.total_clustered),
            format!("Noise documents: {}", self.noise_count),
            format!("Skipped documents: {}", self.skipped_count),
        ];

        if self.total_clusters > 0 {
            lines.push(format!(
                "Cluster size: avg {:.1}, min {}, max {}",
                self.average_size, self.smallest_size, self.largest_size
            ));
            lines.push(format!(
                "Size distribution: {} small (<5), {} medium (5-19), {} large (20+)",
                self.size_distribution.small,
                self.size_distribution.medium,
                self.size_distribution.large
            ));
        }

        lines.join("\n")
    }
}

/// Mean pairwise similarity of a cluster; 1.0 for a singleton
pub fn cohesion(documents: &[Document]) -> f64 {
    let mut total = 0.0;
    let mut pairs = 0usize;
    for (i, a) in documents.iter().enumerate() {
        for b in &documents[i + 1..] {
            if let Some(sim) = cosine_similarity(&a.embedding, &b.embedding) {
                total += sim;
                pairs += 1;
            }
        }
    }
    if pairs == 0 {
        1.0
    } else {
        total / pairs as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ClusterConfig, ClusterEngine};

    fn doc(id: &str, embedding: Vec<f32>) -> Document {
        Document::new(id, id).with_embedding(embedding)
    }

    #[test]
    fn test_statistics_of_mixed_run() {
        let mut docs: Vec<Document> = (0..6)
            .map(|i| doc(&format!("a{}", i), vec![1.0, 0.0, 0.001 * i as f32]))
            .collect();
        docs.push(doc("b0", vec![0.0, 1.0, 0.0]));
        docs.push(doc("b1", vec![0.0, 1.0, 0.01]));
        docs.push(doc("lonely", vec![0.0, 0.0, 1.0]));
        docs.push(doc("broken", vec![]));

        let engine = ClusterEngine::new(ClusterConfig::default()).unwrap();
        let stats = ClusterStatistics::from_clustering(&engine.cluster(&docs));

        assert_eq!(stats.total_clusters, 2);
        assert_eq!(stats.total_clustered, 8);
        assert_eq!(stats.largest_size, 6);
        assert_eq!(stats.smallest_size, 2);
        assert!((stats.average_size - 4.0).abs() < 1e-12);
        assert_eq!(
            stats.size_distribution,
            SizeDistribution {
                small: 1,
                medium: 1,
                large: 0
            }
        );
        assert_eq!(stats.noise_count, 1);
        assert_eq!(stats.skipped_count, 1);
        assert!(stats.cohesion.values().all(|c| *c > 0.99));
        assert!(stats.summary().contains("Clusters: 2"));
    }

    #[test]
    fn test_empty_statistics() {
        let engine = ClusterEngine::new(ClusterConfig::default()).unwrap();
        let stats = ClusterStatistics::from_clustering(&engine.cluster(&[]));
        assert_eq!(stats.total_clusters, 0);
        assert_eq!(stats.average_size, 0.0);
        assert_eq!(stats.largest_size, 0);
        assert!(!stats.summary().contains("Cluster size"));
    }

    #[test]
    fn test_cohesion() {
        let tight = vec![doc("a", vec![1.0, 0.0]), doc("b", vec![1.0, 0.0])];
        assert!((cohesion(&tight) - 1.0).abs() < 1e-12);

        let loose = vec![doc("a", vec![1.0, 0.0]), doc("b", vec![0.0, 1.0])];
        assert!(cohesion(&loose).abs() < 1e-12);

        assert_eq!(cohesion(&[doc("a", vec![1.0])]), 1.0);
    }
}
