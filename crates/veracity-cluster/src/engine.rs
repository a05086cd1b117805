//! Density-based clustering over cosine distance

use crate::{ClusterConfig, ClusterError, ClusterMethod};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use tracing::{debug, info};
use veracity_domain::{
    cosine_distance, cosine_similarity, ClusterId, Document, DocumentId, SkippedDocument,
};

/// Outcome of one clustering run
///
/// Each usable document appears exactly once, either in a cluster or in
/// `noise`. Documents that could not be clustered at all are in `skipped`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clustering {
    /// Cluster label to member documents, members in input order
    pub clusters: BTreeMap<ClusterId, Vec<Document>>,

    /// Documents that fit no cluster
    pub noise: Vec<DocumentId>,

    /// Documents excluded before clustering
    pub skipped: Vec<SkippedDocument>,

    /// Neighbourhood radius used for this run
    pub eps: f64,

    /// Core point threshold used for this run
    pub min_samples: usize,

    /// Algorithm used for this run
    pub method: ClusterMethod,
}

impl Clustering {
    /// Number of clusters found
    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    /// Number of documents assigned to some cluster
    pub fn clustered_count(&self) -> usize {
        self.clusters.values().map(Vec::len).sum()
    }

    /// Number of usable documents that fit no cluster
    pub fn noise_count(&self) -> usize {
        self.noise.len()
    }

    /// Number of documents excluded before clustering
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Cluster label to member ids
    pub fn assignments(&self) -> BTreeMap<ClusterId, Vec<DocumentId>> {
        self.clusters
            .iter()
            .map(|(id, docs)| (id.clone(), docs.iter().map(|d| d.id.clone()).collect()))
            .collect()
    }

    /// Label of the cluster holding `id`, if any
    pub fn cluster_of(&self, id: &DocumentId) -> Option<&ClusterId> {
        self.clusters
            .iter()
            .find(|(_, docs)| docs.iter().any(|d| &d.id == id))
            .map(|(cluster_id, _)| cluster_id)
    }
}

/// Groups embedded documents into topic clusters
///
/// The engine holds only validated configuration. Every call works on its
/// own snapshot, so a single engine can be shared across threads.
///
/// # Examples
///
/// ```
/// use veracity_cluster::{ClusterConfig, ClusterEngine};
/// use veracity_domain::Document;
///
/// let engine = ClusterEngine::new(ClusterConfig::default()).unwrap();
/// let docs = vec![
///     Document::new("a", "Flood warning").with_embedding(vec![1.0, 0.0]),
///     Document::new("b", "Flood warning issued").with_embedding(vec![0.99, 0.01]),
///     Document::new("c", "Election results").with_embedding(vec![0.0, 1.0]),
/// ];
///
/// let clustering = engine.cluster(&docs);
/// assert_eq!(clustering.cluster_count(), 1);
/// assert_eq!(clustering.noise_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ClusterEngine {
    config: ClusterConfig,
}

impl ClusterEngine {
    /// Create an engine, rejecting invalid configuration
    pub fn new(config: ClusterConfig) -> Result<Self, ClusterError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration
    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    /// Cluster a batch of documents
    pub fn cluster(&self, documents: &[Document]) -> Clustering {
        let (usable, skipped) = screen(documents, self.config.expected_dimension);

        info!(
            "Clustering {} documents (eps={}, min_samples={}, {} skipped)",
            usable.len(),
            self.config.eps,
            self.config.min_samples,
            skipped.len()
        );

        let groups = match self.config.method {
            ClusterMethod::Density => self.density_groups(&usable),
            ClusterMethod::Greedy {
                similarity_threshold,
            } => greedy_groups(&usable, similarity_threshold),
        };

        let mut in_cluster = vec![false; usable.len()];
        let mut clusters = BTreeMap::new();
        for group in groups
            .into_iter()
            .filter(|g| g.len() >= self.config.min_cluster_size)
        {
            for &idx in &group {
                in_cluster[idx] = true;
            }
            let members = group.iter().map(|&idx| usable[idx].clone()).collect();
            clusters.insert(ClusterId::from_index(clusters.len()), members);
        }

        let noise: Vec<DocumentId> = usable
            .iter()
            .zip(&in_cluster)
            .filter(|(_, clustered)| !**clustered)
            .map(|(doc, _)| doc.id.clone())
            .collect();

        info!(
            "Found {} clusters, {} noise documents",
            clusters.len(),
            noise.len()
        );

        Clustering {
            clusters,
            noise,
            skipped,
            eps: self.config.eps,
            min_samples: self.config.min_samples,
            method: self.config.method,
        }
    }

    /// DBSCAN. Returns groups of indices into `points`, each sorted
    /// ascending, in discovery order.
    fn density_groups(&self, points: &[&Document]) -> Vec<Vec<usize>> {
        let eps = self.config.eps;
        let min_samples = self.config.min_samples;

        if eps <= 0.0 {
            return Vec::new();
        }

        let neighbours = neighbourhoods(points, eps);
        let mut label: Vec<Option<usize>> = vec![None; points.len()];
        let mut visited = vec![false; points.len()];
        let mut groups: Vec<Vec<usize>> = Vec::new();

        for start in 0..points.len() {
            if visited[start] {
                continue;
            }
            visited[start] = true;
            if neighbours[start].len() < min_samples {
                continue;
            }

            let cluster = groups.len();
            let mut members = vec![start];
            label[start] = Some(cluster);
            let mut queue: VecDeque<usize> = neighbours[start].iter().copied().collect();

            while let Some(idx) = queue.pop_front() {
                // Border points stay with the first cluster that reaches them
                if label[idx].is_none() {
                    label[idx] = Some(cluster);
                    members.push(idx);
                }
                if visited[idx] {
                    continue;
                }
                visited[idx] = true;
                if neighbours[idx].len() >= min_samples {
                    queue.extend(neighbours[idx].iter().copied());
                }
            }

            members.sort_unstable();
            groups.push(members);
        }

        groups
    }
}

/// Cluster with the default method and explicit density parameters
pub fn cluster(
    documents: &[Document],
    eps: f64,
    min_samples: usize,
) -> Result<Clustering, ClusterError> {
    let engine = ClusterEngine::new(ClusterConfig::default().with_density(eps, min_samples))?;
    Ok(engine.cluster(documents))
}

/// Split documents into usable ones and skipped ones.
///
/// When no dimension is configured the first usable document fixes it.
pub(crate) fn screen(
    documents: &[Document],
    expected_dimension: Option<usize>,
) -> (Vec<&Document>, Vec<SkippedDocument>) {
    let mut dimension = expected_dimension;
    let mut usable = Vec::with_capacity(documents.len());
    let mut skipped = Vec::new();

    for doc in documents {
        match doc.screen_embedding(dimension) {
            Some(reason) => {
                debug!("Skipping document {}: {}", doc.id, reason);
                skipped.push(SkippedDocument {
                    id: doc.id.clone(),
                    reason,
                });
            }
            None => {
                dimension.get_or_insert(doc.embedding.len());
                usable.push(doc);
            }
        }
    }

    (usable, skipped)
}

/// Neighbour lists (including self) for every point, in index order
fn neighbourhoods(points: &[&Document], eps: f64) -> Vec<Vec<usize>> {
    (0..points.len())
        .into_par_iter()
        .map(|i| {
            (0..points.len())
                .filter(|&j| {
                    i == j
                        || cosine_distance(&points[i].embedding, &points[j].embedding)
                            .is_some_and(|d| d <= eps)
                })
                .collect()
        })
        .collect()
}

fn greedy_groups(points: &[&Document], threshold: f64) -> Vec<Vec<usize>> {
    let mut assigned = vec![false; points.len()];
    let mut groups = Vec::new();

    for seed in 0..points.len() {
        if assigned[seed] {
            continue;
        }
        assigned[seed] = true;
        let mut group = vec![seed];
        for other in seed + 1..points.len() {
            if assigned[other] {
                continue;
            }
            let similar = cosine_similarity(&points[seed].embedding, &points[other].embedding)
                .is_some_and(|s| s >= threshold);
            if similar {
                assigned[other] = true;
                group.push(other);
            }
        }
        groups.push(group);
    }

    groups
}
