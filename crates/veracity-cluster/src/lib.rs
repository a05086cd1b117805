//! Veracity Clustering Engine
//!
//! Groups embedded documents into topic clusters without a predetermined
//! cluster count.
//!
//! # Overview
//!
//! - **Engine**: density-based clustering over cosine distance, with a
//!   greedy threshold grouping alternative
//! - **Statistics**: cluster size distribution and cohesion
//! - **Profile**: pairwise similarity distribution and an eps suggestion
//! - **Tuning**: grid search over `(eps, min_samples)`
//!
//! # Usage
//!
//! ```
//! use veracity_cluster::{ClusterConfig, ClusterEngine, ClusterStatistics};
//! use veracity_domain::Document;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = ClusterEngine::new(ClusterConfig::default())?;
//! let docs = vec![
//!     Document::new("a", "Dam breach rumours").with_embedding(vec![0.9, 0.1]),
//!     Document::new("b", "Dam breach denied").with_embedding(vec![0.88, 0.12]),
//! ];
//!
//! let clustering = engine.cluster(&docs);
//! let stats = ClusterStatistics::from_clustering(&clustering);
//! println!("{}", stats.summary());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [cluster]
//! eps = 0.30
//! min_samples = 2
//! min_cluster_size = 2
//!
//! [cluster.method]
//! kind = "density"
//! ```
//!
//! Lower eps (0.20-0.30) gives many small, tight clusters. Higher eps
//! (0.35-0.45) gives fewer, looser clusters that may merge unrelated
//! topics.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod engine;
mod error;
mod profile;
mod stats;
mod tuning;

pub use config::{ClusterConfig, ClusterMethod};
pub use engine::{cluster, ClusterEngine, Clustering};
pub use error::ClusterError;
pub use profile::{EpsBand, SimilarPair, SimilarityProfile};
pub use stats::{cohesion, ClusterStatistics, SizeDistribution};
pub use tuning::{ParameterSearch, TuningResult};
