//! Veracity Pattern Detection
//!
//! Computes, per topic cluster, independent risk signals that together
//! estimate how likely the cluster is coordinated or low-quality
//! misinformation rather than organic coverage. The output is
//! quantitative evidence for a downstream decision-maker; nothing here
//! decides truth.
//!
//! # Analyzers
//!
//! | Analyzer | Signal | Needs |
//! |----------|--------|-------|
//! | Growth | window-over-window growth and velocity | `published_at` |
//! | Credibility | credible vs questionable sources, diversity | `source_name`, table |
//! | Contradiction | same-topic pairs with opposing wording | embeddings, text |
//! | Evolution | keyword turnover across time windows | `published_at`, titles |
//!
//! The four run independently (concurrently under rayon) and meet at the
//! [`RiskAggregator`], which combines their scores through a pluggable
//! [`AggregationStrategy`].
//!
//! An analyzer that cannot run never fails the cluster. It reports zero
//! risk with an [`Availability`](veracity_domain::Availability) marker.
//!
//! # Usage
//!
//! ```
//! use veracity_cluster::{ClusterConfig, ClusterEngine};
//! use veracity_domain::{Document, SourceCredibilityTable};
//! use veracity_patterns::{PatternConfig, PatternDetector};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let docs = vec![
//!     Document::new("a", "Dam breach reported").with_embedding(vec![1.0, 0.0]),
//!     Document::new("b", "Dam breach rumors debunked").with_embedding(vec![0.95, 0.1]),
//! ];
//!
//! let clustering = ClusterEngine::new(ClusterConfig::default())?.cluster(&docs);
//! let detector = PatternDetector::new(PatternConfig::default(), SourceCredibilityTable::reference())?;
//! let batch = detector.analyze_all(&clustering);
//!
//! println!("{}", batch.summary.summary());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [growth]
//! window_hours = 6
//! rapid_growth_multiple = 10.0
//!
//! [contradiction]
//! similarity_threshold = 0.7
//! risk_transform = { kind = "logarithmic" }
//!
//! [risk]
//! high_threshold = 0.7
//! medium_threshold = 0.4
//! aggregation = { kind = "weighted", growth = 0.3, credibility = 0.3, contradiction = 0.2, evolution = 0.2 }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod aggregate;
mod analysis;
mod config;
mod contradiction;
mod credibility;
mod detector;
mod error;
mod evolution;
mod growth;

pub use aggregate::{
    recommendation, AggregationStrategy, MaxAggregation, MeanAggregation, RiskAggregator,
    WeightedAggregation,
};
pub use analysis::{BatchAnalysis, PatternAnalysis, RiskSummary};
pub use config::{
    AggregationMethod, ContradictionConfig, CredibilityConfig, EvolutionConfig, GrowthConfig,
    PatternConfig, RiskConfig, RiskTransform,
};
pub use contradiction::{
    detect_contradictions, ContradictionPair, ContradictionResult, ContradictionType,
    EvidenceStrength, MatchBasis, PairMember,
};
pub use credibility::{analyze_credibility, CredibilityResult};
pub use detector::PatternDetector;
pub use error::PatternError;
pub use evolution::{track_evolution, EvolutionResult, EvolutionStage, KeyChange};
pub use growth::{analyze_growth, GrowthResult};
