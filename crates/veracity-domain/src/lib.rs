//! Veracity Domain Layer
//!
//! Core vocabulary shared by the clustering engine and the pattern
//! analyzers. Everything here is pure data or pure functions over
//! in-memory values; nothing performs I/O.
//!
//! ## Key Concepts
//!
//! - **Document**: an embedded, timestamped, sourced unit of text
//! - **Cluster**: a group of documents judged topically related
//! - **Similarity**: cosine similarity/distance between embeddings
//! - **Keywords**: stop-word filtered frequency extraction from titles
//! - **Credibility table**: immutable source name → score lookup
//! - **Risk vocabulary**: risk levels, flags and availability markers
//!
//! ## Architecture
//!
//! This crate sits at the bottom of the workspace. The clustering crate
//! and the pattern crate depend on it; it depends on neither.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cluster;
pub mod credibility;
pub mod document;
pub mod error;
pub mod keywords;
pub mod risk;
pub mod similarity;

// Re-exports for convenience
pub use cluster::ClusterId;
pub use credibility::{CredibilityLookup, SourceCredibilityTable};
pub use document::{Document, DocumentId, SkipReason, SkippedDocument};
pub use error::DomainError;
pub use keywords::{extract_keywords, tokenize, StopWords};
pub use risk::{Availability, RiskFlags, RiskLevel};
pub use similarity::{cosine_distance, cosine_similarity, find_similar};
