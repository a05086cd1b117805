//! Document module - the unit of text analyzed by the engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Opaque, globally unique document identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Wrap an identifier produced by the document supplier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// An embedded, timestamped, sourced news-style document.
///
/// Documents are produced by collaborators (ingestion and embedding) and
/// handed to the engine as a snapshot. The engine reads them and never
/// mutates them.
///
/// An empty `embedding` means the document has not been embedded. A
/// missing `published_at` excludes the document from time-based analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier
    pub id: DocumentId,

    /// Semantic embedding of fixed deployment-wide dimensionality
    #[serde(default)]
    pub embedding: Vec<f32>,

    /// Short headline
    #[serde(default)]
    pub title: String,

    /// Body text, possibly empty
    #[serde(default)]
    pub content: String,

    /// Free-text publisher name
    #[serde(default)]
    pub source_name: String,

    /// Publication time
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,

    /// Category tags
    #[serde(default)]
    pub categories: BTreeSet<String>,
}

impl Document {
    /// Create a document with only an id and a title
    ///
    /// # Examples
    ///
    /// ```
    /// use veracity_domain::Document;
    ///
    /// let doc = Document::new("a1", "Bridge closed after storm")
    ///     .with_source("Reuters")
    ///     .with_embedding(vec![0.1, 0.9]);
    /// assert_eq!(doc.source_name, "Reuters");
    /// assert_eq!(doc.embedding.len(), 2);
    /// ```
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: DocumentId::new(id),
            embedding: Vec::new(),
            title: title.into(),
            content: String::new(),
            source_name: String::new(),
            published_at: None,
            categories: BTreeSet::new(),
        }
    }

    /// Set the embedding vector
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = embedding;
        self
    }

    /// Set the body text
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Set the publisher name
    pub fn with_source(mut self, source_name: impl Into<String>) -> Self {
        self.source_name = source_name.into();
        self
    }

    /// Set the publication time
    pub fn published(mut self, at: DateTime<Utc>) -> Self {
        self.published_at = Some(at);
        self
    }

    /// Add a category tag
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.insert(category.into());
        self
    }

    /// Check the embedding against the deployment dimensionality.
    ///
    /// Returns the reason the document must be skipped, if any.
    pub fn screen_embedding(&self, expected_dimension: Option<usize>) -> Option<SkipReason> {
        if self.embedding.is_empty() {
            return Some(SkipReason::MissingEmbedding);
        }
        if let Some(expected) = expected_dimension {
            if self.embedding.len() != expected {
                return Some(SkipReason::DimensionMismatch {
                    expected,
                    actual: self.embedding.len(),
                });
            }
        }
        if self.embedding.iter().any(|v| !v.is_finite()) {
            return Some(SkipReason::NonFiniteEmbedding);
        }
        None
    }

    /// Title followed by the lead sentence of the body, truncated to
    /// `max_chars` characters of body text.
    pub fn lead_text(&self, max_chars: usize) -> String {
        let first_sentence = self.content.split('.').next().unwrap_or("").trim();
        let lead: String = first_sentence.chars().take(max_chars).collect();
        if lead.is_empty() {
            self.title.clone()
        } else {
            format!("{}. {}", self.title, lead)
        }
    }
}

/// Why a document was left out of a computation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SkipReason {
    /// No embedding was supplied
    MissingEmbedding,

    /// Embedding length differs from the deployment dimensionality
    DimensionMismatch {
        /// Expected dimensionality
        expected: usize,
        /// Dimensionality found on the document
        actual: usize,
    },

    /// Embedding contains NaN or infinite components
    NonFiniteEmbedding,

    /// No publication time, required by time-based analysis
    MissingTimestamp,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingEmbedding => write!(f, "missing embedding"),
            SkipReason::DimensionMismatch { expected, actual } => {
                write!(f, "embedding dimension {} (expected {})", actual, expected)
            }
            SkipReason::NonFiniteEmbedding => write!(f, "non-finite embedding component"),
            SkipReason::MissingTimestamp => write!(f, "missing publication time"),
        }
    }
}

/// A document excluded from a computation, with the reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedDocument {
    /// The excluded document
    pub id: DocumentId,
    /// Why it was excluded
    pub reason: SkipReason,
}
