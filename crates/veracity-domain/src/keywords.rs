//! Keyword extraction from short texts
//!
//! Deliberately simple: lowercase tokenization, a stop-word list, and
//! frequency counting. Every function here is pure over its inputs.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Default English stop-words for headline keyword extraction
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does",
    "did", "will", "would", "could", "should", "may", "might", "must", "can", "this", "that",
    "these", "those", "from", "into", "over", "after", "before", "about", "amid", "says",
    "said", "new", "news", "more", "than", "their", "they", "them", "what", "when", "where",
    "which", "while", "your", "just", "also", "only",
];

/// Set of tokens ignored during keyword extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StopWords(BTreeSet<String>);

impl StopWords {
    /// Build a stop-word set from arbitrary words (lowercased)
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(words.into_iter().map(|w| w.as_ref().to_lowercase()).collect())
    }

    /// An empty set
    pub fn none() -> Self {
        Self(BTreeSet::new())
    }

    /// Whether `token` is a stop-word
    pub fn contains(&self, token: &str) -> bool {
        self.0.contains(token)
    }

    /// Number of stop-words
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for StopWords {
    fn default() -> Self {
        Self::new(DEFAULT_STOP_WORDS.iter().copied())
    }
}

/// Split text into lowercase alphanumeric tokens.
///
/// Apostrophes are dropped so contractions stay one token.
///
/// # Examples
///
/// ```
/// use veracity_domain::tokenize;
///
/// assert_eq!(tokenize("Mayor's plan: DENIED!"), vec!["mayors", "plan", "denied"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for c in text.chars() {
        if c == '\'' || c == '\u{2019}' {
            continue;
        }
        if c.is_alphanumeric() {
            current.extend(c.to_lowercase());
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

/// Top-`top_k` most frequent significant tokens.
///
/// A token is significant when it is not a stop-word and has at least
/// `min_len` characters. Ordering is by count descending, then by first
/// occurrence, so the result is deterministic.
pub fn extract_keywords(
    tokens: &[String],
    stop_words: &StopWords,
    min_len: usize,
    top_k: usize,
) -> Vec<String> {
    // token -> (count, first position)
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();

    for (pos, token) in tokens.iter().enumerate() {
        if token.chars().count() < min_len || stop_words.contains(token) {
            continue;
        }
        let entry = counts.entry(token.as_str()).or_insert((0, pos));
        entry.0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(token, (count, first))| (token, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(top_k)
        .map(|(token, _, _)| token.to_string())
        .collect()
}

/// Whether `tokens` contains `term` on token boundaries.
///
/// Multi-word terms must appear as consecutive tokens.
pub fn contains_term(tokens: &[String], term: &str) -> bool {
    let needle = tokenize(term);
    if needle.is_empty() || needle.len() > tokens.len() {
        return false;
    }
    tokens.windows(needle.len()).any(|window| window == needle.as_slice())
}
