//! Source credibility lookup
//!
//! The table is an explicit, immutable value handed to the credibility
//! analyzer at call time. There is no process-wide instance; tests and
//! deployments build or load their own.

use crate::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Score assigned to sources the table does not know
pub const DEFAULT_NEUTRAL_SCORE: f64 = 0.5;

/// Score assigned to recognised fact-checking organisations
pub const DEFAULT_FACT_CHECKER_SCORE: f64 = 0.95;

/// Shortest normalized name eligible for containment matching
const MIN_PARTIAL_MATCH_LEN: usize = 3;

/// Anything that can score a source name in [0, 1]
pub trait CredibilityLookup {
    /// Credibility of `source_name`, falling back to a neutral default
    fn credibility(&self, source_name: &str) -> f64;

    /// Whether `source_name` is a recognised fact-checking organisation
    fn is_fact_checker(&self, source_name: &str) -> bool;
}

/// Normalize a source name: trim, lowercase, collapse inner whitespace.
///
/// # Examples
///
/// ```
/// use veracity_domain::credibility::normalize_source;
///
/// assert_eq!(normalize_source("  The   Guardian "), "the guardian");
/// ```
pub fn normalize_source(name: &str) -> String {
    name.split_whitespace()
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Static lookup from normalized source name to credibility score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceCredibilityTable {
    default_score: f64,
    fact_checker_score: f64,
    partial_match: bool,
    scores: BTreeMap<String, f64>,
    fact_checkers: BTreeSet<String>,
}

/// On-disk shape of a credibility table
#[derive(Debug, Deserialize)]
struct TableFile {
    #[serde(default = "default_neutral")]
    default_score: f64,
    #[serde(default = "default_fact_checker")]
    fact_checker_score: f64,
    #[serde(default = "default_true")]
    partial_match: bool,
    #[serde(default)]
    scores: BTreeMap<String, f64>,
    #[serde(default)]
    fact_checkers: Vec<String>,
}

fn default_neutral() -> f64 {
    DEFAULT_NEUTRAL_SCORE
}

fn default_fact_checker() -> f64 {
    DEFAULT_FACT_CHECKER_SCORE
}

fn default_true() -> bool {
    true
}

impl SourceCredibilityTable {
    /// Empty table where every source scores `default_score`
    pub fn new(default_score: f64) -> Result<Self, DomainError> {
        check_score("default_score", default_score)?;
        Ok(Self {
            default_score,
            fact_checker_score: DEFAULT_FACT_CHECKER_SCORE,
            partial_match: true,
            scores: BTreeMap::new(),
            fact_checkers: BTreeSet::new(),
        })
    }

    /// Add or replace a source score
    pub fn with_source(mut self, name: &str, score: f64) -> Result<Self, DomainError> {
        check_score(name, score)?;
        self.scores.insert(normalize_source(name), score);
        Ok(self)
    }

    /// Register a fact-checking organisation
    pub fn with_fact_checker(mut self, name: &str) -> Self {
        self.fact_checkers.insert(normalize_source(name));
        self
    }

    /// Enable or disable containment matching ("BBC" matching "BBC World")
    pub fn with_partial_match(mut self, enabled: bool) -> Self {
        self.partial_match = enabled;
        self
    }

    /// Reference table of well-known outlets and fact-checkers.
    pub fn reference() -> Self {
        const SOURCES: &[(&str, f64)] = &[
            ("BBC News", 0.95),
            ("BBC", 0.95),
            ("Reuters", 0.95),
            ("Reuters Health", 0.95),
            ("AP News", 0.95),
            ("Associated Press", 0.95),
            ("CNN", 0.90),
            ("The Guardian", 0.90),
            ("The New York Times", 0.90),
            ("The Washington Post", 0.90),
            ("Wall Street Journal", 0.90),
            ("NPR", 0.90),
            ("PBS", 0.90),
            ("The Hindu", 0.80),
            ("India Today", 0.75),
            ("The Times of India", 0.75),
            ("Hindustan Times", 0.75),
            ("Firstpost", 0.70),
            ("Tavily Search", 0.50),
            ("Blog", 0.40),
            ("Social Media", 0.30),
            ("Unknown", 0.30),
        ];
        const FACT_CHECKERS: &[&str] = &[
            "Fact Check Organization",
            "Snopes",
            "PolitiFact",
            "FactCheck.org",
            "AFP Fact Check",
            "Reuters Fact Check",
        ];

        Self {
            default_score: DEFAULT_NEUTRAL_SCORE,
            fact_checker_score: DEFAULT_FACT_CHECKER_SCORE,
            partial_match: true,
            scores: SOURCES
                .iter()
                .map(|(name, score)| (normalize_source(name), *score))
                .collect(),
            fact_checkers: FACT_CHECKERS.iter().map(|name| normalize_source(name)).collect(),
        }
    }

    /// Load a table from TOML
    ///
    /// ```toml
    /// default_score = 0.5
    /// fact_checkers = ["Snopes"]
    ///
    /// [scores]
    /// "Reuters" = 0.95
    /// "Social Media" = 0.3
    /// ```
    pub fn from_toml(toml_str: &str) -> Result<Self, DomainError> {
        let file: TableFile = toml::from_str(toml_str)?;
        check_score("default_score", file.default_score)?;
        check_score("fact_checker_score", file.fact_checker_score)?;

        let mut table = Self::new(file.default_score)?.with_partial_match(file.partial_match);
        table.fact_checker_score = file.fact_checker_score;
        for (name, score) in &file.scores {
            table = table.with_source(name, *score)?;
        }
        for name in &file.fact_checkers {
            table = table.with_fact_checker(name);
        }
        Ok(table)
    }

    /// Score used for unknown sources
    pub fn default_score(&self) -> f64 {
        self.default_score
    }

    /// Number of explicitly scored sources
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Whether no source is explicitly scored
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    fn partial_lookup(&self, normalized: &str) -> Option<f64> {
        if normalized.len() < MIN_PARTIAL_MATCH_LEN {
            return None;
        }
        self.scores
            .iter()
            .filter(|(known, _)| {
                known.len() >= MIN_PARTIAL_MATCH_LEN
                    && (normalized.contains(known.as_str()) || known.contains(normalized))
            })
            // Longest key wins; BTreeMap order breaks ties
            .fold(None::<(&String, f64)>, |best, (known, score)| match best {
                Some((b, _)) if b.len() >= known.len() => best,
                _ => Some((known, *score)),
            })
            .map(|(_, score)| score)
    }
}

impl Default for SourceCredibilityTable {
    fn default() -> Self {
        Self::reference()
    }
}

impl CredibilityLookup for SourceCredibilityTable {
    fn credibility(&self, source_name: &str) -> f64 {
        let normalized = normalize_source(source_name);

        if let Some(score) = self.scores.get(&normalized) {
            return *score;
        }
        if self.is_fact_checker(source_name) {
            return self.fact_checker_score;
        }
        if self.partial_match {
            if let Some(score) = self.partial_lookup(&normalized) {
                return score;
            }
        }
        self.default_score
    }

    fn is_fact_checker(&self, source_name: &str) -> bool {
        let normalized = normalize_source(source_name);
        if normalized.is_empty() {
            return false;
        }
        self.fact_checkers.contains(&normalized)
            || self
                .fact_checkers
                .iter()
                .any(|fc| normalized.contains(fc.as_str()))
    }
}

fn check_score(name: &str, score: f64) -> Result<(), DomainError> {
    if !(0.0..=1.0).contains(&score) {
        return Err(DomainError::Config(format!(
            "credibility score for '{}' must be within [0.0, 1.0], got {}",
            name, score
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_is_normalized() {
        let table = SourceCredibilityTable::reference();
        assert_eq!(table.credibility("Reuters"), 0.95);
        assert_eq!(table.credibility("  reuters  "), 0.95);
        assert_eq!(table.credibility("THE GUARDIAN"), 0.90);
    }

    #[test]
    fn test_unknown_source_uses_default() {
        let table = SourceCredibilityTable::new(0.42).unwrap();
        assert_eq!(table.credibility("Some Random Site"), 0.42);
    }

    #[test]
    fn test_partial_match_prefers_longest_key() {
        let table = SourceCredibilityTable::reference();
        // "reuters health" is longer than "reuters" and both are contained
        assert_eq!(table.credibility("Reuters Health Weekly"), 0.95);
        assert_eq!(table.credibility("CNN International"), 0.90);
    }

    #[test]
    fn test_partial_match_can_be_disabled() {
        let table = SourceCredibilityTable::reference().with_partial_match(false);
        assert_eq!(table.credibility("CNN International"), DEFAULT_NEUTRAL_SCORE);
    }

    #[test]
    fn test_fact_checkers() {
        let table = SourceCredibilityTable::reference();
        assert!(table.is_fact_checker("Snopes"));
        assert!(table.is_fact_checker("PolitiFact Daily"));
        assert!(!table.is_fact_checker("Reuters"));
        assert!(!table.is_fact_checker(""));
        assert_eq!(table.credibility("snopes"), DEFAULT_FACT_CHECKER_SCORE);
    }

    #[test]
    fn test_invalid_score_rejected() {
        assert!(SourceCredibilityTable::new(1.5).is_err());
        let table = SourceCredibilityTable::new(0.5).unwrap();
        assert!(table.with_source("Bad", -0.1).is_err());
    }

    #[test]
    fn test_from_toml() {
        let toml_str = r#"
            default_score = 0.4
            fact_checkers = ["Lead Stories"]

            [scores]
            "Daily Planet" = 0.9
            "Rumor Mill" = 0.1
        "#;
        let table = SourceCredibilityTable::from_toml(toml_str).unwrap();
        assert_eq!(table.default_score(), 0.4);
        assert_eq!(table.len(), 2);
        assert_eq!(table.credibility("daily planet"), 0.9);
        assert_eq!(table.credibility("Rumor Mill"), 0.1);
        assert!(table.is_fact_checker("Lead Stories"));
        assert_eq!(table.credibility("Elsewhere"), 0.4);
    }

    #[test]
    fn test_from_toml_rejects_out_of_range() {
        let toml_str = r#"
            [scores]
            "Overconfident" = 3.0
        "#;
        assert!(SourceCredibilityTable::from_toml(toml_str).is_err());
        assert!(SourceCredibilityTable::from_toml("default_score = [").is_err());
    }
}
