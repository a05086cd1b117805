//! Configuration for the pattern analyzers and the risk aggregator
//!
//! Every threshold the analyzers use lives here so that recalibration is a
//! configuration change rather than a code change.

use crate::aggregate::{
    AggregationStrategy, MaxAggregation, MeanAggregation, WeightedAggregation,
};
use crate::PatternError;
use serde::{Deserialize, Serialize};
use veracity_domain::StopWords;

/// Growth analyzer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthConfig {
    /// Width of the current and previous windows (hours)
    /// Default: 6
    pub window_hours: u32,

    /// Growth rate at which the growth term saturates
    /// Default: 10
    pub growth_cap: f64,

    /// Documents per hour at which the velocity term saturates
    /// Default: 10
    pub velocity_cap: f64,

    /// Cluster size at which the size term saturates
    /// Default: 50
    pub size_cap: usize,

    /// Growth rate above which growth counts as rapid
    /// Default: 10
    pub rapid_growth_multiple: f64,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            window_hours: 6,
            growth_cap: 10.0,
            velocity_cap: 10.0,
            size_cap: 50,
            rapid_growth_multiple: 10.0,
        }
    }
}

impl GrowthConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), PatternError> {
        if self.window_hours == 0 {
            return Err(PatternError::Config(
                "growth.window_hours must be greater than 0".to_string(),
            ));
        }
        positive("growth.growth_cap", self.growth_cap)?;
        positive("growth.velocity_cap", self.velocity_cap)?;
        positive("growth.rapid_growth_multiple", self.rapid_growth_multiple)?;
        if self.size_cap == 0 {
            return Err(PatternError::Config(
                "growth.size_cap must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Credibility analyzer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredibilityConfig {
    /// Sources scoring at least this are credible
    /// Default: 0.7
    pub credible_threshold: f64,

    /// Sources scoring below this are questionable
    /// Default: 0.5
    pub questionable_below: f64,

    /// Credible document share needed to meet the credibility bar
    /// Default: 0.5
    pub min_credible_ratio: f64,

    /// Distinct sources at which diversity stops lowering risk
    /// Default: 10
    pub diversity_saturation: usize,
}

impl Default for CredibilityConfig {
    fn default() -> Self {
        Self {
            credible_threshold: 0.7,
            questionable_below: 0.5,
            min_credible_ratio: 0.5,
            diversity_saturation: 10,
        }
    }
}

impl CredibilityConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), PatternError> {
        unit("credibility.credible_threshold", self.credible_threshold)?;
        unit("credibility.questionable_below", self.questionable_below)?;
        unit("credibility.min_credible_ratio", self.min_credible_ratio)?;
        if self.questionable_below > self.credible_threshold {
            return Err(PatternError::Config(
                "credibility.questionable_below cannot exceed credible_threshold".to_string(),
            ));
        }
        if self.diversity_saturation == 0 {
            return Err(PatternError::Config(
                "credibility.diversity_saturation must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// How a contradiction count becomes a risk score
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RiskTransform {
    /// `min(1, count / documents)`
    #[default]
    Ratio,
    /// `min(1, ln(1 + count) / ln(1 + documents))`
    Logarithmic,
    /// `count / (count + half_point)`, independent of cluster size
    Saturating {
        /// Count at which the score reaches 0.5
        half_point: f64,
    },
}

impl RiskTransform {
    /// Map `count` contradictions among `documents` documents into [0, 1].
    ///
    /// Non-decreasing in `count` for a fixed `documents`.
    pub fn apply(&self, count: usize, documents: usize) -> f64 {
        if count == 0 {
            return 0.0;
        }
        let c = count as f64;
        let n = documents.max(1) as f64;
        let score = match self {
            RiskTransform::Ratio => c / n,
            RiskTransform::Logarithmic => c.ln_1p() / n.ln_1p(),
            RiskTransform::Saturating { half_point } => c / (c + half_point),
        };
        score.clamp(0.0, 1.0)
    }
}

/// Contradiction analyzer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContradictionConfig {
    /// Minimum cosine similarity for two documents to be about the same claim
    /// Default: 0.7
    pub similarity_threshold: f64,

    /// Pairs kept in the report (all pairs are counted)
    /// Default: 10
    pub max_reported_pairs: usize,

    /// Characters of title plus lead sentence scanned for signal terms
    /// Default: 200
    pub lead_chars: usize,

    /// Debunking and verification vocabulary
    pub debunk_terms: Vec<String>,

    /// Rumor framing vocabulary
    pub rumor_terms: Vec<String>,

    /// Official denial vocabulary
    pub denial_terms: Vec<String>,

    /// Term pairs that put two same-topic documents at odds when each
    /// side carries one of them. Without one, a pair with no debunk,
    /// rumor or denial signal is ordinary coverage.
    pub opposing_terms: Vec<[String; 2]>,

    /// Also pair documents whose titles share enough words, without
    /// needing embeddings
    /// Default: true
    pub title_overlap: bool,

    /// Word overlap (Jaccard, stop-words removed) above which two titles
    /// are about the same topic
    /// Default: 0.3
    pub title_overlap_threshold: f64,

    /// Title vocabulary that marks a document as contesting a claim
    pub title_terms: Vec<String>,

    /// Count to score transform
    pub risk_transform: RiskTransform,
}

const DEBUNK_TERMS: &[&str] = &[
    "debunked",
    "debunk",
    "false",
    "fake",
    "hoax",
    "fact check",
    "fact checked",
    "unfounded",
    "baseless",
    "disproven",
    "misinformation",
    "incorrect",
    "not true",
    "rumors",
];

const RUMOR_TERMS: &[&str] = &[
    "rumor",
    "rumour",
    "unverified",
    "unconfirmed",
    "alleged",
    "allegedly",
    "reportedly",
    "speculation",
];

const DENIAL_TERMS: &[&str] = &["denied", "denies", "deny", "rejected", "rejects", "refuted", "dismissed"];

const OPPOSING_TERMS: &[[&str; 2]] = &[
    ["false", "true"],
    ["debunked", "confirmed"],
    ["denied", "confirmed"],
    ["unfounded", "verified"],
    ["rumor", "fact"],
    ["misinformation", "verified"],
];

const TITLE_TERMS: &[&str] = &[
    "false",
    "debunked",
    "unfounded",
    "prove unfounded",
    "rumors",
    "misinformation",
    "disproven",
    "incorrect",
    "wrong",
    "not true",
    "denied",
    "rejected",
];

fn owned(terms: &[&str]) -> Vec<String> {
    terms.iter().map(|t| t.to_string()).collect()
}

impl Default for ContradictionConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.7,
            max_reported_pairs: 10,
            lead_chars: 200,
            debunk_terms: owned(DEBUNK_TERMS),
            rumor_terms: owned(RUMOR_TERMS),
            denial_terms: owned(DENIAL_TERMS),
            opposing_terms: OPPOSING_TERMS
                .iter()
                .map(|[a, b]| [a.to_string(), b.to_string()])
                .collect(),
            title_overlap: true,
            title_overlap_threshold: 0.3,
            title_terms: owned(TITLE_TERMS),
            risk_transform: RiskTransform::Ratio,
        }
    }
}

impl ContradictionConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), PatternError> {
        if !self.similarity_threshold.is_finite()
            || !(-1.0..=1.0).contains(&self.similarity_threshold)
        {
            return Err(PatternError::Config(format!(
                "contradiction.similarity_threshold must be within [-1.0, 1.0], got {}",
                self.similarity_threshold
            )));
        }
        if self.lead_chars == 0 {
            return Err(PatternError::Config(
                "contradiction.lead_chars must be greater than 0".to_string(),
            ));
        }
        if self.debunk_terms.iter().all(|t| t.trim().is_empty()) {
            return Err(PatternError::Config(
                "contradiction.debunk_terms cannot be empty".to_string(),
            ));
        }
        if self
            .opposing_terms
            .iter()
            .any(|pair| pair.iter().any(|t| t.trim().is_empty()))
        {
            return Err(PatternError::Config(
                "contradiction.opposing_terms cannot contain blank terms".to_string(),
            ));
        }
        unit("contradiction.title_overlap_threshold", self.title_overlap_threshold)?;
        if let RiskTransform::Saturating { half_point } = self.risk_transform {
            positive("contradiction.risk_transform.half_point", half_point)?;
        }
        Ok(())
    }
}

/// Narrative drift analyzer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Width of each time window (hours)
    /// Default: 6
    pub window_hours: u32,

    /// Key phrases kept per window
    /// Default: 5
    pub top_k: usize,

    /// Shortest token counted as a keyword
    /// Default: 4
    pub min_token_len: usize,

    /// Timestamped documents needed for a full-confidence result
    /// Default: 3
    pub min_documents: usize,

    /// Words never counted as keywords
    pub stop_words: StopWords,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            window_hours: 6,
            top_k: 5,
            min_token_len: 4,
            min_documents: 3,
            stop_words: StopWords::default(),
        }
    }
}

impl EvolutionConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), PatternError> {
        if self.window_hours == 0 {
            return Err(PatternError::Config(
                "evolution.window_hours must be greater than 0".to_string(),
            ));
        }
        if self.top_k == 0 {
            return Err(PatternError::Config(
                "evolution.top_k must be greater than 0".to_string(),
            ));
        }
        if self.min_documents == 0 {
            return Err(PatternError::Config(
                "evolution.min_documents must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Which aggregation strategy combines the four sub-scores
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AggregationMethod {
    /// Unweighted arithmetic mean
    #[default]
    Mean,
    /// Weighted mean
    Weighted {
        /// Weight of the growth score
        growth: f64,
        /// Weight of the credibility score
        credibility: f64,
        /// Weight of the contradiction score
        contradiction: f64,
        /// Weight of the evolution score
        evolution: f64,
    },
    /// Highest single score
    Max,
}

impl AggregationMethod {
    /// Build the strategy this method names
    pub fn build(&self) -> Result<Box<dyn AggregationStrategy>, PatternError> {
        Ok(match *self {
            AggregationMethod::Mean => Box::new(MeanAggregation),
            AggregationMethod::Weighted {
                growth,
                credibility,
                contradiction,
                evolution,
            } => Box::new(WeightedAggregation::new([
                growth,
                credibility,
                contradiction,
                evolution,
            ])?),
            AggregationMethod::Max => Box::new(MaxAggregation),
        })
    }
}

/// Risk aggregator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Scores at or above this are high risk
    /// Default: 0.7
    pub high_threshold: f64,

    /// Scores at or above this are medium risk
    /// Default: 0.4
    pub medium_threshold: f64,

    /// Contradicting pairs needed to raise the contradiction flag
    /// Default: 1
    pub min_contradictions_for_flag: usize,

    /// Narrative shifts needed to raise the evolution flag
    /// Default: 1
    pub min_changes_for_flag: usize,

    /// How the four sub-scores are combined
    pub aggregation: AggregationMethod,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            high_threshold: 0.7,
            medium_threshold: 0.4,
            min_contradictions_for_flag: 1,
            min_changes_for_flag: 1,
            aggregation: AggregationMethod::Mean,
        }
    }
}

impl RiskConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), PatternError> {
        unit("risk.high_threshold", self.high_threshold)?;
        unit("risk.medium_threshold", self.medium_threshold)?;
        if self.medium_threshold > self.high_threshold {
            return Err(PatternError::Config(
                "risk.medium_threshold cannot exceed high_threshold".to_string(),
            ));
        }
        self.aggregation.build().map(|_| ())
    }
}

/// Configuration for the whole pattern detector
///
/// # Examples
///
/// ```
/// use veracity_patterns::PatternConfig;
///
/// let config = PatternConfig::default();
/// assert_eq!(config.growth.window_hours, 6);
/// assert_eq!(config.risk.high_threshold, 0.7);
/// assert!(config.validate().is_ok());
///
/// let strict = PatternConfig::strict();
/// assert!(strict.risk.high_threshold < config.risk.high_threshold);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    /// Growth analyzer
    pub growth: GrowthConfig,
    /// Credibility analyzer
    pub credibility: CredibilityConfig,
    /// Contradiction analyzer
    pub contradiction: ContradictionConfig,
    /// Narrative drift analyzer
    pub evolution: EvolutionConfig,
    /// Risk aggregator
    pub risk: RiskConfig,
}

impl PatternConfig {
    /// Flags earlier and rates risk higher
    pub fn strict() -> Self {
        Self {
            growth: GrowthConfig {
                rapid_growth_multiple: 5.0,
                ..GrowthConfig::default()
            },
            credibility: CredibilityConfig {
                credible_threshold: 0.8,
                min_credible_ratio: 0.6,
                ..CredibilityConfig::default()
            },
            contradiction: ContradictionConfig {
                similarity_threshold: 0.65,
                ..ContradictionConfig::default()
            },
            evolution: EvolutionConfig::default(),
            risk: RiskConfig {
                high_threshold: 0.6,
                medium_threshold: 0.35,
                ..RiskConfig::default()
            },
        }
    }

    /// Tolerates more breaking-news churn before flagging
    pub fn lenient() -> Self {
        Self {
            growth: GrowthConfig {
                rapid_growth_multiple: 15.0,
                growth_cap: 15.0,
                ..GrowthConfig::default()
            },
            credibility: CredibilityConfig {
                credible_threshold: 0.65,
                min_credible_ratio: 0.4,
                ..CredibilityConfig::default()
            },
            contradiction: ContradictionConfig {
                similarity_threshold: 0.8,
                ..ContradictionConfig::default()
            },
            evolution: EvolutionConfig {
                window_hours: 12,
                ..EvolutionConfig::default()
            },
            risk: RiskConfig {
                high_threshold: 0.8,
                medium_threshold: 0.5,
                min_contradictions_for_flag: 2,
                min_changes_for_flag: 2,
                ..RiskConfig::default()
            },
        }
    }

    /// Validate every section
    pub fn validate(&self) -> Result<(), PatternError> {
        self.growth.validate()?;
        self.credibility.validate()?;
        self.contradiction.validate()?;
        self.evolution.validate()?;
        self.risk.validate()
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, PatternError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, PatternError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

fn positive(name: &str, value: f64) -> Result<(), PatternError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(PatternError::Config(format!(
            "{} must be greater than 0, got {}",
            name, value
        )));
    }
    Ok(())
}

fn unit(name: &str, value: f64) -> Result<(), PatternError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(PatternError::Config(format!(
            "{} must be within [0.0, 1.0], got {}",
            name, value
        )));
    }
    Ok(())
}
