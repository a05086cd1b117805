//! Risk aggregation
//!
//! Combines the four sub-scores into one overall score through a pluggable
//! [`AggregationStrategy`], then derives the risk level, red flags and a
//! recommendation.

use crate::analysis::PatternAnalysis;
use crate::config::RiskConfig;
use crate::contradiction::ContradictionResult;
use crate::credibility::CredibilityResult;
use crate::evolution::EvolutionResult;
use crate::growth::GrowthResult;
use crate::PatternError;
use chrono::Utc;
use std::fmt;
use veracity_domain::{ClusterId, RiskFlags, RiskLevel};

/// Combines the growth, credibility, contradiction and evolution scores
/// (in that order) into one score.
///
/// Implementations receive scores in [0, 1]. The aggregator clamps the
/// output to [0, 1] regardless.
pub trait AggregationStrategy: Send + Sync + fmt::Debug {
    /// Combine four sub-scores
    fn combine(&self, scores: [f64; 4]) -> f64;

    /// Short name recorded on every analysis
    fn name(&self) -> &str;
}

/// Unweighted arithmetic mean
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanAggregation;

impl AggregationStrategy for MeanAggregation {
    fn combine(&self, scores: [f64; 4]) -> f64 {
        scores.iter().sum::<f64>() / 4.0
    }

    fn name(&self) -> &str {
        "mean"
    }
}

/// Weighted mean with non-negative weights
#[derive(Debug, Clone, Copy)]
pub struct WeightedAggregation {
    weights: [f64; 4],
}

impl WeightedAggregation {
    /// Weights for growth, credibility, contradiction and evolution.
    ///
    /// Weights must be finite and non-negative with a positive sum. They
    /// are normalized, so `[2, 1, 1, 0]` and `[0.5, 0.25, 0.25, 0]` agree.
    pub fn new(weights: [f64; 4]) -> Result<Self, PatternError> {
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(PatternError::Config(format!(
                "aggregation weights must be finite and non-negative, got {:?}",
                weights
            )));
        }
        let sum: f64 = weights.iter().sum();
        if sum <= 0.0 {
            return Err(PatternError::Config(
                "aggregation weights must have a positive sum".to_string(),
            ));
        }
        Ok(Self {
            weights: weights.map(|w| w / sum),
        })
    }

    /// Normalized weights
    pub fn weights(&self) -> [f64; 4] {
        self.weights
    }
}

impl AggregationStrategy for WeightedAggregation {
    fn combine(&self, scores: [f64; 4]) -> f64 {
        scores
            .iter()
            .zip(self.weights.iter())
            .map(|(s, w)| s * w)
            .sum()
    }

    fn name(&self) -> &str {
        "weighted"
    }
}

/// Highest single score; any one alarming signal dominates
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxAggregation;

impl AggregationStrategy for MaxAggregation {
    fn combine(&self, scores: [f64; 4]) -> f64 {
        scores.iter().copied().fold(0.0, f64::max)
    }

    fn name(&self) -> &str {
        "max"
    }
}

/// Join point for the four analyzers
#[derive(Debug)]
pub struct RiskAggregator {
    config: RiskConfig,
    strategy: Box<dyn AggregationStrategy>,
}

impl RiskAggregator {
    /// Aggregator using the strategy named in `config`
    pub fn new(config: RiskConfig) -> Result<Self, PatternError> {
        config.validate()?;
        let strategy = config.aggregation.build()?;
        Ok(Self { config, strategy })
    }

    /// Replace the strategy with a custom one
    pub fn with_strategy(mut self, strategy: Box<dyn AggregationStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    /// Active configuration
    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// Name of the active strategy
    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }

    /// Derive the red flags from the sub-analyses
    pub fn flags(
        &self,
        growth: &GrowthResult,
        credibility: &CredibilityResult,
        contradiction: &ContradictionResult,
        evolution: &EvolutionResult,
    ) -> RiskFlags {
        RiskFlags::new(
            growth.is_rapid_growth,
            credibility.availability.is_usable() && !credibility.meets_credibility_threshold,
            contradiction.contradiction_count >= self.config.min_contradictions_for_flag
                && contradiction.contradiction_count > 0,
            evolution.has_evolution
                && evolution.key_changes.len() >= self.config.min_changes_for_flag,
        )
    }

    /// Combine four sub-scores into a score in [0, 1]
    pub fn overall_score(&self, scores: [f64; 4]) -> f64 {
        let clamped = scores.map(|s| if s.is_finite() { s.clamp(0.0, 1.0) } else { 0.0 });
        let combined = self.strategy.combine(clamped);
        if combined.is_finite() {
            combined.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Build the final record for a cluster
    pub fn aggregate(
        &self,
        cluster_id: ClusterId,
        datapoint_count: usize,
        growth: GrowthResult,
        credibility: CredibilityResult,
        contradiction: ContradictionResult,
        evolution: EvolutionResult,
    ) -> PatternAnalysis {
        let overall_risk_score = self.overall_score([
            growth.risk_score,
            credibility.risk_score,
            contradiction.risk_score,
            evolution.risk_score,
        ]);
        let risk_level = RiskLevel::from_score(
            overall_risk_score,
            self.config.medium_threshold,
            self.config.high_threshold,
        );
        let flags = self.flags(&growth, &credibility, &contradiction, &evolution);

        PatternAnalysis {
            cluster_id,
            datapoint_count,
            overall_risk_score,
            risk_level,
            flags,
            recommendation: recommendation(risk_level, &flags),
            aggregation: self.strategy.name().to_string(),
            growth,
            credibility,
            contradiction,
            evolution,
            analyzed_at: Utc::now(),
        }
    }
}

/// Recommendation text for a risk level and flag set
///
/// # Examples
///
/// ```
/// use veracity_domain::{RiskFlags, RiskLevel};
/// use veracity_patterns::recommendation;
///
/// let flags = RiskFlags::new(true, true, false, false);
/// assert_eq!(
///     recommendation(RiskLevel::High, &flags),
///     "HIGH RISK: immediate review recommended - 2 red flag(s) detected"
/// );
/// ```
pub fn recommendation(level: RiskLevel, flags: &RiskFlags) -> String {
    match level {
        RiskLevel::High => format!(
            "HIGH RISK: immediate review recommended - {} red flag(s) detected",
            flags.flag_count
        ),
        RiskLevel::Medium => format!(
            "MEDIUM RISK: review recommended - {} concerning pattern(s) detected",
            flags.flag_count
        ),
        RiskLevel::Low if flags.rapid_growth || flags.has_contradictions => {
            "MONITOR: keep monitoring for emerging patterns".to_string()
        }
        RiskLevel::Low => "LOW RISK: consistent with organic news coverage".to_string(),
    }
}
