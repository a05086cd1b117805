//! Risk vocabulary shared by the analyzers and the aggregator

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete risk bucket derived from an aggregated score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// Consistent with organic coverage
    Low,
    /// Worth a human look
    Medium,
    /// Immediate review recommended
    High,
}

impl RiskLevel {
    /// Bucket a score given the medium and high cut-offs (both inclusive).
    ///
    /// # Examples
    ///
    /// ```
    /// use veracity_domain::RiskLevel;
    ///
    /// assert_eq!(RiskLevel::from_score(0.75, 0.4, 0.7), RiskLevel::High);
    /// assert_eq!(RiskLevel::from_score(0.4, 0.4, 0.7), RiskLevel::Medium);
    /// assert_eq!(RiskLevel::from_score(0.1, 0.4, 0.7), RiskLevel::Low);
    /// ```
    pub fn from_score(score: f64, medium_threshold: f64, high_threshold: f64) -> Self {
        if score >= high_threshold {
            RiskLevel::High
        } else if score >= medium_threshold {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// Lowercase name as it appears in serialized output
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four independent red flags raised for a cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RiskFlags {
    /// Growth rate exceeded the configured multiple
    pub rapid_growth: bool,
    /// Too few documents from credible sources
    pub low_credibility: bool,
    /// At least the configured number of contradicting pairs
    pub has_contradictions: bool,
    /// Vocabulary shifted between time windows
    pub narrative_evolution: bool,
    /// Number of the above that are set
    pub flag_count: u8,
}

impl RiskFlags {
    /// Build flags with a consistent `flag_count`
    pub fn new(
        rapid_growth: bool,
        low_credibility: bool,
        has_contradictions: bool,
        narrative_evolution: bool,
    ) -> Self {
        let flag_count = [rapid_growth, low_credibility, has_contradictions, narrative_evolution]
            .iter()
            .filter(|f| **f)
            .count() as u8;
        Self {
            rapid_growth,
            low_credibility,
            has_contradictions,
            narrative_evolution,
            flag_count,
        }
    }

    /// Whether any flag is raised
    pub fn any(&self) -> bool {
        self.flag_count > 0
    }
}

/// Whether a sub-analysis ran on enough data to be trusted.
///
/// A sub-analysis that cannot run never fails the whole cluster. It
/// reports `Unavailable` with zero risk instead, and the aggregator keeps
/// going with the remaining signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    /// Ran on sufficient data
    #[default]
    Available,
    /// Ran, but on too little data for full confidence
    Degraded,
    /// Could not run; risk contribution is zero
    Unavailable,
}

impl Availability {
    /// True unless the analysis could not run at all
    pub fn is_usable(&self) -> bool {
        !matches!(self, Availability::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_count() {
        assert_eq!(RiskFlags::new(false, false, false, false).flag_count, 0);
        assert_eq!(RiskFlags::new(true, false, true, false).flag_count, 2);
        let all = RiskFlags::new(true, true, true, true);
        assert_eq!(all.flag_count, 4);
        assert!(all.any());
        assert!(!RiskFlags::default().any());
    }

    #[test]
    fn test_level_boundaries_inclusive() {
        assert_eq!(RiskLevel::from_score(0.7, 0.4, 0.7), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(0.6999, 0.4, 0.7), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(0.3999, 0.4, 0.7), RiskLevel::Low);
        assert!(RiskLevel::High > RiskLevel::Low);
    }

    #[test]
    fn test_serialized_names() {
        assert_eq!(serde_json::to_string(&RiskLevel::High).unwrap(), "\"high\"");
        assert_eq!(
            serde_json::to_string(&Availability::Unavailable).unwrap(),
            "\"unavailable\""
        );
        assert_eq!(RiskLevel::Medium.to_string(), "medium");
    }

    #[test]
    fn test_availability_usable() {
        assert!(Availability::Available.is_usable());
        assert!(Availability::Degraded.is_usable());
        assert!(!Availability::Unavailable.is_usable());
    }
}
