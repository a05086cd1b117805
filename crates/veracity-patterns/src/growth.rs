//! Growth velocity analysis
//!
//! Compares how many documents arrived in the most recent window with the
//! window immediately before it, and how fast the cluster accumulated
//! documents overall.

use crate::config::GrowthConfig;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use veracity_domain::{Availability, Document};

/// Growth evidence for one cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthResult {
    /// Growth rate exceeded the configured multiple
    pub is_rapid_growth: bool,
    /// Current window size over previous window size
    pub growth_rate: f64,
    /// Documents in `[latest - window, latest]`
    pub current_window_size: usize,
    /// Documents in `[latest - 2 window, latest - window)`
    pub previous_window_size: usize,
    /// Window width used
    pub window_hours: u32,
    /// Timestamped documents per hour of observed span
    pub documents_per_hour: f64,
    /// Timestamped documents analyzed
    pub total_documents: usize,
    /// Hours between the earliest and latest document
    pub observed_span_hours: f64,
    /// Earliest publication time
    pub first_published_at: Option<DateTime<Utc>>,
    /// Latest publication time
    pub last_published_at: Option<DateTime<Utc>>,
    /// Risk contribution in [0, 1]
    pub risk_score: f64,
    /// Confidence in [0, 1], low when the span is short
    pub confidence: f64,
    /// Whether the analysis could run
    pub availability: Availability,
    /// Documents without a publication time
    pub skipped_documents: usize,
}

impl GrowthResult {
    /// Zero-risk result for a cluster with no usable timestamps
    pub fn unavailable(window_hours: u32, skipped_documents: usize) -> Self {
        Self {
            is_rapid_growth: false,
            growth_rate: 0.0,
            current_window_size: 0,
            previous_window_size: 0,
            window_hours,
            documents_per_hour: 0.0,
            total_documents: 0,
            observed_span_hours: 0.0,
            first_published_at: None,
            last_published_at: None,
            risk_score: 0.0,
            confidence: 0.0,
            availability: Availability::Unavailable,
            skipped_documents,
        }
    }
}

/// Measure spread velocity and window-over-window growth.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use veracity_domain::Document;
/// use veracity_patterns::{analyze_growth, GrowthConfig};
///
/// let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
/// let docs = vec![
///     Document::new("a", "Outage").published(start),
///     Document::new("b", "Outage spreads").published(start + chrono::Duration::hours(7)),
/// ];
///
/// let growth = analyze_growth(&docs, &GrowthConfig::default());
/// assert_eq!(growth.current_window_size, 1);
/// assert_eq!(growth.previous_window_size, 1);
/// assert_eq!(growth.growth_rate, 1.0);
/// ```
pub fn analyze_growth(documents: &[Document], config: &GrowthConfig) -> GrowthResult {
    let mut times: Vec<DateTime<Utc>> =
        documents.iter().filter_map(|d| d.published_at).collect();
    let skipped = documents.len() - times.len();
    if skipped > 0 {
        debug!("Growth analysis skipping {} documents without timestamps", skipped);
    }

    times.sort_unstable();
    let (Some(&first), Some(&latest)) = (times.first(), times.last()) else {
        return GrowthResult::unavailable(config.window_hours, skipped);
    };

    let window = Duration::hours(i64::from(config.window_hours));
    let current_start = latest - window;
    let previous_start = current_start - window;

    let current = times.iter().filter(|t| **t >= current_start).count();
    let previous = times
        .iter()
        .filter(|t| **t >= previous_start && **t < current_start)
        .count();

    let growth_rate = if previous == 0 {
        if current > 0 {
            config.growth_cap
        } else {
            0.0
        }
    } else {
        current as f64 / previous as f64
    };

    let span_hours = (latest - first).num_milliseconds() as f64 / 3_600_000.0;
    let total = times.len();
    let velocity = total as f64 / span_hours.max(1.0);

    let growth_term = growth_rate.min(config.growth_cap) / config.growth_cap;
    let velocity_term = velocity.min(config.velocity_cap) / config.velocity_cap;
    let size_term = total.min(config.size_cap) as f64 / config.size_cap as f64;
    let risk_score = (0.4 * growth_term + 0.3 * velocity_term + 0.3 * size_term).clamp(0.0, 1.0);

    let confidence = (span_hours / f64::from(config.window_hours)).min(1.0);
    let availability = if confidence < 1.0 {
        Availability::Degraded
    } else {
        Availability::Available
    };

    GrowthResult {
        is_rapid_growth: growth_rate > config.rapid_growth_multiple,
        growth_rate,
        current_window_size: current,
        previous_window_size: previous,
        window_hours: config.window_hours,
        documents_per_hour: velocity,
        total_documents: total,
        observed_span_hours: span_hours,
        first_published_at: Some(first),
        last_published_at: Some(latest),
        risk_score,
        confidence,
        availability,
        skipped_documents: skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hours: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap() + Duration::hours(hours)
    }

    fn docs_at(hours: &[i64]) -> Vec<Document> {
        hours
            .iter()
            .enumerate()
            .map(|(i, h)| Document::new(format!("d{}", i), "t").published(at(*h)))
            .collect()
    }

    #[test]
    fn test_documents_far_apart() {
        let docs = docs_at(&[0, 24 * 100]);
        let result = analyze_growth(&docs, &GrowthConfig::default());

        assert_eq!(result.previous_window_size, 0);
        assert_eq!(result.current_window_size, 1);
        assert_eq!(result.growth_rate, 10.0);
        assert!(!result.is_rapid_growth);
        assert_eq!(result.availability, Availability::Available);
        assert!(result.risk_score > 0.0 && result.risk_score <= 1.0);
    }

    #[test]
    fn test_window_boundaries() {
        // latest = 20; current [14, 20]; previous [8, 14)
        let docs = docs_at(&[7, 8, 13, 14, 20]);
        let result = analyze_growth(&docs, &GrowthConfig::default());

        assert_eq!(result.current_window_size, 2);
        assert_eq!(result.previous_window_size, 2);
        assert_eq!(result.growth_rate, 1.0);
    }

    #[test]
    fn test_rapid_growth() {
        let mut hours = vec![0];
        hours.extend(std::iter::repeat(10).take(12));
        let docs = docs_at(&hours);
        let config = GrowthConfig {
            rapid_growth_multiple: 5.0,
            growth_cap: 20.0,
            ..GrowthConfig::default()
        };
        let result = analyze_growth(&docs, &config);

        // previous window [-2, 4) holds the single early document
        assert_eq!(result.previous_window_size, 1);
        assert_eq!(result.current_window_size, 12);
        assert_eq!(result.growth_rate, 12.0);
        assert!(result.is_rapid_growth);
    }

    #[test]
    fn test_zero_span_is_degraded() {
        let docs = docs_at(&[5, 5, 5]);
        let result = analyze_growth(&docs, &GrowthConfig::default());

        assert_eq!(result.observed_span_hours, 0.0);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.availability, Availability::Degraded);
        assert_eq!(result.documents_per_hour, 3.0);
        assert!(result.risk_score > 0.0);
    }

    #[test]
    fn test_no_timestamps_is_unavailable() {
        let docs = vec![Document::new("a", "t"), Document::new("b", "t")];
        let result = analyze_growth(&docs, &GrowthConfig::default());

        assert_eq!(result.availability, Availability::Unavailable);
        assert_eq!(result.risk_score, 0.0);
        assert_eq!(result.skipped_documents, 2);
    }

    #[test]
    fn test_missing_timestamps_counted() {
        let mut docs = docs_at(&[0, 6, 12]);
        docs.push(Document::new("untimed", "t"));
        let result = analyze_growth(&docs, &GrowthConfig::default());

        assert_eq!(result.total_documents, 3);
        assert_eq!(result.skipped_documents, 1);
    }

    #[test]
    fn test_risk_formula() {
        // 3 docs over 12 h: growth 2/1, velocity 0.25, size 3
        let docs = docs_at(&[0, 6, 12]);
        let result = analyze_growth(&docs, &GrowthConfig::default());

        assert_eq!(result.growth_rate, 2.0);
        let expected = 0.4 * (2.0 / 10.0) + 0.3 * (0.25 / 10.0) + 0.3 * (3.0 / 50.0);
        assert!((result.risk_score - expected).abs() < 1e-12);
    }
}
