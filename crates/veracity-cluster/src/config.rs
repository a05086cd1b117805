//! Configuration for the clustering engine

use crate::ClusterError;
use serde::{Deserialize, Serialize};

/// Grouping algorithm used by the engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClusterMethod {
    /// Density-based clustering over cosine distance
    #[default]
    Density,
    /// Single-pass seed grouping by a similarity threshold
    Greedy {
        /// Minimum cosine similarity to join a seed's group
        similarity_threshold: f64,
    },
}

/// Configuration for the clustering engine
///
/// # Examples
///
/// ```
/// use veracity_cluster::ClusterConfig;
///
/// let config = ClusterConfig::default();
/// assert_eq!(config.eps, 0.30);
/// assert_eq!(config.min_samples, 2);
///
/// let config = ClusterConfig::strict();
/// assert!(config.eps < ClusterConfig::lenient().eps);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Maximum cosine distance for two documents to be neighbours
    /// Default: 0.30
    pub eps: f64,

    /// Neighbours (including itself) a document needs to be a core point
    /// Default: 2
    pub min_samples: usize,

    /// Clusters smaller than this are demoted to noise
    /// Default: 2
    pub min_cluster_size: usize,

    /// Grouping algorithm
    pub method: ClusterMethod,

    /// Deployment embedding dimensionality; inferred from the first
    /// usable document when unset
    pub expected_dimension: Option<usize>,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            eps: 0.30,
            min_samples: 2,
            min_cluster_size: 2,
            method: ClusterMethod::Density,
            expected_dimension: None,
        }
    }
}

impl ClusterConfig {
    /// Tight, small clusters that suppress pairs
    pub fn strict() -> Self {
        Self {
            eps: 0.25,
            min_samples: 3,
            min_cluster_size: 3,
            ..Self::default()
        }
    }

    /// Looser clusters that may merge adjacent topics
    pub fn lenient() -> Self {
        Self {
            eps: 0.40,
            min_samples: 2,
            min_cluster_size: 2,
            ..Self::default()
        }
    }

    /// Same configuration with different density parameters
    pub fn with_density(mut self, eps: f64, min_samples: usize) -> Self {
        self.eps = eps;
        self.min_samples = min_samples;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ClusterError> {
        if !self.eps.is_finite() || !(0.0..=2.0).contains(&self.eps) {
            return Err(ClusterError::InvalidParameter(format!(
                "eps must be a cosine distance within [0.0, 2.0], got {}",
                self.eps
            )));
        }
        if self.min_samples == 0 {
            return Err(ClusterError::InvalidParameter(
                "min_samples must be at least 1".to_string(),
            ));
        }
        if self.min_cluster_size == 0 {
            return Err(ClusterError::InvalidParameter(
                "min_cluster_size must be at least 1".to_string(),
            ));
        }
        if self.expected_dimension == Some(0) {
            return Err(ClusterError::InvalidParameter(
                "expected_dimension must be greater than 0".to_string(),
            ));
        }
        if let ClusterMethod::Greedy {
            similarity_threshold,
        } = self.method
        {
            if !similarity_threshold.is_finite() || !(-1.0..=1.0).contains(&similarity_threshold) {
                return Err(ClusterError::InvalidParameter(format!(
                    "similarity_threshold must be within [-1.0, 1.0], got {}",
                    similarity_threshold
                )));
            }
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ClusterError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ClusterError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        assert!(ClusterConfig::default().validate().is_ok());
        assert!(ClusterConfig::strict().validate().is_ok());
        assert!(ClusterConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_zero_eps_is_accepted() {
        let config = ClusterConfig::default().with_density(0.0, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_eps() {
        for eps in [-0.1, 2.5, f64::NAN, f64::INFINITY] {
            let config = ClusterConfig::default().with_density(eps, 2);
            assert!(config.validate().is_err(), "eps {} should be rejected", eps);
        }
    }

    #[test]
    fn test_invalid_counts() {
        let config = ClusterConfig::default().with_density(0.3, 0);
        assert!(config.validate().is_err());

        let mut config = ClusterConfig::default();
        config.min_cluster_size = 0;
        assert!(config.validate().is_err());

        let mut config = ClusterConfig::default();
        config.expected_dimension = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_greedy_threshold() {
        let mut config = ClusterConfig::default();
        config.method = ClusterMethod::Greedy {
            similarity_threshold: 1.5,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = ClusterConfig::lenient();
        config.method = ClusterMethod::Greedy {
            similarity_threshold: 0.8,
        };
        config.expected_dimension = Some(384);

        let toml_str = config.to_toml().unwrap();
        let parsed = ClusterConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ClusterConfig::from_toml("eps = 0.35").unwrap();
        assert_eq!(config.eps, 0.35);
        assert_eq!(config.min_samples, 2);
        assert_eq!(config.method, ClusterMethod::Density);

        assert!(ClusterConfig::from_toml("eps = -1.0").is_err());
    }
}
