//! Configuration management for the CLI.
//!
//! One TOML file carries every tunable the engine exposes:
//!
//! ```toml
//! [settings]
//! color = true
//! format = "table"
//!
//! [cluster]
//! eps = 0.3
//! min_samples = 2
//!
//! [patterns.risk]
//! high_threshold = 0.7
//!
//! [credibility]
//! default_score = 0.5
//! fact_checkers = ["Snopes"]
//!
//! [credibility.scores]
//! "Reuters" = 0.95
//! ```
//!
//! A missing `[credibility]` section selects the built-in reference table.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use veracity_cluster::ClusterConfig;
use veracity_domain::SourceCredibilityTable;
use veracity_patterns::PatternConfig;

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Clustering parameters
    #[serde(default)]
    pub cluster: ClusterConfig,

    /// Analyzer and aggregation parameters
    #[serde(default)]
    pub patterns: PatternConfig,

    /// Source credibility overrides, kept raw until validated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credibility: Option<toml::Table>,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
}

impl Config {
    /// Load configuration from `path`, or defaults when no path is given.
    ///
    /// Every section is validated before the configuration is returned.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let contents = fs::read_to_string(path).map_err(|e| {
                    CliError::Config(format!("Failed to read {}: {}", path.display(), e))
                })?;
                Self::from_toml(&contents)?
            }
            None => Self::default(),
        };
        Ok(config)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.cluster.validate()?;
        self.patterns.validate()?;
        self.credibility_table()?;
        Ok(())
    }

    /// Build the credibility table, falling back to the reference table.
    pub fn credibility_table(&self) -> Result<SourceCredibilityTable> {
        match &self.credibility {
            Some(section) => {
                let text = toml::to_string(section).map_err(|e| {
                    CliError::Config(format!("Failed to read [credibility]: {}", e))
                })?;
                Ok(SourceCredibilityTable::from_toml(&text)?)
            }
            None => Ok(SourceCredibilityTable::reference()),
        }
    }

    /// Render the configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

#[cfg(test)]
mod tests {
    use super::*;
    use veracity_domain::CredibilityLookup;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.settings.color);
        assert_eq!(config.settings.format, OutputFormat::Table);
        assert_eq!(config.cluster, ClusterConfig::default());
        assert!(config.credibility.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::from_toml(
            r#"
            [settings]
            format = "json"

            [cluster]
            eps = 0.25
            min_samples = 3

            [patterns.risk]
            high_threshold = 0.8
            "#,
        )
        .unwrap();

        assert_eq!(config.settings.format, OutputFormat::Json);
        assert_eq!(config.cluster.eps, 0.25);
        assert_eq!(config.cluster.min_samples, 3);
        assert_eq!(config.cluster.min_cluster_size, 2);
        assert_eq!(config.patterns.risk.high_threshold, 0.8);
        assert_eq!(config.patterns.risk.medium_threshold, 0.4);
    }

    #[test]
    fn test_credibility_section() {
        let config = Config::from_toml(
            r#"
            [credibility]
            default_score = 0.2
            fact_checkers = ["Check Desk"]

            [credibility.scores]
            "Daily Planet" = 0.9
            "#,
        )
        .unwrap();

        let table = config.credibility_table().unwrap();
        assert_eq!(table.credibility("Daily Planet"), 0.9);
        assert_eq!(table.credibility("Somewhere Else"), 0.2);
        assert!(table.is_fact_checker("Check Desk"));
    }

    #[test]
    fn test_reference_table_without_section() {
        let table = Config::default().credibility_table().unwrap();
        assert_eq!(table, SourceCredibilityTable::reference());
    }

    #[test]
    fn test_invalid_sections_rejected() {
        assert!(Config::from_toml("[cluster]\neps = -1.0").is_err());
        assert!(Config::from_toml("[patterns.risk]\nhigh_threshold = 0.2\nmedium_threshold = 0.5").is_err());
        assert!(Config::from_toml("[credibility]\ndefault_score = 1.5").is_err());
    }

    #[test]
    fn test_round_trip() {
        let mut config = Config::default();
        config.cluster.eps = 0.35;
        let parsed = Config::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed.cluster.eps, 0.35);
        assert_eq!(parsed.patterns, config.patterns);
    }
}
