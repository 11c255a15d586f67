//! Configuration system for the LandingZone advisor.
//!
//! Load thresholds from TOML or YAML files to tune conflict detection and
//! strictness suggestions without code changes.
//!
//! # Examples
//!
//! Load configuration from a TOML string:
//!
//! ```
//! use landingzone_config::AdvisorConfig;
//!
//! let config = AdvisorConfig::from_toml_str(r#"
//!     [restrictiveness]
//!     error_below = 50
//!     warning_below = 250
//!
//!     [strictness]
//!     max_suggestions = 5
//! "#).unwrap();
//!
//! assert_eq!(config.restrictiveness.error_below, 50);
//! assert_eq!(config.strictness.max_suggestions, 5);
//! // Unspecified sections keep their defaults.
//! assert_eq!(config.features.max_and_features, 4);
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use landingzone_config::AdvisorConfig;
//!
//! let config = AdvisorConfig::load("advisor.toml").unwrap_or_default();
//! assert_eq!(config.restrictiveness.warning_below, 500);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main advisor configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AdvisorConfig {
    /// Thresholds for the overall restrictiveness warning.
    #[serde(default)]
    pub restrictiveness: RestrictivenessConfig,

    /// Thresholds for map feature conjunctions.
    #[serde(default)]
    pub features: FeatureConfig,

    /// Strictness suggestion settings.
    #[serde(default)]
    pub strictness: StrictnessConfig,
}

impl AdvisorConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist, contains invalid TOML, or fails
    /// validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the restrictiveness thresholds.
    pub fn with_restrictiveness(mut self, error_below: u64, warning_below: u64) -> Self {
        self.restrictiveness.error_below = error_below;
        self.restrictiveness.warning_below = warning_below;
        self
    }

    /// Sets how many strictness suggestions are returned.
    pub fn with_max_suggestions(mut self, max: usize) -> Self {
        self.strictness.max_suggestions = max;
        self
    }

    /// Sets the rarity cutoff for map features.
    pub fn with_ultra_rare_fraction(mut self, fraction: f64) -> Self {
        self.features.ultra_rare_fraction = fraction;
        self
    }

    /// Checks that thresholds are ordered and within range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let r = &self.restrictiveness;
        if r.error_below > r.warning_below {
            return Err(ConfigError::Invalid(format!(
                "restrictiveness.error_below ({}) exceeds warning_below ({})",
                r.error_below, r.warning_below
            )));
        }
        if !(0.0..=1.0).contains(&self.features.ultra_rare_fraction) {
            return Err(ConfigError::Invalid(
                "features.ultra_rare_fraction must lie in [0, 1]".to_string(),
            ));
        }
        if !(self.strictness.epsilon > 0.0 && self.strictness.epsilon < 1.0) {
            return Err(ConfigError::Invalid(
                "strictness.epsilon must lie in (0, 1)".to_string(),
            ));
        }
        let c = &self.strictness.categories;
        let ordered = c.guaranteed >= c.very_high
            && c.very_high >= c.high
            && c.high >= c.medium
            && c.medium >= c.low;
        if !ordered {
            return Err(ConfigError::Invalid(
                "strictness.categories thresholds must be non-increasing".to_string(),
            ));
        }
        Ok(())
    }
}

/// Expected-match thresholds for the restrictiveness rule.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", default)]
pub struct RestrictivenessConfig {
    /// Fewer expected matches than this is an error.
    pub error_below: u64,

    /// Fewer expected matches than this is a warning.
    pub warning_below: u64,

    /// When estimation fails, more hard criteria than this is a warning.
    pub fallback_max_hard_criteria: usize,
}

impl Default for RestrictivenessConfig {
    fn default() -> Self {
        Self {
            error_below: 100,
            warning_below: 500,
            fallback_max_hard_criteria: 6,
        }
    }
}

/// Thresholds for AND-ed map feature requirements.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", default)]
pub struct FeatureConfig {
    /// A feature on fewer than this share of candidates is ultra-rare.
    pub ultra_rare_fraction: f64,

    /// This many AND-ed required features triggers a warning.
    pub max_and_features: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            ultra_rare_fraction: 0.005,
            max_and_features: 4,
        }
    }
}

/// Strictness suggestion settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", default)]
pub struct StrictnessConfig {
    /// Maximum suggestions returned.
    pub max_suggestions: usize,

    /// Strictness values closer than this are considered equal.
    pub epsilon: f64,

    /// Expected-match thresholds for the qualitative categories.
    pub categories: CategoryThresholds,
}

impl Default for StrictnessConfig {
    fn default() -> Self {
        Self {
            max_suggestions: 3,
            epsilon: 0.01,
            categories: CategoryThresholds::default(),
        }
    }
}

/// Minimum expected matches for each qualitative category.
///
/// Anything below `low` is very low.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", default)]
pub struct CategoryThresholds {
    pub guaranteed: f64,
    pub very_high: f64,
    pub high: f64,
    pub medium: f64,
    pub low: f64,
}

impl Default for CategoryThresholds {
    fn default() -> Self {
        Self {
            guaranteed: 1000.0,
            very_high: 250.0,
            high: 50.0,
            medium: 10.0,
            low: 1.0,
        }
    }
}
