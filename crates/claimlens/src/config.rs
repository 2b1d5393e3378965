//! Analysis parameters.

use claimlens_data::schema::{GENDER, POSTAL_CODE, PROVINCE};
use claimlens_features::SplitConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors from loading or validating an [`AnalysisConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON.
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A parameter is out of range.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Parameters shared by every analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Significance level (default: 0.05)
    pub alpha: f64,
    /// Fraction of rows held out for testing (default: 0.2)
    pub test_fraction: f64,
    /// Seed for splitting and model training (default: 42)
    pub seed: u64,
    /// Postal codes compared by the zip-code tests (default: 10)
    pub top_n: usize,
    /// Columns summarized by claim frequency
    /// (default: Province, PostalCode, Gender)
    pub dimensions: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            alpha: claimlens_hypothesis::DEFAULT_ALPHA,
            test_fraction: 0.2,
            seed: 42,
            top_n: claimlens_hypothesis::DEFAULT_TOP_N,
            dimensions: vec![
                PROVINCE.to_string(),
                POSTAL_CODE.to_string(),
                GENDER.to_string(),
            ],
        }
    }
}

impl AnalysisConfig {
    /// Load from a JSON file; absent keys take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded analysis config");
        Ok(config)
    }

    /// Check every parameter is in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "alpha must be in (0, 1), got {}",
                self.alpha
            )));
        }
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "test_fraction must be in (0, 1), got {}",
                self.test_fraction
            )));
        }
        if self.top_n == 0 {
            return Err(ConfigError::Invalid("top_n must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Train/test split settings derived from this config.
    pub const fn split(&self) -> SplitConfig {
        SplitConfig {
            test_fraction: self.test_fraction,
            seed: self.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();

        assert_eq!(config.alpha, 0.05);
        assert_eq!(config.test_fraction, 0.2);
        assert_eq!(config.seed, 42);
        assert_eq!(config.top_n, 10);
        assert_eq!(config.dimensions, vec!["Province", "PostalCode", "Gender"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: AnalysisConfig = serde_json::from_str(r#"{"alpha": 0.01}"#).unwrap();

        assert_eq!(config.alpha, 0.01);
        assert_eq!(config.top_n, 10);
    }

    #[rstest]
    #[case(0.0, 0.2, 10)]
    #[case(1.0, 0.2, 10)]
    #[case(0.05, 0.0, 10)]
    #[case(0.05, 1.5, 10)]
    #[case(0.05, 0.2, 0)]
    fn test_rejects_out_of_range(
        #[case] alpha: f64,
        #[case] test_fraction: f64,
        #[case] top_n: usize,
    ) {
        let config = AnalysisConfig {
            alpha,
            test_fraction,
            top_n,
            ..AnalysisConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_split_settings() {
        let config = AnalysisConfig {
            seed: 7,
            ..AnalysisConfig::default()
        };
        let split = config.split();

        assert_eq!(split.seed, 7);
        assert_eq!(split.test_fraction, 0.2);
    }
}
