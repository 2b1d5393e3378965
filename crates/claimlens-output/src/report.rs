//! Analysis reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Significance level recorded when none is given.
const DEFAULT_ALPHA: f64 = 0.05;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Report name is empty.
    #[error("Report name must not be empty")]
    MissingName,
}

/// A named analysis report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Analysis name, e.g. `hypothesis_tests`.
    pub name: String,

    /// Report generation timestamp.
    pub timestamp: DateTime<Utc>,

    /// Significance level the analysis used.
    pub alpha: f64,

    /// Report contents (JSON format).
    pub contents: serde_json::Value,
}

impl Report {
    /// Create a new report stamped with the current time.
    pub fn new(name: String, alpha: f64, contents: serde_json::Value) -> Self {
        Self {
            name,
            timestamp: Utc::now(),
            alpha,
            contents,
        }
    }

    /// Convert report to JSON string.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// File name for this report: `<name>_<YYYYmmdd_HHMMSS>.json`.
    pub fn file_name(&self) -> String {
        format!("{}_{}.json", self.name, self.timestamp.format("%Y%m%d_%H%M%S"))
    }

    /// Write the report as pretty JSON into `dir`, returning the file path.
    pub fn save(&self, dir: &Path) -> Result<PathBuf, ReportError> {
        let path = dir.join(self.file_name());
        fs::write(&path, self.to_json()?)?;
        tracing::info!(path = %path.display(), "Saved report");
        Ok(path)
    }
}

/// Builder for creating reports.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    name: Option<String>,
    alpha: Option<f64>,
    contents: Option<serde_json::Value>,
}

impl ReportBuilder {
    /// Create a new report builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the report name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the significance level.
    pub const fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }

    /// Set the report contents.
    pub fn contents(mut self, contents: serde_json::Value) -> Self {
        self.contents = Some(contents);
        self
    }

    /// Serialize `value` into the report contents.
    pub fn contents_from<T: Serialize>(mut self, value: &T) -> Result<Self, ReportError> {
        self.contents = Some(serde_json::to_value(value)?);
        Ok(self)
    }

    /// Build the report.
    pub fn build(self) -> Result<Report, ReportError> {
        let name = self.name.filter(|n| !n.trim().is_empty()).ok_or(ReportError::MissingName)?;
        Ok(Report::new(
            name,
            self.alpha.unwrap_or(DEFAULT_ALPHA),
            self.contents.unwrap_or(serde_json::Value::Null),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_creation() {
        let report = Report::new(
            "hypothesis_tests".to_string(),
            0.05,
            serde_json::json!({"province": "rejected"}),
        );

        assert_eq!(report.name, "hypothesis_tests");
        assert_eq!(report.alpha, 0.05);
        assert!(report.file_name().starts_with("hypothesis_tests_"));
        assert!(report.file_name().ends_with(".json"));
    }

    #[test]
    fn test_report_builder() {
        let report = ReportBuilder::new()
            .name("model_comparison")
            .alpha(0.01)
            .contents(serde_json::json!({"key": "value"}))
            .build()
            .unwrap();

        assert_eq!(report.name, "model_comparison");
        assert_eq!(report.alpha, 0.01);
        assert_eq!(report.contents["key"], "value");
    }

    #[test]
    fn test_builder_defaults() {
        let report = ReportBuilder::new().name("defaults").build().unwrap();

        assert_eq!(report.alpha, 0.05);
        assert!(report.contents.is_null());
    }

    #[test]
    fn test_builder_requires_name() {
        assert!(matches!(
            ReportBuilder::new().build(),
            Err(ReportError::MissingName)
        ));
    }

    #[test]
    fn test_json_contains_fields() {
        let report = Report::new("r".to_string(), 0.05, serde_json::json!([1, 2]));
        let json = report.to_json().unwrap();

        assert!(json.contains("\"timestamp\""));
        assert!(json.contains("\"alpha\": 0.05"));
    }
}
