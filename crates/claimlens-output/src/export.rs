//! CSV and JSON export of analysis tables.

use claimlens_hypothesis::{GroupSummary, SeveritySummary};
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

/// One CSV row per record, header taken from the serde field names.
impl<T: Serialize> Exporter for [T] {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                for record in self {
                    wtr.serialize(record)?;
                }
                let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
                String::from_utf8(bytes).map_err(|e| ExportError::InvalidFormat(e.to_string()))
            }
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

/// CSV whose first header is `dimension` instead of the records' group field.
fn grouped_csv<T: Serialize>(
    records: &[T],
    dimension: &str,
    value_columns: &[&str],
) -> Result<String, ExportError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(vec![]);
    wtr.write_record(std::iter::once(dimension).chain(value_columns.iter().copied()))?;
    for record in records {
        wtr.serialize(record)?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| ExportError::InvalidFormat(e.to_string()))
}

/// Path of the claim frequency table for `dimension` inside `reports_dir`.
pub fn claim_frequency_path(reports_dir: &Path, dimension: &str) -> PathBuf {
    reports_dir.join(format!(
        "claim_frequency_{dimension}.{}",
        ExportFormat::Csv.extension()
    ))
}

/// Path of the claim severity table for `dimension` inside `reports_dir`.
pub fn claim_severity_path(reports_dir: &Path, dimension: &str) -> PathBuf {
    reports_dir.join(format!(
        "claim_severity_{dimension}.{}",
        ExportFormat::Csv.extension()
    ))
}

/// Claim frequency table as CSV, first column named after `dimension`.
pub fn claim_frequency_csv(summaries: &[GroupSummary], dimension: &str) -> Result<String, ExportError> {
    grouped_csv(summaries, dimension, &GroupSummary::VALUE_COLUMNS)
}

/// Write the group summaries for `dimension` as
/// `claim_frequency_<dimension>.csv`, returning the file path.
pub fn export_claim_frequency(
    summaries: &[GroupSummary],
    dimension: &str,
    reports_dir: &Path,
) -> Result<PathBuf, ExportError> {
    let path = claim_frequency_path(reports_dir, dimension);
    fs::write(&path, claim_frequency_csv(summaries, dimension)?)?;
    tracing::info!(
        dimension,
        groups = summaries.len(),
        path = %path.display(),
        "Exported claim frequency table"
    );
    Ok(path)
}

/// Write the severity summaries for `dimension` as
/// `claim_severity_<dimension>.csv`, returning the file path.
pub fn export_claim_severity(
    summaries: &[SeveritySummary],
    dimension: &str,
    reports_dir: &Path,
) -> Result<PathBuf, ExportError> {
    let path = claim_severity_path(reports_dir, dimension);
    fs::write(
        &path,
        grouped_csv(summaries, dimension, &SeveritySummary::VALUE_COLUMNS)?,
    )?;
    tracing::info!(
        dimension,
        groups = summaries.len(),
        path = %path.display(),
        "Exported claim severity table"
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimlens_models::FeatureImportance;

    fn summary(group: Option<&str>, premium: f64) -> GroupSummary {
        GroupSummary {
            group: group.map(str::to_string),
            claims_count: 1,
            total_policies: 4,
            claim_frequency: 0.25,
            total_premium: premium,
            total_claims: 200.0,
            claim_severity: Some(200.0),
            margin: premium - 200.0,
            loss_ratio: (premium > 0.0).then(|| 200.0 / premium),
        }
    }

    #[test]
    fn test_claim_frequency_header_uses_dimension() {
        let rows = vec![summary(Some("Gauteng"), 400.0)];
        let csv = claim_frequency_csv(&rows, "Province").unwrap();
        let header = csv.lines().next().unwrap();

        assert_eq!(
            header,
            "Province,Claims_Count,Total_Policies,Claim_Frequency,Total_Premium,Total_Claims,\
             Claim_Severity,Margin,Loss_Ratio"
        );
        assert!(csv.contains("Gauteng,1,4,0.25,400.0,200.0,200.0,200.0,0.5"));
    }

    #[test]
    fn test_value_columns_match_serialized_names() {
        let rows = vec![summary(Some("Gauteng"), 400.0)];
        let csv = rows.export_to_string(ExportFormat::Csv).unwrap();
        let header = csv.lines().next().unwrap();

        assert_eq!(header, format!("Group,{}", GroupSummary::VALUE_COLUMNS.join(",")));

        let severity = vec![SeveritySummary {
            group: Some("Gauteng".to_string()),
            mean_severity: 200.0,
            std_severity: None,
            claim_count: 1,
        }];
        let csv = severity.export_to_string(ExportFormat::Csv).unwrap();
        assert_eq!(
            csv.lines().next().unwrap(),
            format!("Group,{}", SeveritySummary::VALUE_COLUMNS.join(","))
        );
    }

    #[test]
    fn test_missing_values_are_empty_fields() {
        let rows = vec![summary(None, 0.0)];
        let csv = rows.export_to_string(ExportFormat::Csv).unwrap();
        let record = csv.lines().nth(1).unwrap();

        assert!(record.starts_with(','));
        assert!(record.ends_with(','));
    }

    #[test]
    fn test_feature_importance_json() {
        let rows = vec![FeatureImportance {
            feature: "VehicleAge".to_string(),
            importance: 0.7,
        }];
        let json = rows.export_to_string(ExportFormat::Json).unwrap();

        assert_eq!(json, r#"[{"Feature":"VehicleAge","Importance":0.7}]"#);
    }

    #[test]
    fn test_export_format_extension() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::Json.extension(), "json");
        assert_eq!(ExportFormat::PrettyJson.extension(), "json");
    }

    #[test]
    fn test_claim_frequency_path() {
        let path = claim_frequency_path(Path::new("reports"), "Province");
        assert_eq!(path, Path::new("reports").join("claim_frequency_Province.csv"));
        let path = claim_severity_path(Path::new("reports"), "Gender");
        assert_eq!(path, Path::new("reports").join("claim_severity_Gender.csv"));
    }
}
