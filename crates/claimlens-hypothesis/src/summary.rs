//! Claim frequency and severity summaries per group.

use crate::error::Result;
use claimlens_data::schema::{HAS_CLAIM, TOTAL_CLAIMS, TOTAL_PREMIUM};
use claimlens_data::{f64_column, require_columns, string_column};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Aggregates for one value of a grouping dimension.
///
/// Serialized field names match the exported CSV columns; exports name the
/// `Group` column after the grouping dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    /// Group key; `None` collects rows with a missing value
    #[serde(rename = "Group")]
    pub group: Option<String>,
    /// Policies with `TotalClaims > 0`
    #[serde(rename = "Claims_Count")]
    pub claims_count: usize,
    /// Policies in the group
    #[serde(rename = "Total_Policies")]
    pub total_policies: usize,
    /// `claims_count / total_policies`
    #[serde(rename = "Claim_Frequency")]
    pub claim_frequency: f64,
    /// Sum of premiums
    #[serde(rename = "Total_Premium")]
    pub total_premium: f64,
    /// Sum of claims
    #[serde(rename = "Total_Claims")]
    pub total_claims: f64,
    /// `total_claims / claims_count`; undefined without claims
    #[serde(rename = "Claim_Severity")]
    pub claim_severity: Option<f64>,
    /// `total_premium - total_claims`
    #[serde(rename = "Margin")]
    pub margin: f64,
    /// `total_claims / total_premium`; undefined for zero premium
    #[serde(rename = "Loss_Ratio")]
    pub loss_ratio: Option<f64>,
}

impl GroupSummary {
    /// Exported column names after the group column.
    pub const VALUE_COLUMNS: [&'static str; 8] = [
        "Claims_Count",
        "Total_Policies",
        "Claim_Frequency",
        "Total_Premium",
        "Total_Claims",
        "Claim_Severity",
        "Margin",
        "Loss_Ratio",
    ];
}

/// Claim amount statistics for one group, over claim records only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeveritySummary {
    /// Group key; `None` collects rows with a missing value
    #[serde(rename = "Group")]
    pub group: Option<String>,
    /// Mean claim amount
    #[serde(rename = "Mean_Severity")]
    pub mean_severity: f64,
    /// Sample standard deviation; undefined for a single claim
    #[serde(rename = "Std_Severity")]
    pub std_severity: Option<f64>,
    /// Number of claims
    #[serde(rename = "Claim_Count")]
    pub claim_count: usize,
}

impl SeveritySummary {
    /// Exported column names after the group column.
    pub const VALUE_COLUMNS: [&'static str; 3] = ["Mean_Severity", "Std_Severity", "Claim_Count"];
}

fn as_count(value: Option<f64>) -> usize {
    value.map_or(0, |v| v as usize)
}

/// Claim frequency, severity, margin and loss ratio per value of `dimension`.
///
/// Rows with a missing `dimension` value form their own group, so policy
/// counts always sum to the table height. Sorted by group key, missing last.
pub fn group_claim_frequency(df: &DataFrame, dimension: &str) -> Result<Vec<GroupSummary>> {
    require_columns(df, &[dimension, TOTAL_PREMIUM, TOTAL_CLAIMS])?;

    let out = df
        .clone()
        .lazy()
        .with_columns([
            col(dimension).cast(DataType::String),
            col(TOTAL_PREMIUM).cast(DataType::Float64),
            col(TOTAL_CLAIMS).cast(DataType::Float64),
            when(col(TOTAL_CLAIMS).gt(lit(0.0)))
                .then(lit(1.0))
                .otherwise(lit(0.0))
                .alias(HAS_CLAIM),
        ])
        .group_by([col(dimension)])
        .agg([
            col(HAS_CLAIM).sum().alias("claims_count"),
            len().cast(DataType::Float64).alias("total_policies"),
            col(TOTAL_PREMIUM).sum().alias("total_premium"),
            col(TOTAL_CLAIMS).sum().alias("total_claims"),
        ])
        .with_columns([
            (col("claims_count") / col("total_policies")).alias("claim_frequency"),
            when(col("claims_count").gt(lit(0.0)))
                .then(col("total_claims") / col("claims_count"))
                .otherwise(lit(NULL))
                .alias("claim_severity"),
            (col("total_premium") - col("total_claims")).alias("margin"),
            when(col("total_premium").neq(lit(0.0)))
                .then(col("total_claims") / col("total_premium"))
                .otherwise(lit(NULL))
                .alias("loss_ratio"),
        ])
        .sort(
            [dimension],
            SortMultipleOptions::default().with_nulls_last(true),
        )
        .collect()?;

    debug!(dimension, groups = out.height(), "Computed claim frequency");

    let groups = string_column(&out, dimension)?;
    let claims_count = f64_column(&out, "claims_count")?;
    let total_policies = f64_column(&out, "total_policies")?;
    let claim_frequency = f64_column(&out, "claim_frequency")?;
    let total_premium = f64_column(&out, "total_premium")?;
    let total_claims = f64_column(&out, "total_claims")?;
    let claim_severity = f64_column(&out, "claim_severity")?;
    let margin = f64_column(&out, "margin")?;
    let loss_ratio = f64_column(&out, "loss_ratio")?;

    Ok((0..out.height())
        .map(|i| GroupSummary {
            group: groups[i].clone(),
            claims_count: as_count(claims_count[i]),
            total_policies: as_count(total_policies[i]),
            claim_frequency: claim_frequency[i].unwrap_or(0.0),
            total_premium: total_premium[i].unwrap_or(0.0),
            total_claims: total_claims[i].unwrap_or(0.0),
            claim_severity: claim_severity[i],
            margin: margin[i].unwrap_or(0.0),
            loss_ratio: loss_ratio[i],
        })
        .collect())
}

/// Mean, standard deviation (ddof = 1) and count of claim amounts per value of
/// `dimension`, over claim records only.
///
/// Returns an empty summary when the table has no claim records.
pub fn group_claim_severity(df: &DataFrame, dimension: &str) -> Result<Vec<SeveritySummary>> {
    require_columns(df, &[dimension, TOTAL_CLAIMS])?;

    let out = df
        .clone()
        .lazy()
        .with_columns([
            col(dimension).cast(DataType::String),
            col(TOTAL_CLAIMS).cast(DataType::Float64),
        ])
        .filter(col(TOTAL_CLAIMS).gt(lit(0.0)))
        .group_by([col(dimension)])
        .agg([
            col(TOTAL_CLAIMS).mean().alias("mean_severity"),
            col(TOTAL_CLAIMS).std(1).alias("std_severity"),
            len().cast(DataType::Float64).alias("claim_count"),
        ])
        .sort(
            [dimension],
            SortMultipleOptions::default().with_nulls_last(true),
        )
        .collect()?;

    if out.height() == 0 {
        debug!(dimension, "No claim records, severity summary is empty");
        return Ok(Vec::new());
    }

    let groups = string_column(&out, dimension)?;
    let mean_severity = f64_column(&out, "mean_severity")?;
    let std_severity = f64_column(&out, "std_severity")?;
    let claim_count = f64_column(&out, "claim_count")?;

    Ok((0..out.height())
        .map(|i| SeveritySummary {
            group: groups[i].clone(),
            mean_severity: mean_severity[i].unwrap_or(0.0),
            std_severity: std_severity[i].filter(|s| s.is_finite()),
            claim_count: as_count(claim_count[i]),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample() -> DataFrame {
        DataFrame::new(vec![
            Column::new(
                "Province".into(),
                &[Some("Gauteng"), Some("Gauteng"), Some("Limpopo"), None, Some("Gauteng")],
            ),
            Column::new(TOTAL_PREMIUM.into(), &[100.0, 200.0, 0.0, 50.0, 100.0]),
            Column::new(TOTAL_CLAIMS.into(), &[Some(0.0), Some(300.0), Some(0.0), None, Some(100.0)]),
        ])
        .unwrap()
    }

    #[test]
    fn test_frequency_summary() {
        let summary = group_claim_frequency(&sample(), "Province").unwrap();
        assert_eq!(summary.len(), 3);

        let gauteng = &summary[0];
        assert_eq!(gauteng.group.as_deref(), Some("Gauteng"));
        assert_eq!(gauteng.claims_count, 2);
        assert_eq!(gauteng.total_policies, 3);
        assert_relative_eq!(gauteng.claim_frequency, 2.0 / 3.0);
        assert_relative_eq!(gauteng.claim_severity.unwrap(), 200.0);
        assert_relative_eq!(gauteng.margin, 0.0);
        assert_relative_eq!(gauteng.loss_ratio.unwrap(), 1.0);

        // zero premium and no claims: both ratios undefined
        let limpopo = &summary[1];
        assert_eq!(limpopo.group.as_deref(), Some("Limpopo"));
        assert!(limpopo.loss_ratio.is_none());
        assert!(limpopo.claim_severity.is_none());

        // missing key sorts last
        assert!(summary[2].group.is_none());
        assert_eq!(summary[2].total_policies, 1);
    }

    #[test]
    fn test_severity_summary() {
        let summary = group_claim_severity(&sample(), "Province").unwrap();
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].claim_count, 2);
        assert_relative_eq!(summary[0].mean_severity, 200.0);
        // sample std of [300, 100]
        assert_relative_eq!(summary[0].std_severity.unwrap(), 20_000.0_f64.sqrt());
    }

    #[test]
    fn test_severity_summary_without_claims_is_empty() {
        let df = DataFrame::new(vec![
            Column::new("Province".into(), &["A", "B"]),
            Column::new(TOTAL_CLAIMS.into(), &[0.0, 0.0]),
        ])
        .unwrap();
        assert!(group_claim_severity(&df, "Province").unwrap().is_empty());
    }
}
