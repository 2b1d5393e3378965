//! Missing-value imputation.

use claimlens_stats::median;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fill value for categorical columns without any observed value.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Fill value chosen for one feature column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Imputation {
    /// Column median (0 when the column has no values)
    Numeric(f64),
    /// Most frequent label
    Categorical(String),
}

impl Imputation {
    /// Expression filling nulls in `column` with this value.
    ///
    /// Numeric columns are cast to `Float64`, categorical ones to `String`.
    pub fn fill_expr(&self, column: &str) -> Expr {
        match self {
            Self::Numeric(value) => col(column)
                .cast(DataType::Float64)
                .fill_null(lit(*value)),
            Self::Categorical(value) => col(column)
                .cast(DataType::String)
                .fill_null(lit(value.as_str())),
        }
    }
}

/// Median of the present values, or 0 when there are none.
pub fn median_fill(values: &[Option<f64>]) -> f64 {
    let present: Vec<f64> = values.iter().flatten().copied().filter(|v| v.is_finite()).collect();
    median(&present).unwrap_or(0.0)
}

/// Most frequent present value. Ties go to the lexicographically smallest
/// label; a column without values gets [`UNKNOWN_CATEGORY`].
pub fn mode_fill(values: &[Option<String>]) -> String {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values.iter().flatten() {
        *counts.entry(value.as_str()).or_insert(0) += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for (label, count) in counts {
        if best.is_none_or(|(_, n)| count > n) {
            best = Some((label, count));
        }
    }

    best.map_or_else(|| UNKNOWN_CATEGORY.to_string(), |(label, _)| label.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimlens_data::{f64_column, string_column};
    use rstest::rstest;

    #[rstest]
    #[case(&[Some(3.0), None, Some(1.0), Some(2.0)], 2.0)]
    #[case(&[Some(4.0), Some(1.0)], 2.5)]
    #[case(&[None, None], 0.0)]
    #[case(&[], 0.0)]
    fn test_median_fill(#[case] values: &[Option<f64>], #[case] expected: f64) {
        assert_eq!(median_fill(values), expected);
    }

    #[test]
    fn test_mode_fill_ties_pick_smallest() {
        let values = vec![
            Some("Sedan".to_string()),
            Some("Bus".to_string()),
            None,
            Some("Sedan".to_string()),
            Some("Bus".to_string()),
        ];
        assert_eq!(mode_fill(&values), "Bus");
    }

    #[test]
    fn test_mode_fill_majority_and_empty() {
        let values = vec![Some("B".to_string()), Some("A".to_string()), Some("B".to_string())];
        assert_eq!(mode_fill(&values), "B");
        assert_eq!(mode_fill(&[None, None]), UNKNOWN_CATEGORY);
    }

    #[test]
    fn test_fill_expr() {
        let df = DataFrame::new(vec![
            Column::new("Make".into(), &[Some("VW"), None]),
            Column::new("SumInsured".into(), &[None, Some(5i64)]),
        ])
        .unwrap();
        let out = df
            .lazy()
            .with_columns([
                Imputation::Categorical("Toyota".to_string()).fill_expr("Make"),
                Imputation::Numeric(1.5).fill_expr("SumInsured"),
            ])
            .collect()
            .unwrap();

        let make = string_column(&out, "Make").unwrap();
        assert_eq!(make, vec![Some("VW".to_string()), Some("Toyota".to_string())]);
        let sum = f64_column(&out, "SumInsured").unwrap();
        assert_eq!(sum, vec![Some(1.5), Some(5.0)]);
    }
}
