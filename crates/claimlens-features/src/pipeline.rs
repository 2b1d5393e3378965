//! Dataset preparation for the severity and premium models.

use crate::encoder::OneHotEncoder;
use crate::error::{FeatureError, Result};
use crate::impute::{Imputation, median_fill, mode_fill};
use crate::registry::{Dataset, features_for};
use crate::resolve::ColumnResolution;
use crate::scaler::StandardScaler;
use crate::split::{SplitConfig, train_test_split};
use claimlens_data::schema::{HAS_CLAIM, TOTAL_CLAIMS};
use claimlens_data::{f64_column, is_numeric_dtype, require_columns, string_column};
use ndarray::{Array1, Array2, Axis};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Train/test matrices with their targets and the fitted preprocessing.
#[derive(Debug, Clone)]
pub struct PreparedDataset {
    /// Scaled training features
    pub x_train: Array2<f64>,
    /// Scaled test features
    pub x_test: Array2<f64>,
    /// Training target
    pub y_train: Array1<f64>,
    /// Test target
    pub y_test: Array1<f64>,
    /// Column names of the feature matrices
    pub feature_names: Vec<String>,
    /// Fitted preprocessing steps
    pub preprocessor: FittedPreprocessor,
}

/// Resolution, imputation values, encoder and scaler fitted on a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedPreprocessor {
    resolution: ColumnResolution,
    imputations: Vec<Imputation>,
    encoder: OneHotEncoder,
    scaler: StandardScaler,
    feature_names: Vec<String>,
}

impl FittedPreprocessor {
    /// Transform new records into the fitted feature columns.
    ///
    /// # Errors
    /// * [`FeatureError::Data`] when a resolved source column is missing
    /// * [`FeatureError::DimensionMismatch`] if the encoded width differs from
    ///   the fitted width
    pub fn transform(&self, df: &DataFrame) -> Result<Array2<f64>> {
        let imputed = impute_features(df, &self.resolution, &self.imputations)?;
        let encoded = self.encoder.transform(&imputed)?;
        if encoded.width() != self.feature_names.len() {
            return Err(FeatureError::DimensionMismatch {
                expected: self.feature_names.len(),
                actual: encoded.width(),
            });
        }
        let x = frame_to_matrix(&encoded, &self.feature_names)?;
        self.scaler.transform(&x)
    }

    /// Fitted feature names.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Fitted column resolution.
    pub const fn resolution(&self) -> &ColumnResolution {
        &self.resolution
    }

    /// Fitted encoder.
    pub const fn encoder(&self) -> &OneHotEncoder {
        &self.encoder
    }

    /// Fitted scaler.
    pub const fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }
}

/// Prepare the claim severity dataset: claim records only, severity
/// allow-list.
///
/// # Errors
/// [`FeatureError::NoData`] when the table has no claim records.
pub fn prepare_severity_dataset(
    df: &DataFrame,
    target: &str,
    config: &SplitConfig,
) -> Result<PreparedDataset> {
    prepare_dataset(df, Dataset::Severity, target, config)
}

/// Prepare the premium dataset: rows with a missing or negative target are
/// dropped from both features and target; premium allow-list.
pub fn prepare_premium_dataset(
    df: &DataFrame,
    target: &str,
    config: &SplitConfig,
) -> Result<PreparedDataset> {
    prepare_dataset(df, Dataset::Premium, target, config)
}

/// Run the full preparation pipeline for `dataset`.
pub fn prepare_dataset(
    df: &DataFrame,
    dataset: Dataset,
    target: &str,
    config: &SplitConfig,
) -> Result<PreparedDataset> {
    if require_columns(df, &[target]).is_err() {
        return Err(FeatureError::MissingTarget(target.to_string()));
    }

    let value = col(target).cast(DataType::Float64);
    let in_range = match dataset {
        Dataset::Severity => value.clone().gt(lit(0.0)),
        Dataset::Premium => value.clone().gt_eq(lit(0.0)),
    };
    // NaN compares greater than every number
    let keep = in_range.and(value.is_not_nan());
    let filtered = df.clone().lazy().filter(keep).collect()?;

    if filtered.height() == 0 {
        return Err(FeatureError::NoData(match dataset {
            Dataset::Severity => "no policies with claims found in the dataset".to_string(),
            Dataset::Premium => format!("no rows with a non-negative {target}"),
        }));
    }
    let dropped = df.height() - filtered.height();
    if dataset == Dataset::Premium && dropped > 0 {
        warn!(dropped, target, "Dropped rows with missing, NaN or negative target");
    }
    debug!(rows = filtered.height(), ?dataset, "Filtered rows for target");

    let resolution = ColumnResolution::resolve(&filtered, &features_for(dataset))?;
    let (imputations, categorical) = fit_imputations(&filtered, &resolution)?;
    let imputed = impute_features(&filtered, &resolution, &imputations)?;

    let encoder = OneHotEncoder::fit(&imputed, &categorical)?;
    let encoded = encoder.transform(&imputed)?;
    let feature_names: Vec<String> = encoded
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    let x = frame_to_matrix(&encoded, &feature_names)?;
    let y: Array1<f64> = f64_column(&filtered, target)?
        .into_iter()
        .map(|v| v.unwrap_or(0.0))
        .collect();

    let split = train_test_split(x.nrows(), config)?;
    let x_train = x.select(Axis(0), &split.train);
    let x_test = x.select(Axis(0), &split.test);
    let y_train = y.select(Axis(0), &split.train);
    let y_test = y.select(Axis(0), &split.test);

    let scaler = StandardScaler::fit(&x_train)?;
    let x_train = scaler.transform(&x_train)?;
    let x_test = scaler.transform(&x_test)?;

    info!(
        ?dataset,
        rows = x.nrows(),
        features = feature_names.len(),
        train = x_train.nrows(),
        test = x_test.nrows(),
        "Prepared dataset"
    );

    Ok(PreparedDataset {
        x_train,
        x_test,
        y_train,
        y_test,
        feature_names: feature_names.clone(),
        preprocessor: FittedPreprocessor {
            resolution,
            imputations,
            encoder,
            scaler,
            feature_names,
        },
    })
}

/// Add a boolean `HasClaim` column flagging `TotalClaims > 0`.
pub fn create_has_claim_label(df: &DataFrame) -> Result<DataFrame> {
    require_columns(df, &[TOTAL_CLAIMS])?;
    Ok(df
        .clone()
        .lazy()
        .with_column(
            col(TOTAL_CLAIMS)
                .cast(DataType::Float64)
                .gt(lit(0.0))
                .fill_null(lit(false))
                .alias(HAS_CLAIM),
        )
        .collect()?)
}

/// Imputation value per resolved feature, and the categorical feature names.
fn fit_imputations(
    df: &DataFrame,
    resolution: &ColumnResolution,
) -> Result<(Vec<Imputation>, Vec<String>)> {
    let mut imputations = Vec::with_capacity(resolution.len());
    let mut categorical = Vec::new();

    for column in resolution.columns() {
        let dtype = df.column(&column.source)?.dtype().clone();
        if is_numeric_dtype(&dtype) {
            imputations.push(Imputation::Numeric(median_fill(&f64_column(df, &column.source)?)));
        } else {
            imputations.push(Imputation::Categorical(mode_fill(&string_column(df, &column.source)?)));
            categorical.push(column.feature.clone());
        }
    }

    Ok((imputations, categorical))
}

/// Select resolved columns under their canonical names with nulls filled.
fn impute_features(
    df: &DataFrame,
    resolution: &ColumnResolution,
    imputations: &[Imputation],
) -> Result<DataFrame> {
    let sources: Vec<&str> = resolution.columns().iter().map(|c| c.source.as_str()).collect();
    require_columns(df, &sources)?;

    let exprs: Vec<Expr> = resolution
        .columns()
        .iter()
        .zip(imputations)
        .map(|(column, imputation)| {
            imputation
                .fill_expr(&column.source)
                .alias(column.feature.as_str())
        })
        .collect();

    Ok(df.clone().lazy().select(exprs).collect()?)
}

fn frame_to_matrix(df: &DataFrame, columns: &[String]) -> Result<Array2<f64>> {
    let mut x = Array2::<f64>::zeros((df.height(), columns.len()));
    for (j, name) in columns.iter().enumerate() {
        for (i, value) in f64_column(df, name)?.into_iter().enumerate() {
            x[[i, j]] = value.unwrap_or(0.0);
        }
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_claim_label() {
        let df = DataFrame::new(vec![Column::new(
            TOTAL_CLAIMS.into(),
            &[Some(0.0), Some(12.0), None],
        )])
        .unwrap();
        let labelled = create_has_claim_label(&df).unwrap();

        let flags: Vec<Option<bool>> = labelled
            .column(HAS_CLAIM)
            .unwrap()
            .as_materialized_series()
            .bool()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(flags, vec![Some(false), Some(true), Some(false)]);
    }

    #[test]
    fn test_missing_target() {
        let df = DataFrame::new(vec![Column::new("Province".into(), &["A"])]).unwrap();
        assert!(matches!(
            prepare_severity_dataset(&df, TOTAL_CLAIMS, &SplitConfig::default()),
            Err(FeatureError::MissingTarget(_))
        ));
    }

    #[test]
    fn test_frame_to_matrix_orders_columns() {
        let df = DataFrame::new(vec![
            Column::new("a".into(), &[1.0, 2.0]),
            Column::new("b".into(), &[Some(3.0), None]),
        ])
        .unwrap();
        let x = frame_to_matrix(&df, &["b".to_string(), "a".to_string()]).unwrap();
        assert_eq!(x, ndarray::array![[3.0, 1.0], [0.0, 2.0]]);
    }
}
