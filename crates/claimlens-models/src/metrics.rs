//! Regression metrics.

use crate::error::{ModelError, Result};
use crate::model::Regressor;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Offset added to actual values in MAPE to avoid division by zero.
pub const MAPE_EPSILON: f64 = 1e-8;

/// Fit quality on the training set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    /// Root mean squared error
    pub rmse: f64,
    /// Coefficient of determination
    pub r2: f64,
    /// Mean absolute error
    pub mae: f64,
}

impl TrainingMetrics {
    /// Compute from actual and predicted values.
    pub fn compute(actual: &Array1<f64>, predicted: &Array1<f64>) -> Self {
        Self {
            rmse: rmse(actual, predicted),
            r2: r2_score(actual, predicted),
            mae: mae(actual, predicted),
        }
    }
}

/// Performance on held-out data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    /// Root mean squared error
    pub rmse: f64,
    /// Coefficient of determination
    pub r2: f64,
    /// Mean absolute error
    pub mae: f64,
    /// Mean absolute percentage error, in percent
    pub mape: f64,
    /// Mean of the actual values
    pub mean_actual: f64,
    /// Mean of the predictions
    pub mean_predicted: f64,
}

/// Root mean squared error.
pub fn rmse(actual: &Array1<f64>, predicted: &Array1<f64>) -> f64 {
    let n = actual.len() as f64;
    let sse: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    (sse / n).sqrt()
}

/// Mean absolute error.
pub fn mae(actual: &Array1<f64>, predicted: &Array1<f64>) -> f64 {
    let n = actual.len() as f64;
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / n
}

/// Coefficient of determination.
///
/// For a constant target the score is 1.0 when the prediction is perfect and
/// 0.0 otherwise.
pub fn r2_score(actual: &Array1<f64>, predicted: &Array1<f64>) -> f64 {
    let mean = actual.mean().unwrap_or(0.0);
    let ss_res: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();

    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

/// Mean absolute percentage error, `mean(|y - ŷ| / (y + 1e-8)) · 100`.
pub fn mape(actual: &Array1<f64>, predicted: &Array1<f64>) -> f64 {
    let n = actual.len() as f64;
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| ((a - p) / (a + MAPE_EPSILON)).abs())
        .sum::<f64>()
        / n
        * 100.0
}

/// Score a fitted model on held-out data.
pub fn evaluate_model(
    model: &dyn Regressor,
    x_test: &Array2<f64>,
    y_test: &Array1<f64>,
) -> Result<EvaluationMetrics> {
    if y_test.is_empty() {
        return Err(ModelError::EmptyEvaluationSet);
    }
    if x_test.nrows() != y_test.len() {
        return Err(ModelError::DimensionMismatch {
            expected: x_test.nrows(),
            actual: y_test.len(),
        });
    }

    let predicted = model.predict(x_test)?;

    Ok(EvaluationMetrics {
        rmse: rmse(y_test, &predicted),
        r2: r2_score(y_test, &predicted),
        mae: mae(y_test, &predicted),
        mape: mape(y_test, &predicted),
        mean_actual: y_test.mean().unwrap_or(0.0),
        mean_predicted: predicted.mean().unwrap_or(0.0),
    })
}
