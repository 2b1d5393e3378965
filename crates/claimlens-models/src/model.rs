//! The regressor interface shared by every model.

use crate::error::{ModelError, Result};
use ndarray::{Array1, Array2};
use std::fmt::Debug;

/// A regression model mapping feature rows to a continuous target.
pub trait Regressor: Debug + Send + Sync {
    /// Model name used in reports
    fn name(&self) -> &str;

    /// Fit the model to training data
    ///
    /// # Arguments
    /// * `x` - Feature matrix, one row per observation
    /// * `y` - Target values, one per row of `x`
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()>;

    /// Predict the target for each row of `x`
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>>;

    /// Impurity-based feature importances (normalized to sum to 1), for
    /// tree models
    fn feature_importances(&self) -> Option<Array1<f64>> {
        None
    }

    /// Fitted coefficients, for linear models
    fn coefficients(&self) -> Option<Array1<f64>> {
        None
    }
}

/// Check a training set before fitting.
pub(crate) fn check_training_set(x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
    if x.nrows() == 0 {
        return Err(ModelError::EmptyTrainingSet);
    }
    if x.nrows() != y.len() {
        return Err(ModelError::DimensionMismatch {
            expected: x.nrows(),
            actual: y.len(),
        });
    }
    Ok(())
}

/// Check that `x` has the fitted number of features.
pub(crate) fn check_width(x: &Array2<f64>, n_features: usize) -> Result<()> {
    if x.ncols() == n_features {
        Ok(())
    } else {
        Err(ModelError::DimensionMismatch {
            expected: n_features,
            actual: x.ncols(),
        })
    }
}
