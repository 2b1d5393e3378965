//! Ordinary least squares with intercept.

use crate::error::{ModelError, Result};
use crate::model::{Regressor, check_training_set, check_width};
use claimlens_stats::{column_means, least_squares};
use ndarray::{Array1, Array2, Axis};

/// Relative eigenvalue cutoff for the pseudo-inverse.
const RCOND: f64 = 1e-12;

/// Linear regression fitted by ordinary least squares.
///
/// The intercept is recovered from centered data, and the slope uses the
/// minimum-norm solution so constant or collinear columns do not fail the fit.
#[derive(Debug, Clone, Default)]
pub struct LinearRegression {
    coefficients: Option<Array1<f64>>,
    intercept: f64,
}

impl LinearRegression {
    /// Create an unfitted model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fitted intercept (0 before fitting).
    pub const fn intercept(&self) -> f64 {
        self.intercept
    }
}

impl Regressor for LinearRegression {
    fn name(&self) -> &str {
        "Linear Regression"
    }

    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        check_training_set(x, y)?;

        let x_mean = column_means(x);
        let y_mean = y.mean().unwrap_or(0.0);
        let x_centered = x - &x_mean.view().insert_axis(Axis(0));
        let y_centered = y - y_mean;

        let beta = least_squares(&x_centered, &y_centered, RCOND)?;
        self.intercept = y_mean - x_mean.dot(&beta);
        self.coefficients = Some(beta);
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let beta = self
            .coefficients
            .as_ref()
            .ok_or_else(|| ModelError::NotFitted(self.name().to_string()))?;
        check_width(x, beta.len())?;
        Ok(x.dot(beta) + self.intercept)
    }

    fn coefficients(&self) -> Option<Array1<f64>> {
        self.coefficients.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_recovers_plane() {
        // y = 3 + 2a - b
        let x = array![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [2.0, 3.0], [4.0, 1.0]];
        let y = x.map_axis(Axis(1), |row| 3.0 + 2.0 * row[0] - row[1]);

        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();

        let beta = model.coefficients().unwrap();
        assert_abs_diff_eq!(beta[0], 2.0, epsilon = 1e-8);
        assert_abs_diff_eq!(beta[1], -1.0, epsilon = 1e-8);
        assert_abs_diff_eq!(model.intercept(), 3.0, epsilon = 1e-8);

        let pred = model.predict(&array![[1.0, 1.0]]).unwrap();
        assert_abs_diff_eq!(pred[0], 4.0, epsilon = 1e-8);
    }

    #[test]
    fn test_constant_column_fits() {
        let x = array![[1.0, 5.0], [2.0, 5.0], [3.0, 5.0]];
        let y = array![2.0, 4.0, 6.0];

        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();

        let beta = model.coefficients().unwrap();
        assert_abs_diff_eq!(beta[0], 2.0, epsilon = 1e-8);
        assert_abs_diff_eq!(beta[1], 0.0, epsilon = 1e-8);
    }

    #[test]
    fn test_predict_before_fit() {
        let model = LinearRegression::new();
        assert!(matches!(
            model.predict(&array![[1.0]]),
            Err(ModelError::NotFitted(_))
        ));
    }

    #[test]
    fn test_width_checked() {
        let mut model = LinearRegression::new();
        model.fit(&array![[1.0], [2.0]], &array![1.0, 2.0]).unwrap();
        assert!(matches!(
            model.predict(&array![[1.0, 2.0]]),
            Err(ModelError::DimensionMismatch { .. })
        ));
    }
}
