//! Zero-mean, unit-variance feature scaling.

use crate::error::{FeatureError, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Per-column standardization fitted on a training matrix.
///
/// Uses the population standard deviation; constant columns get a scale of 1
/// so they map to zero instead of NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl StandardScaler {
    /// Fit column means and scales.
    ///
    /// # Errors
    /// [`FeatureError::NoData`] for a matrix without rows.
    pub fn fit(x: &Array2<f64>) -> Result<Self> {
        if x.nrows() == 0 {
            return Err(FeatureError::NoData(
                "cannot fit a scaler on zero rows".to_string(),
            ));
        }

        let means: Array1<f64> = x
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(x.ncols()));
        let scales: Vec<f64> = x
            .std_axis(Axis(0), 0.0)
            .iter()
            .map(|&s| if s > 0.0 && s.is_finite() { s } else { 1.0 })
            .collect();

        Ok(Self {
            means: means.to_vec(),
            scales,
        })
    }

    /// Apply the fitted standardization.
    ///
    /// # Errors
    /// [`FeatureError::DimensionMismatch`] when the column count differs from
    /// the fitted matrix.
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        if x.ncols() != self.means.len() {
            return Err(FeatureError::DimensionMismatch {
                expected: self.means.len(),
                actual: x.ncols(),
            });
        }

        let mut out = x.clone();
        for (j, mut column) in out.axis_iter_mut(Axis(1)).enumerate() {
            let (mean, scale) = (self.means[j], self.scales[j]);
            column.mapv_inplace(|v| (v - mean) / scale);
        }
        Ok(out)
    }

    /// Fitted column means.
    pub fn means(&self) -> &[f64] {
        &self.means
    }

    /// Fitted column scales.
    pub fn scales(&self) -> &[f64] {
        &self.scales
    }
}
