//! Chi-squared test of independence for contingency tables.

use crate::{StatsError, TestStatistic, distribution_error};
use ndarray::{Array1, Array2};
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Result of a chi-squared test of independence.
#[derive(Debug, Clone)]
pub struct ChiSquaredTest {
    /// Statistic, p-value and degrees of freedom
    pub test: TestStatistic,
    /// Expected frequencies under independence
    pub expected: Array2<f64>,
}

/// Chi-squared test of independence on an `r x c` table of observed counts.
///
/// With one degree of freedom the Yates continuity correction is applied:
/// each observed count moves towards its expectation by at most 0.5.
///
/// # Errors
/// * [`StatsError::InsufficientData`] if the table has fewer than two rows or
///   columns (no degrees of freedom)
/// * [`StatsError::Degenerate`] if any expected frequency is zero
/// * [`StatsError::InvalidInput`] for negative or non-finite counts
pub fn chi2_contingency(observed: &Array2<f64>) -> Result<ChiSquaredTest, StatsError> {
    let (r, c) = observed.dim();
    if r < 2 || c < 2 {
        return Err(StatsError::InsufficientData {
            required: 2,
            actual: r.min(c),
        });
    }
    if observed.iter().any(|&v| v < 0.0 || !v.is_finite()) {
        return Err(StatsError::InvalidInput(
            "observed counts must be finite and non-negative".to_string(),
        ));
    }

    let row_sums: Array1<f64> = observed.sum_axis(ndarray::Axis(1));
    let col_sums: Array1<f64> = observed.sum_axis(ndarray::Axis(0));
    let total = observed.sum();

    let mut expected = Array2::<f64>::zeros((r, c));
    for i in 0..r {
        for j in 0..c {
            expected[[i, j]] = row_sums[i] * col_sums[j] / total;
        }
    }

    if expected.iter().any(|&e| e == 0.0 || !e.is_finite()) {
        return Err(StatsError::Degenerate(
            "expected frequency table has a zero element".to_string(),
        ));
    }

    let dof = ((r - 1) * (c - 1)) as f64;
    let yates = r == 2 && c == 2;

    let mut statistic = 0.0;
    for i in 0..r {
        for j in 0..c {
            let e = expected[[i, j]];
            let mut diff = observed[[i, j]] - e;
            if yates {
                diff = diff.signum() * (diff.abs() - 0.5).max(0.0);
            }
            statistic += diff * diff / e;
        }
    }

    let p_value = chi2_sf(statistic, dof)?;

    Ok(ChiSquaredTest {
        test: TestStatistic {
            statistic,
            p_value,
            degrees_of_freedom: Some(dof),
        },
        expected,
    })
}

/// Chi-squared upper tail probability.
pub(crate) fn chi2_sf(statistic: f64, dof: f64) -> Result<f64, StatsError> {
    let dist = ChiSquared::new(dof).map_err(distribution_error)?;
    Ok(dist.sf(statistic).clamp(0.0, 1.0))
}
