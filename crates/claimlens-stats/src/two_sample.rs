//! Two-sample location tests.

use crate::descriptive::{mean, rank_with_ties, tie_term, variance};
use crate::{StatsError, TestStatistic, distribution_error};
use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

/// Largest sample size for which the exact Mann-Whitney distribution is used
/// (when the data has no ties).
const MWU_EXACT_MAX: usize = 8;

fn check_samples(x: &[f64], y: &[f64], required: usize) -> Result<(), StatsError> {
    let smallest = x.len().min(y.len());
    if smallest < required {
        return Err(StatsError::InsufficientData {
            required,
            actual: smallest,
        });
    }
    if x.iter().chain(y).any(|v| !v.is_finite()) {
        return Err(StatsError::InvalidInput(
            "observations must be finite".to_string(),
        ));
    }
    Ok(())
}

/// Student's two-sample t-test assuming equal variances (two-sided).
///
/// # Errors
/// [`StatsError::Degenerate`] when either sample has zero variance or the t
/// statistic is not finite. Callers fall back to [`mann_whitney_u`].
pub fn student_t_test(x: &[f64], y: &[f64]) -> Result<TestStatistic, StatsError> {
    check_samples(x, y, 2)?;

    let (n1, n2) = (x.len() as f64, y.len() as f64);
    let (v1, v2) = match (variance(x, 1), variance(y, 1)) {
        (Some(v1), Some(v2)) if v1 > 0.0 && v2 > 0.0 => (v1, v2),
        _ => {
            return Err(StatsError::Degenerate(
                "a sample has zero variance".to_string(),
            ));
        }
    };

    let dof = n1 + n2 - 2.0;
    let pooled = ((n1 - 1.0) * v1 + (n2 - 1.0) * v2) / dof;
    let se = (pooled * (1.0 / n1 + 1.0 / n2)).sqrt();
    let diff = mean(x).unwrap_or(0.0) - mean(y).unwrap_or(0.0);
    let t = diff / se;

    if !t.is_finite() {
        return Err(StatsError::Degenerate(format!("t statistic is {t}")));
    }

    let dist = StudentsT::new(0.0, 1.0, dof).map_err(distribution_error)?;
    let p_value = (2.0 * dist.sf(t.abs())).clamp(0.0, 1.0);

    Ok(TestStatistic {
        statistic: t,
        p_value,
        degrees_of_freedom: Some(dof),
    })
}

/// Mann-Whitney U test (two-sided).
///
/// The statistic is U for the first sample. The p-value uses the exact null
/// distribution when the smaller sample has at most eight observations and
/// there are no ties; otherwise the normal approximation with tie and
/// continuity corrections.
///
/// # Errors
/// [`StatsError::Degenerate`] when every observation is identical.
pub fn mann_whitney_u(x: &[f64], y: &[f64]) -> Result<TestStatistic, StatsError> {
    check_samples(x, y, 1)?;

    let (n1, n2) = (x.len(), y.len());
    let pooled: Vec<f64> = x.iter().chain(y).copied().collect();
    let (ranks, ties) = rank_with_ties(&pooled);

    let r1: f64 = ranks[..n1].iter().sum();
    let u1 = r1 - (n1 * (n1 + 1)) as f64 / 2.0;
    let u2 = (n1 * n2) as f64 - u1;
    let u = u1.max(u2);

    let p_value = if ties.is_empty() && n1.min(n2) <= MWU_EXACT_MAX {
        2.0 * exact_upper_tail(u.round() as usize, n1, n2)
    } else {
        let n = (n1 + n2) as f64;
        let (n1f, n2f) = (n1 as f64, n2 as f64);
        let mu = n1f * n2f / 2.0;
        let sigma = (n1f * n2f / 12.0 * ((n + 1.0) - tie_term(&ties) / (n * (n - 1.0)))).sqrt();

        if sigma <= 0.0 || !sigma.is_finite() {
            return Err(StatsError::Degenerate(
                "all observations are identical".to_string(),
            ));
        }

        let z = (u - mu - 0.5) / sigma;
        let normal = Normal::new(0.0, 1.0).map_err(distribution_error)?;
        2.0 * normal.sf(z)
    };

    Ok(TestStatistic {
        statistic: u1,
        p_value: p_value.clamp(0.0, 1.0),
        degrees_of_freedom: None,
    })
}

/// `P(U >= u)` under the null for sample sizes `n1`, `n2`.
///
/// Frequencies of U are the coefficients of the Gaussian binomial
/// coefficient `[n1 + n2 choose m]_q`, built as a product of
/// `(1 - q^(n+i)) / (1 - q^i)` for `i = 1..=m`.
fn exact_upper_tail(u: usize, n1: usize, n2: usize) -> f64 {
    let (m, n) = (n1.min(n2), n1.max(n2));
    let degree = m * n;
    if u > degree {
        return 0.0;
    }

    let mut coeffs = vec![0.0_f64; degree + 1];
    coeffs[0] = 1.0;

    for i in 1..=m {
        // multiply by (1 - q^(n+i)), truncated at the final degree
        let shift = n + i;
        for d in (shift..=degree).rev() {
            coeffs[d] -= coeffs[d - shift];
        }
        // divide by (1 - q^i)
        for d in i..=degree {
            coeffs[d] += coeffs[d - i];
        }
    }

    let total: f64 = coeffs.iter().sum();
    coeffs[u..].iter().sum::<f64>() / total
}
