//! Dense linear algebra for small symmetric systems
//!
//! Regression models solve their normal equations through an eigenvalue
//! decomposition so that rank-deficient designs (constant or collinear
//! columns) still yield the minimum-norm least-squares solution.

use crate::StatsError;
use ndarray::{Array1, Array2, Axis};

/// Result of eigenvalue decomposition
#[derive(Debug, Clone)]
pub struct EigenDecomposition {
    /// Eigenvalues (sorted in descending order)
    pub eigenvalues: Array1<f64>,
    /// Eigenvectors (columns are eigenvectors)
    pub eigenvectors: Array2<f64>,
}

/// Cyclic Jacobi eigenvalue decomposition for symmetric matrices
///
/// Sweeps every off-diagonal pair until the off-diagonal Frobenius norm drops
/// below `tolerance` (relative to the matrix norm) or `max_sweeps` is reached.
///
/// # Arguments
/// * `matrix` - Symmetric matrix to decompose
/// * `max_sweeps` - Maximum number of full sweeps
/// * `tolerance` - Relative convergence tolerance for off-diagonal elements
pub fn symmetric_eigen(
    matrix: &Array2<f64>,
    max_sweeps: usize,
    tolerance: f64,
) -> Result<EigenDecomposition, StatsError> {
    let n = matrix.nrows();
    if n != matrix.ncols() {
        return Err(StatsError::DimensionMismatch {
            expected: n,
            actual: matrix.ncols(),
        });
    }

    let mut a = matrix.clone();
    let mut v = Array2::<f64>::eye(n);
    let scale = frobenius_norm(&a).max(f64::MIN_POSITIVE);

    for _sweep in 0..max_sweeps {
        if off_diagonal_norm(&a) <= tolerance * scale {
            break;
        }

        for p in 0..n {
            for q in (p + 1)..n {
                if a[[p, q]].abs() <= f64::EPSILON * scale {
                    continue;
                }
                let (cos_theta, sin_theta) = compute_rotation(a[[p, p]], a[[q, q]], a[[p, q]]);
                apply_jacobi_rotation(&mut a, &mut v, p, q, cos_theta, sin_theta);
            }
        }
    }

    // Sort eigenvalues and eigenvectors in descending order
    let diagonal: Vec<f64> = (0..n).map(|i| a[[i, i]]).collect();
    let mut indices: Vec<usize> = (0..n).collect();
    indices.sort_by(|&i, &j| diagonal[j].total_cmp(&diagonal[i]));

    let eigenvalues = indices.iter().map(|&i| diagonal[i]).collect();
    let mut eigenvectors = Array2::<f64>::zeros((n, n));
    for (new_idx, &old_idx) in indices.iter().enumerate() {
        eigenvectors.column_mut(new_idx).assign(&v.column(old_idx));
    }

    Ok(EigenDecomposition {
        eigenvalues,
        eigenvectors,
    })
}

/// Minimum-norm least-squares solution of `x · β ≈ y`.
///
/// Solves the normal equations `XᵀX β = Xᵀy` with a pseudo-inverse:
/// eigenvalues below `rcond` times the largest eigenvalue are treated as zero.
pub fn least_squares(x: &Array2<f64>, y: &Array1<f64>, rcond: f64) -> Result<Array1<f64>, StatsError> {
    if x.nrows() != y.len() {
        return Err(StatsError::DimensionMismatch {
            expected: x.nrows(),
            actual: y.len(),
        });
    }

    let gram = x.t().dot(x);
    let rhs = x.t().dot(y);
    let decomp = symmetric_eigen(&gram, 100, 1e-14)?;

    let largest = decomp
        .eigenvalues
        .iter()
        .copied()
        .fold(0.0_f64, f64::max);
    let cutoff = largest * rcond;

    // β = V Λ⁺ Vᵀ rhs
    let projected = decomp.eigenvectors.t().dot(&rhs);
    let scaled: Array1<f64> = projected
        .iter()
        .zip(decomp.eigenvalues.iter())
        .map(|(&p, &lambda)| if lambda > cutoff { p / lambda } else { 0.0 })
        .collect();

    Ok(decomp.eigenvectors.dot(&scaled))
}

fn frobenius_norm(matrix: &Array2<f64>) -> f64 {
    matrix.iter().map(|&v| v * v).sum::<f64>().sqrt()
}

fn off_diagonal_norm(matrix: &Array2<f64>) -> f64 {
    let n = matrix.nrows();
    let mut sum = 0.0;
    for i in 0..n {
        for j in 0..n {
            if i != j {
                sum += matrix[[i, j]].powi(2);
            }
        }
    }
    sum.sqrt()
}

/// Compute the rotation (cos, sin) for Jacobi rotation
fn compute_rotation(app: f64, aqq: f64, apq: f64) -> (f64, f64) {
    if apq.abs() < 1e-300 {
        return (1.0, 0.0);
    }

    let tau = (aqq - app) / (2.0 * apq);
    let t = if tau >= 0.0 {
        1.0 / (tau + (1.0 + tau * tau).sqrt())
    } else {
        -1.0 / (-tau + (1.0 + tau * tau).sqrt())
    };

    let cos_theta = 1.0 / (1.0 + t * t).sqrt();
    let sin_theta = t * cos_theta;

    (cos_theta, sin_theta)
}

/// Apply a Jacobi rotation to matrix A and eigenvector matrix V
fn apply_jacobi_rotation(
    a: &mut Array2<f64>,
    v: &mut Array2<f64>,
    p: usize,
    q: usize,
    cos_theta: f64,
    sin_theta: f64,
) {
    let n = a.nrows();

    let app = a[[p, p]];
    let aqq = a[[q, q]];
    let apq = a[[p, q]];

    a[[p, p]] = cos_theta * cos_theta * app - 2.0 * cos_theta * sin_theta * apq
        + sin_theta * sin_theta * aqq;
    a[[q, q]] = sin_theta * sin_theta * app
        + 2.0 * cos_theta * sin_theta * apq
        + cos_theta * cos_theta * aqq;
    a[[p, q]] = 0.0;
    a[[q, p]] = 0.0;

    for i in 0..n {
        if i != p && i != q {
            let aip = a[[i, p]];
            let aiq = a[[i, q]];

            a[[i, p]] = cos_theta * aip - sin_theta * aiq;
            a[[p, i]] = a[[i, p]];

            a[[i, q]] = sin_theta * aip + cos_theta * aiq;
            a[[q, i]] = a[[i, q]];
        }
    }

    for i in 0..n {
        let vip = v[[i, p]];
        let viq = v[[i, q]];

        v[[i, p]] = cos_theta * vip - sin_theta * viq;
        v[[i, q]] = sin_theta * vip + cos_theta * viq;
    }
}

/// Column means of a matrix, zero for an empty matrix.
pub fn column_means(x: &Array2<f64>) -> Array1<f64> {
    x.mean_axis(Axis(0))
        .unwrap_or_else(|| Array1::zeros(x.ncols()))
}
