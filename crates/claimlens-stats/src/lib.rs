#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/claimlens/claimlens/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod anova;
pub mod contingency;
pub mod descriptive;
pub mod linalg;
pub mod two_sample;

pub use anova::{kruskal_wallis, one_way_anova};
pub use contingency::{ChiSquaredTest, chi2_contingency};
pub use descriptive::{mean, median, rank_with_ties, variance};
pub use linalg::{EigenDecomposition, column_means, least_squares, symmetric_eigen};
pub use two_sample::{mann_whitney_u, student_t_test};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while computing a statistic
#[derive(Debug, Error)]
pub enum StatsError {
    /// Not enough observations or groups
    #[error("Insufficient data: need at least {required}, got {actual}")]
    InsufficientData {
        /// Required number of observations or groups
        required: usize,
        /// Actual number supplied
        actual: usize,
    },

    /// The statistic is undefined for this data (e.g. zero variance)
    #[error("Degenerate input: {0}")]
    Degenerate(String),

    /// Reference distribution could not be constructed
    #[error("Distribution error: {0}")]
    Distribution(String),

    /// Dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension
        actual: usize,
    },

    /// Invalid input values
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Outcome of a hypothesis test: statistic, p-value and degrees of freedom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestStatistic {
    /// Test statistic (χ², F, H, t or U)
    pub statistic: f64,
    /// Two-sided p-value
    pub p_value: f64,
    /// Degrees of freedom of the reference distribution, if any
    pub degrees_of_freedom: Option<f64>,
}

impl TestStatistic {
    /// Whether the null hypothesis is rejected at level `alpha` (`p < alpha`).
    pub fn rejects(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

fn distribution_error(err: impl std::fmt::Display) -> StatsError {
    StatsError::Distribution(err.to_string())
}
