//! Error types for feature preparation.

use claimlens_data::DataError;
use polars::prelude::PolarsError;
use thiserror::Error;

/// Result type for feature preparation.
pub type Result<T> = std::result::Result<T, FeatureError>;

/// Errors that can occur while preparing features.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// No rows remain after filtering
    #[error("No data: {0}")]
    NoData(String),

    /// The target column is absent
    #[error("Target column not found: {0}")]
    MissingTarget(String),

    /// None of the requested features could be resolved to a column
    #[error("No feature columns could be resolved: {0}")]
    NoFeatures(String),

    /// Parameter outside its valid range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Matrix shape does not match the fitted preprocessor
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected number of columns
        expected: usize,
        /// Actual number of columns
        actual: usize,
    },

    /// Dataset validation failed
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}
