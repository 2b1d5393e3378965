//! Error types for hypothesis tests.

use claimlens_data::DataError;
use polars::prelude::PolarsError;
use thiserror::Error;

/// Result type for hypothesis tests.
pub type Result<T> = std::result::Result<T, HypothesisError>;

/// Errors that prevent a hypothesis test from running at all.
///
/// Too few observations for a particular statistic is not an error; it is
/// reported as [`crate::SubTest::Insufficient`].
#[derive(Debug, Error)]
pub enum HypothesisError {
    /// No rows qualify for the test
    #[error("No data: {0}")]
    NoData(String),

    /// Dataset validation failed
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    /// Parameter outside its valid range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
