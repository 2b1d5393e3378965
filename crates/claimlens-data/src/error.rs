//! Error types for data operations.

use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while loading or validating the dataset.
#[derive(Debug, Error)]
pub enum DataError {
    /// No data file exists at the configured location
    #[error("Data file not found: {0}")]
    FileNotFound(String),

    /// Required columns are absent from the table
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// The table has no rows
    #[error("Dataset is empty: {0}")]
    EmptyDataset(String),

    /// Data parsing error
    #[error("Data parsing error: {0}")]
    Parse(String),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
