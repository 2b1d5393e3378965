//! Error types for model training and interpretation.

use claimlens_stats::StatsError;
use thiserror::Error;

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors that can occur while fitting or applying a model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// `predict` was called before `fit`
    #[error("Model {0} has not been fitted")]
    NotFitted(String),

    /// Input shape does not match the training data
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension
        actual: usize,
    },

    /// No training rows
    #[error("Training set is empty")]
    EmptyTrainingSet,

    /// No evaluation rows
    #[error("Evaluation set is empty")]
    EmptyEvaluationSet,

    /// Model is not compiled into this build
    #[error("Model unavailable: {0}")]
    Unavailable(String),

    /// Invalid hyperparameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Linear algebra failure
    #[error("Linear algebra error: {0}")]
    Linalg(#[from] StatsError),
}

/// Errors that can occur while explaining a model.
#[derive(Debug, Error)]
pub enum InterpretError {
    /// The model exposes neither importances nor coefficients
    #[error("Model {0} does not expose feature importances or coefficients")]
    Unsupported(String),

    /// The requested explainer is not available in this build
    #[error("Explainer unavailable: {0}")]
    Unavailable(String),

    /// Feature name count does not match the model
    #[error("Dimension mismatch: expected {expected} feature names, got {actual}")]
    DimensionMismatch {
        /// Number of model features
        expected: usize,
        /// Number of names supplied
        actual: usize,
    },
}
