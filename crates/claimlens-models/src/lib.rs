#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/claimlens/claimlens/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

#[cfg(feature = "gradient-boosting")]
pub mod boosting;
pub mod error;
pub mod forest;
pub mod interpret;
pub mod linear;
pub mod metrics;
pub mod model;
pub mod trainer;
pub mod tree;

#[cfg(feature = "gradient-boosting")]
pub use boosting::{BoostingConfig, GradientBoosting};
pub use error::{InterpretError, ModelError, Result};
pub use forest::{ForestConfig, RandomForest};
pub use interpret::{Explainer, FeatureImportance, feature_importance};
pub use linear::LinearRegression;
pub use metrics::{EvaluationMetrics, TrainingMetrics, evaluate_model, mae, mape, r2_score, rmse};
pub use model::Regressor;
pub use trainer::{
    ModelComparison, ModelKind, TrainedModel, compare_models, train_decision_tree,
    train_gradient_boosting, train_linear_regression, train_model, train_random_forest,
};
pub use tree::{DecisionTree, TreeConfig};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
