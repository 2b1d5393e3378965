//! Model training and comparison.

use crate::error::Result;
use crate::forest::{ForestConfig, RandomForest};
use crate::linear::LinearRegression;
use crate::metrics::{TrainingMetrics, evaluate_model};
use crate::model::Regressor;
use crate::tree::{DecisionTree, TreeConfig};
use derive_more::Display;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::info;

#[cfg(feature = "gradient-boosting")]
use crate::boosting::{BoostingConfig, GradientBoosting};

/// Fit `model` and compute its training metrics.
fn fit_with_metrics<M: Regressor>(
    mut model: M,
    x_train: &Array2<f64>,
    y_train: &Array1<f64>,
) -> Result<(M, TrainingMetrics)> {
    model.fit(x_train, y_train)?;
    let predicted = model.predict(x_train)?;
    let metrics = TrainingMetrics::compute(y_train, &predicted);
    info!(
        model = model.name(),
        rmse = metrics.rmse,
        r2 = metrics.r2,
        "Trained model"
    );
    Ok((model, metrics))
}

/// Train an ordinary least squares model.
pub fn train_linear_regression(
    x_train: &Array2<f64>,
    y_train: &Array1<f64>,
) -> Result<(LinearRegression, TrainingMetrics)> {
    fit_with_metrics(LinearRegression::new(), x_train, y_train)
}

/// Train a decision tree.
pub fn train_decision_tree(
    x_train: &Array2<f64>,
    y_train: &Array1<f64>,
    config: TreeConfig,
) -> Result<(DecisionTree, TrainingMetrics)> {
    fit_with_metrics(DecisionTree::new(config), x_train, y_train)
}

/// Train a random forest.
pub fn train_random_forest(
    x_train: &Array2<f64>,
    y_train: &Array1<f64>,
    config: ForestConfig,
) -> Result<(RandomForest, TrainingMetrics)> {
    fit_with_metrics(RandomForest::new(config), x_train, y_train)
}

/// Train gradient-boosted trees.
#[cfg(feature = "gradient-boosting")]
pub fn train_gradient_boosting(
    x_train: &Array2<f64>,
    y_train: &Array1<f64>,
    config: BoostingConfig,
) -> Result<(GradientBoosting, TrainingMetrics)> {
    fit_with_metrics(GradientBoosting::new(config), x_train, y_train)
}

/// Train gradient-boosted trees.
///
/// # Errors
/// Always [`crate::ModelError::Unavailable`]: this build was compiled without
/// the `gradient-boosting` feature.
#[cfg(not(feature = "gradient-boosting"))]
pub fn train_gradient_boosting(
    _x_train: &Array2<f64>,
    _y_train: &Array1<f64>,
) -> Result<(Box<dyn Regressor>, TrainingMetrics)> {
    Err(crate::ModelError::Unavailable(
        "gradient boosting requires the `gradient-boosting` feature".to_string(),
    ))
}

/// Estimators available to [`train_model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum ModelKind {
    /// Ordinary least squares
    #[display("Linear Regression")]
    LinearRegression,
    /// CART decision tree
    #[display("Decision Tree")]
    DecisionTree,
    /// Random forest
    #[display("Random Forest")]
    RandomForest,
    /// Gradient-boosted trees
    #[display("Gradient Boosting")]
    GradientBoosting,
}

impl ModelKind {
    /// Every estimator, in training order.
    pub const fn all() -> [Self; 4] {
        [
            Self::LinearRegression,
            Self::DecisionTree,
            Self::RandomForest,
            Self::GradientBoosting,
        ]
    }

    /// Whether this build can train the estimator.
    pub const fn is_available(&self) -> bool {
        match self {
            Self::GradientBoosting => cfg!(feature = "gradient-boosting"),
            _ => true,
        }
    }
}

/// A fitted model with its name and training metrics.
#[derive(Debug)]
pub struct TrainedModel {
    /// Display name
    pub name: String,
    /// Fitted model
    pub model: Box<dyn Regressor>,
    /// Metrics on the training set
    pub train_metrics: TrainingMetrics,
}

impl TrainedModel {
    /// Wrap a fitted model.
    pub fn new(model: impl Regressor + 'static, train_metrics: TrainingMetrics) -> Self {
        Self {
            name: model.name().to_string(),
            model: Box::new(model),
            train_metrics,
        }
    }
}

/// Train one estimator with its default configuration and the given seed.
///
/// The seed drives feature sampling in the trees and bootstrap sampling in the
/// forest; linear regression ignores it.
pub fn train_model(
    kind: ModelKind,
    x_train: &Array2<f64>,
    y_train: &Array1<f64>,
    seed: u64,
) -> Result<TrainedModel> {
    match kind {
        ModelKind::LinearRegression => {
            let (model, metrics) = train_linear_regression(x_train, y_train)?;
            Ok(TrainedModel::new(model, metrics))
        }
        ModelKind::DecisionTree => {
            let config = TreeConfig {
                seed,
                ..TreeConfig::default()
            };
            let (model, metrics) = train_decision_tree(x_train, y_train, config)?;
            Ok(TrainedModel::new(model, metrics))
        }
        ModelKind::RandomForest => {
            let config = ForestConfig {
                seed,
                ..ForestConfig::default()
            };
            let (model, metrics) = train_random_forest(x_train, y_train, config)?;
            Ok(TrainedModel::new(model, metrics))
        }
        #[cfg(feature = "gradient-boosting")]
        ModelKind::GradientBoosting => {
            let config = BoostingConfig {
                seed,
                ..BoostingConfig::default()
            };
            let (model, metrics) = train_gradient_boosting(x_train, y_train, config)?;
            Ok(TrainedModel::new(model, metrics))
        }
        #[cfg(not(feature = "gradient-boosting"))]
        ModelKind::GradientBoosting => {
            let (model, metrics) = train_gradient_boosting(x_train, y_train)?;
            Ok(TrainedModel {
                name: kind.to_string(),
                model,
                train_metrics: metrics,
            })
        }
    }
}

/// One row of a model comparison table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelComparison {
    /// Model name
    #[serde(rename = "Model")]
    pub model: String,
    /// Training RMSE
    #[serde(rename = "Train_RMSE")]
    pub train_rmse: f64,
    /// Training R²
    #[serde(rename = "Train_R2")]
    pub train_r2: f64,
    /// Test RMSE
    #[serde(rename = "Test_RMSE")]
    pub test_rmse: f64,
    /// Test R²
    #[serde(rename = "Test_R2")]
    pub test_r2: f64,
    /// Test MAE
    #[serde(rename = "Test_MAE")]
    pub test_mae: f64,
    /// Test MAPE, in percent
    #[serde(rename = "Test_MAPE")]
    pub test_mape: f64,
}

/// Evaluate each trained model on the test set, in the given order.
pub fn compare_models(
    models: &[TrainedModel],
    x_test: &Array2<f64>,
    y_test: &Array1<f64>,
) -> Result<Vec<ModelComparison>> {
    models
        .iter()
        .map(|trained| {
            let test = evaluate_model(trained.model.as_ref(), x_test, y_test)?;
            Ok(ModelComparison {
                model: trained.name.clone(),
                train_rmse: trained.train_metrics.rmse,
                train_r2: trained.train_metrics.r2,
                test_rmse: test.rmse,
                test_r2: test.r2,
                test_mae: test.mae,
                test_mape: test.mape,
            })
        })
        .collect()
}
