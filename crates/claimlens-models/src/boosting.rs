//! Gradient-boosted regression trees with squared loss.

use crate::error::{ModelError, Result};
use crate::model::{Regressor, check_training_set, check_width};
use crate::tree::{DecisionTree, TreeConfig, normalize};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Gradient boosting configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoostingConfig {
    /// Boosting rounds (default: 100)
    pub n_estimators: usize,
    /// Depth of each tree (default: 6)
    pub max_depth: usize,
    /// Shrinkage applied to each tree (default: 0.1)
    pub learning_rate: f64,
    /// Base seed; round `t` uses `seed + t` (default: 42)
    pub seed: u64,
}

impl Default for BoostingConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: 6,
            learning_rate: 0.1,
            seed: 42,
        }
    }
}

/// Gradient boosting regressor.
///
/// Starts from the target mean and fits each tree to the current residuals.
#[derive(Debug, Clone)]
pub struct GradientBoosting {
    config: BoostingConfig,
    base: f64,
    trees: Vec<DecisionTree>,
    n_features: usize,
}

impl GradientBoosting {
    /// Create an unfitted model.
    pub const fn new(config: BoostingConfig) -> Self {
        Self {
            config,
            base: 0.0,
            trees: Vec::new(),
            n_features: 0,
        }
    }

    /// Boosting configuration.
    pub const fn config(&self) -> &BoostingConfig {
        &self.config
    }
}

impl Default for GradientBoosting {
    fn default() -> Self {
        Self::new(BoostingConfig::default())
    }
}

impl Regressor for GradientBoosting {
    fn name(&self) -> &str {
        "Gradient Boosting"
    }

    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        check_training_set(x, y)?;
        if self.config.n_estimators == 0 {
            return Err(ModelError::InvalidParameter(
                "n_estimators must be at least 1".to_string(),
            ));
        }
        if !(self.config.learning_rate > 0.0 && self.config.learning_rate <= 1.0) {
            return Err(ModelError::InvalidParameter(format!(
                "learning_rate must lie in (0, 1], got {}",
                self.config.learning_rate
            )));
        }

        let base = y.mean().unwrap_or(0.0);
        let mut prediction = Array1::from_elem(y.len(), base);
        let mut trees = Vec::with_capacity(self.config.n_estimators);

        for t in 0..self.config.n_estimators {
            let residuals = y - &prediction;
            let mut tree = DecisionTree::new(TreeConfig {
                max_depth: self.config.max_depth,
                min_samples_split: 2,
                min_samples_leaf: 1,
                max_features: None,
                seed: self.config.seed.wrapping_add(t as u64),
            });
            tree.fit(x, &residuals)?;
            prediction = prediction + tree.predict(x)? * self.config.learning_rate;
            trees.push(tree);
        }

        debug!(rounds = trees.len(), rows = x.nrows(), "Fitted gradient boosting");
        self.base = base;
        self.trees = trees;
        self.n_features = x.ncols();
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if self.trees.is_empty() {
            return Err(ModelError::NotFitted(self.name().to_string()));
        }
        check_width(x, self.n_features)?;

        let mut prediction = Array1::from_elem(x.nrows(), self.base);
        for tree in &self.trees {
            prediction = prediction + tree.predict(x)? * self.config.learning_rate;
        }
        Ok(prediction)
    }

    fn feature_importances(&self) -> Option<Array1<f64>> {
        if self.trees.is_empty() {
            return None;
        }
        let mut total = Array1::<f64>::zeros(self.n_features);
        for importances in self.trees.iter().filter_map(DecisionTree::raw_importances) {
            total += importances;
        }
        Some(normalize(&total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_converges_on_step() {
        let x = Array2::from_shape_fn((20, 1), |(i, _)| i as f64);
        let y = Array1::from_shape_fn(20, |i| if i < 10 { 0.0 } else { 100.0 });

        let mut model = GradientBoosting::default();
        model.fit(&x, &y).unwrap();

        // residual shrinks by (1 - 0.1) per round
        let pred = model.predict(&array![[0.0], [19.0]]).unwrap();
        assert_abs_diff_eq!(pred[0], 0.0, epsilon = 0.01);
        assert_abs_diff_eq!(pred[1], 100.0, epsilon = 0.01);
    }

    #[test]
    fn test_invalid_learning_rate() {
        let mut model = GradientBoosting::new(BoostingConfig {
            learning_rate: 0.0,
            ..BoostingConfig::default()
        });
        assert!(matches!(
            model.fit(&array![[1.0], [2.0]], &array![1.0, 2.0]),
            Err(ModelError::InvalidParameter(_))
        ));
    }
}
