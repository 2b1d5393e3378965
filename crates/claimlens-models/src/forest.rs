//! Random forest of bootstrap-aggregated regression trees.

use crate::error::{ModelError, Result};
use crate::model::{Regressor, check_training_set, check_width};
use crate::tree::{DecisionTree, TreeConfig, normalize};
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Random forest configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForestConfig {
    /// Number of trees (default: 100)
    pub n_estimators: usize,
    /// Maximum depth of each tree (default: 10)
    pub max_depth: usize,
    /// Minimum samples required to split a node (default: 5)
    pub min_samples_split: usize,
    /// Features considered per split; all when `None` (default: None)
    pub max_features: Option<usize>,
    /// Base seed; tree `t` uses `seed + t` (default: 42)
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: 10,
            min_samples_split: 5,
            max_features: None,
            seed: 42,
        }
    }
}

/// Random forest regressor.
///
/// Each tree is fitted on a bootstrap sample drawn with its own seed, so the
/// result does not depend on how rayon schedules the trees.
#[derive(Debug, Clone)]
pub struct RandomForest {
    config: ForestConfig,
    trees: Vec<DecisionTree>,
    n_features: usize,
}

impl RandomForest {
    /// Create an unfitted forest.
    pub const fn new(config: ForestConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
            n_features: 0,
        }
    }

    /// Forest configuration.
    pub const fn config(&self) -> &ForestConfig {
        &self.config
    }

    /// Fitted trees.
    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    fn fit_tree(&self, x: &Array2<f64>, y: &Array1<f64>, t: usize) -> Result<DecisionTree> {
        let seed = self.config.seed.wrapping_add(t as u64);
        let mut rng = StdRng::seed_from_u64(seed);
        let n = x.nrows();
        let sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();

        let mut tree = DecisionTree::new(TreeConfig {
            max_depth: self.config.max_depth,
            min_samples_split: self.config.min_samples_split,
            min_samples_leaf: 1,
            max_features: self.config.max_features,
            seed,
        });
        tree.fit(&x.select(Axis(0), &sample), &y.select(Axis(0), &sample))?;
        Ok(tree)
    }
}

impl Default for RandomForest {
    fn default() -> Self {
        Self::new(ForestConfig::default())
    }
}

impl Regressor for RandomForest {
    fn name(&self) -> &str {
        "Random Forest"
    }

    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        check_training_set(x, y)?;
        if self.config.n_estimators == 0 {
            return Err(ModelError::InvalidParameter(
                "n_estimators must be at least 1".to_string(),
            ));
        }

        let trees = (0..self.config.n_estimators)
            .into_par_iter()
            .map(|t| self.fit_tree(x, y, t))
            .collect::<Result<Vec<_>>>()?;

        debug!(trees = trees.len(), rows = x.nrows(), "Fitted random forest");
        self.trees = trees;
        self.n_features = x.ncols();
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if self.trees.is_empty() {
            return Err(ModelError::NotFitted(self.name().to_string()));
        }
        check_width(x, self.n_features)?;

        let mut total = Array1::<f64>::zeros(x.nrows());
        for tree in &self.trees {
            total += &tree.predict(x)?;
        }
        Ok(total / self.trees.len() as f64)
    }

    /// Mean of the per-tree normalized importances over trees that split at
    /// least once, renormalized.
    fn feature_importances(&self) -> Option<Array1<f64>> {
        if self.trees.is_empty() {
            return None;
        }
        let per_tree: Vec<Array1<f64>> = self
            .trees
            .iter()
            .filter(|tree| tree.node_count() > 1)
            .filter_map(|tree| tree.raw_importances().map(normalize))
            .collect();

        if per_tree.is_empty() {
            return Some(Array1::zeros(self.n_features));
        }
        let mut mean = Array1::<f64>::zeros(self.n_features);
        for importances in &per_tree {
            mean += importances;
        }
        Some(normalize(&(mean / per_tree.len() as f64)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn data() -> (Array2<f64>, Array1<f64>) {
        let x = Array2::from_shape_fn((60, 2), |(i, j)| if j == 0 { i as f64 } else { ((i * 7) % 5) as f64 });
        let y = Array1::from_shape_fn(60, |i| if i < 30 { 10.0 } else { 50.0 });
        (x, y)
    }

    fn small_forest() -> RandomForest {
        RandomForest::new(ForestConfig {
            n_estimators: 10,
            ..ForestConfig::default()
        })
    }

    #[test]
    fn test_fits_step() {
        let (x, y) = data();
        let mut forest = small_forest();
        forest.fit(&x, &y).unwrap();

        assert_eq!(forest.trees().len(), 10);
        let pred = forest.predict(&array![[2.0, 0.0], [55.0, 0.0]]).unwrap();
        assert!(pred[0] < 20.0);
        assert!(pred[1] > 40.0);

        let importances = forest.feature_importances().unwrap();
        assert!(importances[0] > importances[1]);
    }

    #[test]
    fn test_seeded_forests_agree() {
        let (x, y) = data();
        let mut a = small_forest();
        let mut b = small_forest();
        a.fit(&x, &y).unwrap();
        b.fit(&x, &y).unwrap();
        assert_eq!(a.predict(&x).unwrap(), b.predict(&x).unwrap());
    }

    #[test]
    fn test_predict_before_fit() {
        assert!(matches!(
            RandomForest::default().predict(&array![[1.0, 2.0]]),
            Err(ModelError::NotFitted(_))
        ));
    }
}
