//! CART regression tree with squared-error splits.

use crate::error::{ModelError, Result};
use crate::model::{Regressor, check_training_set, check_width};
use ndarray::{Array1, Array2, ArrayView1};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Decision tree configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Maximum depth of the tree (default: 10)
    pub max_depth: usize,
    /// Minimum samples required to split a node (default: 5)
    pub min_samples_split: usize,
    /// Minimum samples in each child (default: 1)
    pub min_samples_leaf: usize,
    /// Features considered per split; all when `None` (default: None)
    pub max_features: Option<usize>,
    /// Seed for the feature visiting order (default: 42)
    pub seed: u64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 10,
            min_samples_split: 5,
            min_samples_leaf: 1,
            max_features: None,
            seed: 42,
        }
    }
}

impl TreeConfig {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(ModelError::InvalidParameter(
                "max_depth must be at least 1".to_string(),
            ));
        }
        if self.min_samples_split < 2 {
            return Err(ModelError::InvalidParameter(format!(
                "min_samples_split must be at least 2, got {}",
                self.min_samples_split
            )));
        }
        if self.min_samples_leaf == 0 {
            return Err(ModelError::InvalidParameter(
                "min_samples_leaf must be at least 1".to_string(),
            ));
        }
        if self.max_features == Some(0) {
            return Err(ModelError::InvalidParameter(
                "max_features must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, Copy)]
struct Split {
    feature: usize,
    threshold: f64,
    gain: f64,
}

/// Regression tree (CART).
///
/// Splits minimize the summed squared error of the children; a node becomes a
/// leaf at `max_depth`, below `min_samples_split` samples, when it is pure, or
/// when no split reduces the error.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    config: TreeConfig,
    nodes: Vec<Node>,
    n_features: usize,
    importances: Option<Array1<f64>>,
}

impl DecisionTree {
    /// Create an unfitted tree.
    pub const fn new(config: TreeConfig) -> Self {
        Self {
            config,
            nodes: Vec::new(),
            n_features: 0,
            importances: None,
        }
    }

    /// Tree configuration.
    pub const fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Number of nodes in the fitted tree.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Depth of the fitted tree (0 for a single leaf).
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], idx: usize) -> usize {
            match nodes[idx] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, left).max(walk(nodes, right)),
            }
        }
        if self.nodes.is_empty() { 0 } else { walk(&self.nodes, 0) }
    }

    /// Unnormalized importances: summed squared-error reduction per feature.
    pub(crate) fn raw_importances(&self) -> Option<&Array1<f64>> {
        self.importances.as_ref()
    }

    fn predict_row(&self, row: ArrayView1<'_, f64>) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[feature] <= threshold { left } else { right };
                }
            }
        }
    }
}

impl Default for DecisionTree {
    fn default() -> Self {
        Self::new(TreeConfig::default())
    }
}

impl Regressor for DecisionTree {
    fn name(&self) -> &str {
        "Decision Tree"
    }

    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        check_training_set(x, y)?;
        self.config.validate()?;

        let mut builder = Builder {
            x,
            y,
            config: self.config,
            nodes: Vec::new(),
            gains: vec![0.0; x.ncols()],
            rng: StdRng::seed_from_u64(self.config.seed),
        };
        builder.build((0..x.nrows()).collect(), 0);

        self.nodes = builder.nodes;
        self.n_features = x.ncols();
        self.importances = Some(Array1::from(builder.gains));
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if self.nodes.is_empty() {
            return Err(ModelError::NotFitted(self.name().to_string()));
        }
        check_width(x, self.n_features)?;
        Ok(x.rows().into_iter().map(|row| self.predict_row(row)).collect())
    }

    fn feature_importances(&self) -> Option<Array1<f64>> {
        self.importances.as_ref().map(normalize)
    }
}

/// Scale to sum to one; all zeros stay zeros.
pub(crate) fn normalize(values: &Array1<f64>) -> Array1<f64> {
    let total = values.sum();
    if total > 0.0 {
        values / total
    } else {
        Array1::zeros(values.len())
    }
}

struct Builder<'a> {
    x: &'a Array2<f64>,
    y: &'a Array1<f64>,
    config: TreeConfig,
    nodes: Vec<Node>,
    gains: Vec<f64>,
    rng: StdRng,
}

impl Builder<'_> {
    /// Grow the subtree over `indices`, returning its root node index.
    fn build(&mut self, indices: Vec<usize>, depth: usize) -> usize {
        let n = indices.len() as f64;
        let mean = indices.iter().map(|&i| self.y[i]).sum::<f64>() / n;
        let sse: f64 = indices.iter().map(|&i| (self.y[i] - mean).powi(2)).sum();

        let idx = self.nodes.len();
        self.nodes.push(Node::Leaf { value: mean });

        if depth >= self.config.max_depth
            || indices.len() < self.config.min_samples_split
            || sse <= 0.0
        {
            return idx;
        }

        let Some(split) = self.best_split(&indices, mean, sse) else {
            return idx;
        };

        self.gains[split.feature] += split.gain;
        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| self.x[[i, split.feature]] <= split.threshold);

        let left = self.build(left_idx, depth + 1);
        let right = self.build(right_idx, depth + 1);
        self.nodes[idx] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        idx
    }

    fn best_split(&mut self, indices: &[usize], mean: f64, parent_sse: f64) -> Option<Split> {
        let n_features = self.x.ncols();
        let mut features: Vec<usize> = (0..n_features).collect();
        features.shuffle(&mut self.rng);
        if let Some(k) = self.config.max_features {
            features.truncate(k.min(n_features));
        }

        let n = indices.len();
        let min_leaf = self.config.min_samples_leaf;
        // centered targets keep the running sums well conditioned
        let total_sum: f64 = indices.iter().map(|&i| self.y[i] - mean).sum();
        let total_sq: f64 = indices.iter().map(|&i| (self.y[i] - mean).powi(2)).sum();

        let mut best: Option<Split> = None;
        let mut order = indices.to_vec();

        for &feature in &features {
            order.sort_by(|&a, &b| self.x[[a, feature]].total_cmp(&self.x[[b, feature]]));

            let mut left_sum = 0.0;
            let mut left_sq = 0.0;
            for pos in 0..n - 1 {
                let i = order[pos];
                let yc = self.y[i] - mean;
                left_sum += yc;
                left_sq += yc * yc;

                let n_left = pos + 1;
                let n_right = n - n_left;
                if n_left < min_leaf || n_right < min_leaf {
                    continue;
                }

                let value = self.x[[i, feature]];
                let next = self.x[[order[pos + 1], feature]];
                if next <= value {
                    continue;
                }

                let left_sse = left_sq - left_sum * left_sum / n_left as f64;
                let right_sum = total_sum - left_sum;
                let right_sse = (total_sq - left_sq) - right_sum * right_sum / n_right as f64;
                let gain = parent_sse - left_sse - right_sse;

                if gain > f64::EPSILON * parent_sse && best.is_none_or(|b| gain > b.gain) {
                    best = Some(Split {
                        feature,
                        threshold: value + (next - value) / 2.0,
                        gain,
                    });
                }
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_step_function() {
        let x = array![[1.0], [2.0], [3.0], [10.0], [11.0], [12.0]];
        let y = array![5.0, 5.0, 5.0, 20.0, 20.0, 20.0];

        let mut tree = DecisionTree::new(TreeConfig {
            min_samples_split: 2,
            ..TreeConfig::default()
        });
        tree.fit(&x, &y).unwrap();

        assert_eq!(tree.node_count(), 3);
        assert_eq!(tree.depth(), 1);
        let pred = tree.predict(&array![[0.0], [6.0], [7.0], [100.0]]).unwrap();
        assert_eq!(pred, array![5.0, 5.0, 20.0, 20.0]);
    }

    #[test]
    fn test_importance_on_informative_feature() {
        let x = array![
            [1.0, 7.0],
            [2.0, 3.0],
            [3.0, 9.0],
            [4.0, 1.0],
            [5.0, 5.0],
            [6.0, 2.0]
        ];
        let y = array![1.0, 1.0, 1.0, 9.0, 9.0, 9.0];

        let mut tree = DecisionTree::new(TreeConfig {
            min_samples_split: 2,
            ..TreeConfig::default()
        });
        tree.fit(&x, &y).unwrap();

        let importances = tree.feature_importances().unwrap();
        assert_abs_diff_eq!(importances[0], 1.0);
        assert_abs_diff_eq!(importances[1], 0.0);
    }

    #[test]
    fn test_min_samples_split_stops_growth() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![1.0, 2.0, 3.0, 4.0];

        // default min_samples_split = 5 > 4 rows
        let mut tree = DecisionTree::default();
        tree.fit(&x, &y).unwrap();
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.predict(&array![[9.0]]).unwrap()[0], 2.5);
    }

    #[test]
    fn test_max_depth_respected() {
        let x = Array2::from_shape_fn((64, 1), |(i, _)| i as f64);
        let y = Array1::from_shape_fn(64, |i| (i * i) as f64);

        let mut tree = DecisionTree::new(TreeConfig {
            max_depth: 3,
            min_samples_split: 2,
            ..TreeConfig::default()
        });
        tree.fit(&x, &y).unwrap();
        assert!(tree.depth() <= 3);
    }

    #[test]
    fn test_invalid_config() {
        let mut tree = DecisionTree::new(TreeConfig {
            min_samples_split: 1,
            ..TreeConfig::default()
        });
        assert!(matches!(
            tree.fit(&array![[1.0]], &array![1.0]),
            Err(ModelError::InvalidParameter(_))
        ));
    }
}
