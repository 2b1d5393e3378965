//! Seeded train/test split.

use crate::error::{FeatureError, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Train/test split parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Fraction of rows held out for testing, in (0, 1) (default: 0.2)
    pub test_fraction: f64,
    /// Shuffle seed (default: 42)
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            seed: 42,
        }
    }
}

/// Row indices of the training and test partitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    /// Training rows
    pub train: Vec<usize>,
    /// Test rows
    pub test: Vec<usize>,
}

/// Shuffle `0..n` with a seeded RNG and hold out `ceil(test_fraction · n)`
/// rows for testing.
///
/// # Errors
/// [`FeatureError::InvalidParameter`] when the fraction is outside (0, 1) or
/// the training partition would be empty.
pub fn train_test_split(n: usize, config: &SplitConfig) -> Result<SplitIndices> {
    let fraction = config.test_fraction;
    if !(fraction > 0.0 && fraction < 1.0) {
        return Err(FeatureError::InvalidParameter(format!(
            "test_fraction must lie in (0, 1), got {fraction}"
        )));
    }

    let n_test = (fraction * n as f64).ceil() as usize;
    if n_test >= n {
        return Err(FeatureError::InvalidParameter(format!(
            "{n} rows leave no training data with test_fraction {fraction}"
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(config.seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(n_test);
    Ok(SplitIndices {
        train,
        test: indices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(100, 0.2, 80, 20)]
    #[case(10, 0.25, 7, 3)]
    #[case(3, 0.2, 2, 1)]
    fn test_partition_sizes(
        #[case] n: usize,
        #[case] fraction: f64,
        #[case] n_train: usize,
        #[case] n_test: usize,
    ) {
        let config = SplitConfig {
            test_fraction: fraction,
            seed: 42,
        };
        let split = train_test_split(n, &config).unwrap();
        assert_eq!(split.train.len(), n_train);
        assert_eq!(split.test.len(), n_test);

        let mut all: Vec<usize> = split.train.iter().chain(&split.test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..n).collect::<Vec<_>>());
    }

    #[test]
    fn test_same_seed_same_split() {
        let config = SplitConfig::default();
        assert_eq!(
            train_test_split(50, &config).unwrap(),
            train_test_split(50, &config).unwrap()
        );
    }

    #[rstest]
    #[case(0.0)]
    #[case(1.0)]
    #[case(-0.1)]
    fn test_invalid_fraction(#[case] fraction: f64) {
        let config = SplitConfig {
            test_fraction: fraction,
            seed: 1,
        };
        assert!(matches!(
            train_test_split(10, &config),
            Err(FeatureError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_single_row_has_no_training_data() {
        assert!(train_test_split(1, &SplitConfig::default()).is_err());
    }
}
