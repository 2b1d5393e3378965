//! Feature importance and model explanation.

use crate::error::InterpretError;
use crate::model::Regressor;
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Importance of a single feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    /// Feature name
    #[serde(rename = "Feature")]
    pub feature: String,
    /// Importance score
    #[serde(rename = "Importance")]
    pub importance: f64,
}

/// Rank features by importance, highest first.
///
/// Tree models report impurity-based importances; linear models report the
/// absolute value of each coefficient.
///
/// # Errors
/// * [`InterpretError::Unsupported`] if the model exposes neither
/// * [`InterpretError::DimensionMismatch`] if `feature_names` does not have
///   one name per model feature
pub fn feature_importance(
    model: &dyn Regressor,
    feature_names: &[String],
) -> Result<Vec<FeatureImportance>, InterpretError> {
    let scores = model
        .feature_importances()
        .or_else(|| model.coefficients().map(|c| c.mapv(f64::abs)))
        .ok_or_else(|| InterpretError::Unsupported(model.name().to_string()))?;

    if scores.len() != feature_names.len() {
        return Err(InterpretError::DimensionMismatch {
            expected: scores.len(),
            actual: feature_names.len(),
        });
    }

    let mut ranked: Vec<FeatureImportance> = feature_names
        .iter()
        .zip(scores.iter())
        .map(|(name, &importance)| FeatureImportance {
            feature: name.clone(),
            importance,
        })
        .collect();
    ranked.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    Ok(ranked)
}

/// Local explanation methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum Explainer {
    /// Shapley additive explanations
    #[display("SHAP")]
    Shap,
    /// Local interpretable model-agnostic explanations
    #[display("LIME")]
    Lime,
}

impl Explainer {
    /// Explain a model's predictions.
    ///
    /// # Errors
    /// No explainer backend is compiled into this build, so this always
    /// returns [`InterpretError::Unavailable`].
    pub fn explain(
        &self,
        model: &dyn Regressor,
        _feature_names: &[String],
    ) -> Result<Vec<FeatureImportance>, InterpretError> {
        tracing::warn!(explainer = %self, model = model.name(), "Explainer not available");
        Err(InterpretError::Unavailable(format!(
            "{self} explanations are not available in this build"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::linear::LinearRegression;
    use ndarray::{Array1, Array2, array};

    #[derive(Debug)]
    struct Constant;

    impl Regressor for Constant {
        fn name(&self) -> &str {
            "Constant"
        }

        fn fit(&mut self, _x: &Array2<f64>, _y: &Array1<f64>) -> Result<()> {
            Ok(())
        }

        fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
            Ok(Array1::zeros(x.nrows()))
        }
    }

    fn names(n: &[&str]) -> Vec<String> {
        n.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_linear_uses_absolute_coefficients() {
        // y = 1 - 3a + 0.5b
        let x = array![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0], [2.0, 3.0]];
        let y = x.map_axis(ndarray::Axis(1), |r| 1.0 - 3.0 * r[0] + 0.5 * r[1]);
        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();

        let ranked = feature_importance(&model, &names(&["a", "b"])).unwrap();
        assert_eq!(ranked[0].feature, "a");
        approx::assert_abs_diff_eq!(ranked[0].importance, 3.0, epsilon = 1e-8);
        approx::assert_abs_diff_eq!(ranked[1].importance, 0.5, epsilon = 1e-8);
    }

    #[test]
    fn test_unsupported_model() {
        let result = feature_importance(&Constant, &names(&["a"]));
        assert!(matches!(result, Err(InterpretError::Unsupported(_))));
    }

    #[test]
    fn test_name_count_mismatch() {
        let x = array![[0.0, 1.0], [1.0, 0.0], [2.0, 2.0]];
        let y = array![1.0, 2.0, 3.0];
        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();

        let result = feature_importance(&model, &names(&["a"]));
        assert!(matches!(
            result,
            Err(InterpretError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_explainers_report_unavailable() {
        for explainer in [Explainer::Shap, Explainer::Lime] {
            assert!(matches!(
                explainer.explain(&Constant, &[]),
                Err(InterpretError::Unavailable(_))
            ));
        }
    }
}
