//! Training, comparison and importance across estimators.

use approx::assert_abs_diff_eq;
use claimlens_models::{
    ForestConfig, ModelError, ModelKind, TrainedModel, compare_models,
    evaluate_model, feature_importance, train_linear_regression, train_model,
    train_random_forest,
};
use ndarray::{Array1, Array2};
use rstest::rstest;

/// Target driven by the first column only; the second is noise-free filler.
fn step_data(n: usize) -> (Array2<f64>, Array1<f64>) {
    let x = Array2::from_shape_fn((n, 2), |(i, j)| {
        if j == 0 {
            (i % 10) as f64
        } else {
            ((i * 7) % 3) as f64
        }
    });
    let y = Array1::from_shape_fn(n, |i| if i % 10 < 5 { 100.0 } else { 400.0 });
    (x, y)
}

fn feature_names() -> Vec<String> {
    vec!["driver".to_string(), "filler".to_string()]
}

#[rstest]
#[case(ModelKind::LinearRegression)]
#[case(ModelKind::DecisionTree)]
#[case(ModelKind::RandomForest)]
fn test_every_kind_trains_and_predicts(#[case] kind: ModelKind) {
    let (x, y) = step_data(60);
    let trained = train_model(kind, &x, &y, 42).unwrap();

    assert_eq!(trained.name, kind.to_string());
    assert!(trained.train_metrics.rmse.is_finite());
    assert_eq!(trained.model.predict(&x).unwrap().len(), 60);
}

#[test]
fn test_seed_reaches_forest_bootstrap() {
    let x = Array2::from_shape_fn((60, 2), |(i, j)| ((i * (j + 3)) % 17) as f64);
    let y = Array1::from_shape_fn(60, |i| ((i * 37) % 101) as f64);

    let predict = |seed: u64| {
        train_model(ModelKind::RandomForest, &x, &y, seed)
            .unwrap()
            .model
            .predict(&x)
            .unwrap()
    };

    assert_eq!(predict(7), predict(7));
    assert_ne!(predict(7), predict(8));
}

#[test]
fn test_compare_models_preserves_order() {
    let (x, y) = step_data(80);
    let (x_test, y_test) = step_data(20);

    let (forest, forest_metrics) = train_random_forest(
        &x,
        &y,
        ForestConfig {
            n_estimators: 10,
            ..ForestConfig::default()
        },
    )
    .unwrap();
    let (linear, linear_metrics) = train_linear_regression(&x, &y).unwrap();
    let models = vec![
        TrainedModel::new(forest, forest_metrics),
        TrainedModel::new(linear, linear_metrics),
    ];

    let table = compare_models(&models, &x_test, &y_test).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table[0].model, "Random Forest");
    assert_eq!(table[1].model, "Linear Regression");
    // the forest captures the step exactly; a line cannot
    assert!(table[0].test_rmse < table[1].test_rmse);
    assert_abs_diff_eq!(table[0].train_rmse, forest_metrics.rmse);
}

#[test]
fn test_forest_importance_ranks_driver_first() {
    let (x, y) = step_data(100);
    let (forest, _) = train_random_forest(
        &x,
        &y,
        ForestConfig {
            n_estimators: 20,
            ..ForestConfig::default()
        },
    )
    .unwrap();

    let ranked = feature_importance(&forest, &feature_names()).unwrap();
    assert_eq!(ranked[0].feature, "driver");
    let total: f64 = ranked.iter().map(|f| f.importance).sum();
    assert_abs_diff_eq!(total, 1.0, epsilon = 1e-9);
    assert!(ranked[0].importance >= ranked[1].importance);
}

#[test]
fn test_evaluate_reports_means() {
    let (x, y) = step_data(40);
    let (model, _) = train_linear_regression(&x, &y).unwrap();
    let metrics = evaluate_model(&model, &x, &y).unwrap();

    assert_abs_diff_eq!(metrics.mean_actual, 250.0, epsilon = 1e-9);
    // OLS with intercept reproduces the training mean
    assert_abs_diff_eq!(metrics.mean_predicted, 250.0, epsilon = 1e-6);
    assert!(metrics.mape >= 0.0);
}

#[test]
fn test_evaluate_empty_test_set() {
    let (x, y) = step_data(20);
    let (model, _) = train_linear_regression(&x, &y).unwrap();

    let result = evaluate_model(&model, &Array2::zeros((0, 2)), &Array1::zeros(0));
    assert!(matches!(result, Err(ModelError::EmptyEvaluationSet)));
}

#[cfg(feature = "gradient-boosting")]
#[test]
fn test_gradient_boosting_available() {
    let (x, y) = step_data(60);
    assert!(ModelKind::GradientBoosting.is_available());

    let trained = train_model(ModelKind::GradientBoosting, &x, &y, 42).unwrap();
    assert_eq!(trained.name, "Gradient Boosting");
    assert!(trained.train_metrics.r2 > 0.99);
}

#[cfg(not(feature = "gradient-boosting"))]
#[test]
fn test_gradient_boosting_unavailable() {
    let (x, y) = step_data(60);
    assert!(!ModelKind::GradientBoosting.is_available());
    assert!(matches!(
        train_model(ModelKind::GradientBoosting, &x, &y, 42),
        Err(ModelError::Unavailable(_))
    ));
}
