//! Risk and margin difference tests.
//!
//! Every test splits into sub-tests that either complete with a statistic and
//! p-value or report why the data cannot support them. Parametric tests fall
//! back to their rank-based counterparts when they are undefined for the data;
//! the result records which test ran.

use crate::error::{HypothesisError, Result};
use crate::records::PolicyRows;
use crate::result::{
    MarginDifferenceResult, OverallVerdict, RiskDifferenceResult, SubTest, TestMethod, TestResult,
};
use claimlens_data::Gender;
use claimlens_data::schema::{GENDER, POSTAL_CODE, PROVINCE};
use claimlens_stats::{
    StatsError, chi2_contingency, kruskal_wallis, mann_whitney_u, mean, one_way_anova,
    student_t_test,
};
use ndarray::Array2;
use polars::prelude::DataFrame;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info, warn};

const NO_CLAIMS: &str = "No claims data available";
const INSUFFICIENT_DATA: &str = "Insufficient data";
const INSUFFICIENT_GROUPS: &str = "Insufficient groups for ANOVA";

fn validate_alpha(alpha: f64) -> Result<()> {
    if alpha > 0.0 && alpha < 1.0 {
        Ok(())
    } else {
        Err(HypothesisError::InvalidParameter(format!(
            "alpha must lie in (0, 1), got {alpha}"
        )))
    }
}

/// Test H₀: no risk difference across the values of `dimension`.
///
/// Rows with a null `dimension` value are excluded from both sub-tests.
pub fn test_risk_difference(
    df: &DataFrame,
    dimension: &str,
    alpha: f64,
) -> Result<RiskDifferenceResult> {
    validate_alpha(alpha)?;
    let rows = PolicyRows::from_frame(df, dimension)?;
    let result = risk_difference(&rows, dimension, alpha, &format!("across {dimension}"));

    info!(
        dimension,
        reject_null = result.overall.reject_null,
        "Risk difference test completed"
    );
    Ok(result)
}

/// Test H₀: no risk difference across provinces.
pub fn test_province_risk_difference(df: &DataFrame, alpha: f64) -> Result<RiskDifferenceResult> {
    test_risk_difference(df, PROVINCE, alpha)
}

/// The `top_n` postal codes by policy count, ties in order of first appearance.
pub fn top_postal_codes(df: &DataFrame, top_n: usize) -> Result<Vec<String>> {
    if top_n == 0 {
        return Err(HypothesisError::InvalidParameter(
            "top_n must be at least 1".to_string(),
        ));
    }
    let rows = PolicyRows::from_frame(df, POSTAL_CODE)?;
    Ok(top_groups(&rows, top_n))
}

fn top_groups(rows: &PolicyRows, top_n: usize) -> Vec<String> {
    rows.groups_by_count()
        .into_iter()
        .take(top_n)
        .map(|(group, _)| group)
        .collect()
}

fn restrict_to_top(rows: &mut PolicyRows, top_n: usize) -> Result<Vec<String>> {
    if top_n == 0 {
        return Err(HypothesisError::InvalidParameter(
            "top_n must be at least 1".to_string(),
        ));
    }
    let top = top_groups(rows, top_n);
    let keep: HashSet<&str> = top.iter().map(String::as_str).collect();
    rows.retain_groups(|g| keep.contains(g));
    debug!(codes = top.len(), rows = rows.len(), "Restricted to top postal codes");
    Ok(top)
}

/// Test H₀: no risk difference between the `top_n` postal codes by policy
/// count.
pub fn test_zipcode_risk_difference(
    df: &DataFrame,
    alpha: f64,
    top_n: usize,
) -> Result<RiskDifferenceResult> {
    validate_alpha(alpha)?;
    let mut rows = PolicyRows::from_frame(df, POSTAL_CODE)?;
    let top = restrict_to_top(&mut rows, top_n)?;

    let mut result = risk_difference(&rows, POSTAL_CODE, alpha, "between zip codes");
    result.tested_groups = top;

    info!(
        codes = result.tested_groups.len(),
        reject_null = result.overall.reject_null,
        "Zip code risk test completed"
    );
    Ok(result)
}

/// Test H₀: no margin (premium − claims) difference between the `top_n`
/// postal codes by policy count.
pub fn test_zipcode_margin_difference(
    df: &DataFrame,
    alpha: f64,
    top_n: usize,
) -> Result<MarginDifferenceResult> {
    validate_alpha(alpha)?;
    let mut rows = PolicyRows::from_frame(df, POSTAL_CODE)?;
    let top = restrict_to_top(&mut rows, top_n)?;

    let margin_test = location_test(rows.margins(), alpha, "margin", true);
    let reject_null = margin_test.rejects();
    let summary = if reject_null {
        "Margin differences exist between zip codes".to_string()
    } else {
        "No significant margin differences between zip codes".to_string()
    };

    info!(codes = top.len(), reject_null, "Zip code margin test completed");
    Ok(MarginDifferenceResult {
        dimension: POSTAL_CODE.to_string(),
        tested_groups: top,
        margin_test,
        overall: OverallVerdict {
            reject_null,
            summary,
        },
    })
}

/// Test H₀: no risk difference between women and men.
///
/// Rows with any other gender value are excluded.
///
/// # Errors
/// [`HypothesisError::NoData`] when no row is Male or Female.
pub fn test_gender_risk_difference(df: &DataFrame, alpha: f64) -> Result<RiskDifferenceResult> {
    validate_alpha(alpha)?;
    let mut rows = PolicyRows::from_frame(df, GENDER)?;
    rows.retain_groups(|g| Gender::from_label(g).is_some());

    if rows.is_empty() {
        return Err(HypothesisError::NoData(
            "no rows with gender Male or Female".to_string(),
        ));
    }

    let frequency_test = frequency_test(&rows, alpha);
    let severity_test = gender_severity_test(&rows, alpha);
    let overall = OverallVerdict::new(
        frequency_test.rejects() || severity_test.rejects(),
        "between genders",
    );
    let tested_groups = rows.claim_counts().keys().map(|g| g.to_string()).collect();

    info!(reject_null = overall.reject_null, "Gender risk test completed");
    Ok(RiskDifferenceResult {
        dimension: GENDER.to_string(),
        tested_groups,
        frequency_test,
        severity_test,
        overall,
    })
}

fn risk_difference(
    rows: &PolicyRows,
    dimension: &str,
    alpha: f64,
    subject: &str,
) -> RiskDifferenceResult {
    let frequency_test = frequency_test(rows, alpha);
    let amounts = rows.claim_amounts();
    let severity_test = if amounts.is_empty() {
        SubTest::insufficient(TestMethod::Anova, NO_CLAIMS)
    } else {
        location_test(amounts, alpha, "claim severity", false)
    };

    let overall = OverallVerdict::new(
        frequency_test.rejects() || severity_test.rejects(),
        subject,
    );
    let tested_groups = rows.claim_counts().keys().map(|g| g.to_string()).collect();

    RiskDifferenceResult {
        dimension: dimension.to_string(),
        tested_groups,
        frequency_test,
        severity_test,
        overall,
    }
}

/// Chi-squared test of independence between group and has-claim flag.
fn frequency_test(rows: &PolicyRows, alpha: f64) -> SubTest {
    let counts = rows.claim_counts();
    if counts.len() < 2 {
        return SubTest::insufficient(TestMethod::ChiSquared, INSUFFICIENT_DATA);
    }

    let claims: f64 = counts.values().map(|c| c[1]).sum();
    let policies: f64 = counts.values().map(|c| c[0] + c[1]).sum();
    if claims == 0.0 || claims == policies {
        return SubTest::insufficient(
            TestMethod::ChiSquared,
            format!("{INSUFFICIENT_DATA}: only one claim outcome observed"),
        );
    }

    let cells: Vec<[f64; 2]> = counts.values().copied().collect();
    let observed = Array2::from_shape_fn((cells.len(), 2), |(i, j)| cells[i][j]);

    match chi2_contingency(&observed) {
        Ok(chi2) => SubTest::Completed(TestResult::from_statistic(
            TestMethod::ChiSquared,
            chi2.test,
            alpha,
            "claim frequency",
        )),
        Err(err) => SubTest::insufficient(TestMethod::ChiSquared, err.to_string()),
    }
}

/// ANOVA across groups with at least two observations, falling back to
/// Kruskal-Wallis when ANOVA is undefined.
fn location_test(
    partitions: BTreeMap<&str, Vec<f64>>,
    alpha: f64,
    subject: &str,
    with_means: bool,
) -> SubTest {
    let (names, groups): (Vec<&str>, Vec<Vec<f64>>) = partitions
        .into_iter()
        .filter(|(_, values)| values.len() >= 2)
        .unzip();

    if groups.len() < 2 {
        return SubTest::insufficient(TestMethod::Anova, INSUFFICIENT_GROUPS);
    }

    let (method, fallback_from, outcome) = match one_way_anova(&groups) {
        Err(StatsError::Degenerate(reason)) => {
            warn!(%reason, "ANOVA undefined, using Kruskal-Wallis");
            (
                TestMethod::KruskalWallis,
                Some(TestMethod::Anova),
                kruskal_wallis(&groups),
            )
        }
        other => (TestMethod::Anova, None, other),
    };

    match outcome {
        Ok(stat) => {
            let mut result = TestResult::from_statistic(method, stat, alpha, subject);
            result.fallback_from = fallback_from;
            if with_means {
                result.group_means = Some(group_means(&names, &groups));
            }
            SubTest::Completed(result)
        }
        Err(err) => SubTest::insufficient(method, format!("{INSUFFICIENT_DATA}: {err}")),
    }
}

/// Student's t-test on male vs female claim amounts, falling back to
/// Mann-Whitney U when the t statistic is undefined.
fn gender_severity_test(rows: &PolicyRows, alpha: f64) -> SubTest {
    let amounts = rows.claim_amounts();
    if amounts.is_empty() {
        return SubTest::insufficient(TestMethod::TTest, NO_CLAIMS);
    }

    let male = amounts.get(Gender::Male.label()).cloned().unwrap_or_default();
    let female = amounts
        .get(Gender::Female.label())
        .cloned()
        .unwrap_or_default();

    if male.len() < 2 || female.len() < 2 {
        return SubTest::insufficient(
            TestMethod::TTest,
            format!("{INSUFFICIENT_DATA} for comparison"),
        );
    }

    let (method, fallback_from, outcome) = match student_t_test(&male, &female) {
        Err(StatsError::Degenerate(reason)) => {
            warn!(%reason, "t-test undefined, using Mann-Whitney U");
            (
                TestMethod::MannWhitneyU,
                Some(TestMethod::TTest),
                mann_whitney_u(&male, &female),
            )
        }
        other => (TestMethod::TTest, None, other),
    };

    match outcome {
        Ok(stat) => {
            let mut result = TestResult::from_statistic(method, stat, alpha, "claim severity");
            result.fallback_from = fallback_from;
            result.group_means = Some(group_means(
                &[Gender::Male.label(), Gender::Female.label()],
                &[male, female],
            ));
            SubTest::Completed(result)
        }
        Err(err) => SubTest::insufficient(method, format!("{INSUFFICIENT_DATA}: {err}")),
    }
}

fn group_means(names: &[&str], groups: &[Vec<f64>]) -> BTreeMap<String, f64> {
    names
        .iter()
        .zip(groups)
        .filter_map(|(name, values)| mean(values).map(|m| (name.to_string(), m)))
        .collect()
}
