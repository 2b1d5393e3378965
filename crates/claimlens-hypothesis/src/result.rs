//! Structured outcomes of hypothesis tests.

use claimlens_stats::TestStatistic;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Statistical test that produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum TestMethod {
    /// Chi-squared test of independence
    #[display("Chi-squared")]
    ChiSquared,
    /// One-way analysis of variance
    #[display("ANOVA")]
    Anova,
    /// Kruskal-Wallis H test
    #[display("Kruskal-Wallis")]
    KruskalWallis,
    /// Student's two-sample t-test
    #[display("t-test")]
    TTest,
    /// Mann-Whitney U test
    #[display("Mann-Whitney U")]
    MannWhitneyU,
}

/// A completed test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// Test that actually ran
    pub method: TestMethod,
    /// Parametric test that was attempted first, when this is its fallback
    pub fallback_from: Option<TestMethod>,
    /// Test statistic
    pub statistic: f64,
    /// p-value
    pub p_value: f64,
    /// Degrees of freedom, where the reference distribution has them
    pub degrees_of_freedom: Option<f64>,
    /// Whether `p_value < alpha`
    pub reject_null: bool,
    /// Human-readable decision
    pub interpretation: String,
    /// Mean of the tested quantity per group, when reported
    pub group_means: Option<BTreeMap<String, f64>>,
}

impl TestResult {
    /// Build a result from a computed statistic at level `alpha`.
    pub(crate) fn from_statistic(
        method: TestMethod,
        stat: TestStatistic,
        alpha: f64,
        subject: &str,
    ) -> Self {
        let reject_null = stat.rejects(alpha);
        let interpretation = if reject_null {
            format!(
                "Reject H₀: {subject} differs significantly (p = {:.4} < {alpha})",
                stat.p_value
            )
        } else {
            format!(
                "Fail to reject H₀: no significant difference in {subject} (p = {:.4})",
                stat.p_value
            )
        };

        Self {
            method,
            fallback_from: None,
            statistic: stat.statistic,
            p_value: stat.p_value,
            degrees_of_freedom: stat.degrees_of_freedom,
            reject_null,
            interpretation,
            group_means: None,
        }
    }
}

/// Outcome of one sub-test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum SubTest {
    /// The test ran
    Completed(TestResult),
    /// The data cannot support the test; no statistic is reported
    Insufficient {
        /// Test that would have run
        method: TestMethod,
        /// Why it could not run
        reason: String,
    },
}

impl SubTest {
    pub(crate) fn insufficient(method: TestMethod, reason: impl Into<String>) -> Self {
        Self::Insufficient {
            method,
            reason: reason.into(),
        }
    }

    /// Whether the sub-test ran and rejected its null hypothesis.
    pub const fn rejects(&self) -> bool {
        match self {
            Self::Completed(result) => result.reject_null,
            Self::Insufficient { .. } => false,
        }
    }

    /// The completed result, if any.
    pub const fn result(&self) -> Option<&TestResult> {
        match self {
            Self::Completed(result) => Some(result),
            Self::Insufficient { .. } => None,
        }
    }

    /// Test that ran or would have run.
    pub const fn method(&self) -> TestMethod {
        match self {
            Self::Completed(result) => result.method,
            Self::Insufficient { method, .. } => *method,
        }
    }
}

/// Combined decision over the sub-tests of a hypothesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverallVerdict {
    /// Whether any sub-test rejected
    pub reject_null: bool,
    /// One-line summary
    pub summary: String,
}

impl OverallVerdict {
    pub(crate) fn new(reject_null: bool, subject: &str) -> Self {
        let summary = if reject_null {
            format!("Risk differences exist {subject}")
        } else {
            format!("No significant risk differences {subject}")
        };
        Self {
            reject_null,
            summary,
        }
    }
}

/// Result of a frequency + severity risk comparison across a dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskDifferenceResult {
    /// Grouping dimension
    pub dimension: String,
    /// Groups that took part in the comparison
    pub tested_groups: Vec<String>,
    /// Claim frequency sub-test
    pub frequency_test: SubTest,
    /// Claim severity sub-test
    pub severity_test: SubTest,
    /// Combined verdict
    pub overall: OverallVerdict,
}

/// Result of a margin comparison across a dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginDifferenceResult {
    /// Grouping dimension
    pub dimension: String,
    /// Groups that took part in the comparison
    pub tested_groups: Vec<String>,
    /// Margin sub-test
    pub margin_test: SubTest,
    /// Combined verdict
    pub overall: OverallVerdict,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(p_value: f64) -> TestStatistic {
        TestStatistic {
            statistic: 3.0,
            p_value,
            degrees_of_freedom: Some(1.0),
        }
    }

    #[test]
    fn test_result_decision() {
        let reject = TestResult::from_statistic(TestMethod::ChiSquared, stat(0.01), 0.05, "x");
        assert!(reject.reject_null);
        assert!(reject.interpretation.starts_with("Reject"));

        let keep = TestResult::from_statistic(TestMethod::ChiSquared, stat(0.05), 0.05, "x");
        assert!(!keep.reject_null);
        assert!(keep.interpretation.starts_with("Fail to reject"));
    }

    #[test]
    fn test_insufficient_never_rejects() {
        let sub = SubTest::insufficient(TestMethod::Anova, "Insufficient groups for ANOVA");
        assert!(!sub.rejects());
        assert!(sub.result().is_none());
        assert_eq!(sub.method(), TestMethod::Anova);
    }

    #[test]
    fn test_method_display() {
        assert_eq!(TestMethod::KruskalWallis.to_string(), "Kruskal-Wallis");
        assert_eq!(TestMethod::MannWhitneyU.to_string(), "Mann-Whitney U");
    }
}
