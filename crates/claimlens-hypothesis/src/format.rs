//! Plain-text rendering of hypothesis test results.

use crate::result::{MarginDifferenceResult, OverallVerdict, RiskDifferenceResult, SubTest};

/// A hypothesis outcome made of labelled sub-tests and an overall verdict.
pub trait HypothesisOutcome {
    /// Sub-tests in report order, with their labels.
    fn sub_tests(&self) -> Vec<(&'static str, &SubTest)>;

    /// Groups compared by the test.
    fn tested_groups(&self) -> &[String];

    /// Combined verdict.
    fn overall(&self) -> &OverallVerdict;
}

impl HypothesisOutcome for RiskDifferenceResult {
    fn sub_tests(&self) -> Vec<(&'static str, &SubTest)> {
        vec![
            ("FREQUENCY TEST", &self.frequency_test),
            ("SEVERITY TEST", &self.severity_test),
        ]
    }

    fn tested_groups(&self) -> &[String] {
        &self.tested_groups
    }

    fn overall(&self) -> &OverallVerdict {
        &self.overall
    }
}

impl HypothesisOutcome for MarginDifferenceResult {
    fn sub_tests(&self) -> Vec<(&'static str, &SubTest)> {
        vec![("MARGIN TEST", &self.margin_test)]
    }

    fn tested_groups(&self) -> &[String] {
        &self.tested_groups
    }

    fn overall(&self) -> &OverallVerdict {
        &self.overall
    }
}

/// Render a result as a text report headed by `hypothesis_name`.
pub fn format_results(result: &dyn HypothesisOutcome, hypothesis_name: &str) -> String {
    let mut output = String::new();
    let rule = "=".repeat(80);

    output.push_str(&format!("\n{rule}\n"));
    output.push_str(&format!("HYPOTHESIS: {hypothesis_name}\n"));
    output.push_str(&format!("{rule}\n\n"));

    for (label, sub_test) in result.sub_tests() {
        output.push_str(&format!("{label}:\n"));
        write_sub_test(&mut output, sub_test);
        output.push('\n');
    }

    let groups = result.tested_groups();
    if !groups.is_empty() {
        output.push_str(&format!("Groups tested: {}\n", groups.join(", ")));
    }

    let overall = result.overall();
    output.push_str(&format!("OVERALL RESULT: {}\n", overall.summary));
    output.push_str(&format!("Reject H₀: {}\n", overall.reject_null));

    output
}

fn write_sub_test(output: &mut String, sub_test: &SubTest) {
    match sub_test {
        SubTest::Insufficient { method, reason } => {
            output.push_str(&format!("  test: {method}\n"));
            output.push_str(&format!("  result: {reason}\n"));
        }
        SubTest::Completed(result) => {
            match result.fallback_from {
                Some(attempted) => output.push_str(&format!(
                    "  test: {} (fallback from {attempted})\n",
                    result.method
                )),
                None => output.push_str(&format!("  test: {}\n", result.method)),
            }
            output.push_str(&format!("  statistic: {:.4}\n", result.statistic));
            output.push_str(&format!("  p_value: {:.6}\n", result.p_value));
            if let Some(dof) = result.degrees_of_freedom {
                output.push_str(&format!("  degrees_of_freedom: {dof}\n"));
            }
            output.push_str(&format!("  reject_null: {}\n", result.reject_null));
            output.push_str(&format!("  interpretation: {}\n", result.interpretation));
            if let Some(means) = &result.group_means {
                for (group, mean) in means {
                    output.push_str(&format!("  mean[{group}]: {mean:.2}\n"));
                }
            }
        }
    }
}
