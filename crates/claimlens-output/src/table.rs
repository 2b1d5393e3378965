//! Text tables for the console and Markdown reports.

use claimlens_hypothesis::GroupSummary;
use claimlens_models::ModelComparison;

/// A model comparison ready for display.
#[derive(Debug, Clone, Copy)]
pub struct ComparisonTable<'a> {
    title: &'a str,
    rows: &'a [ModelComparison],
}

impl<'a> ComparisonTable<'a> {
    /// Wrap comparison rows under a title, typically the prediction target.
    pub const fn new(title: &'a str, rows: &'a [ModelComparison]) -> Self {
        Self { title, rows }
    }

    /// Row with the lowest test RMSE.
    pub fn best(&self) -> Option<&'a ModelComparison> {
        self.rows
            .iter()
            .min_by(|a, b| a.test_rmse.total_cmp(&b.test_rmse))
    }

    /// Fixed-width table.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("\nModel Comparison: {}\n", self.title));
        output.push_str(&"=".repeat(100));
        output.push('\n');

        output.push_str(&format!(
            "{:<20} {:>12} {:>10} {:>12} {:>10} {:>12} {:>10}\n",
            "Model", "Train RMSE", "Train R²", "Test RMSE", "Test R²", "Test MAE", "MAPE %"
        ));
        output.push_str(&"-".repeat(100));
        output.push('\n');

        for row in self.rows {
            output.push_str(&format!(
                "{:<20} {:>12.2} {:>10.4} {:>12.2} {:>10.4} {:>12.2} {:>10.2}\n",
                row.model,
                row.train_rmse,
                row.train_r2,
                row.test_rmse,
                row.test_r2,
                row.test_mae,
                row.test_mape
            ));
        }

        output.push_str(&"=".repeat(100));
        output.push('\n');
        if let Some(best) = self.best() {
            output.push_str(&format!(
                "Best model (lowest test RMSE): {} ({:.2})\n",
                best.model, best.test_rmse
            ));
        }

        output
    }

    /// GitHub-flavored Markdown table.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("# Model Comparison: {}\n\n", self.title));
        output.push_str(
            "| Model | Train RMSE | Train R² | Test RMSE | Test R² | Test MAE | Test MAPE |\n",
        );
        output.push_str(
            "|-------|------------|----------|-----------|---------|----------|-----------|\n",
        );

        for row in self.rows {
            output.push_str(&format!(
                "| {} | {:.2} | {:.4} | {:.2} | {:.4} | {:.2} | {:.2}% |\n",
                row.model,
                row.train_rmse,
                row.train_r2,
                row.test_rmse,
                row.test_r2,
                row.test_mae,
                row.test_mape
            ));
        }

        if let Some(best) = self.best() {
            output.push('\n');
            output.push_str(&format!("**Best model:** {}\n", best.model));
        }

        output
    }
}

fn format_optional(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.precision$}"))
}

/// Fixed-width claim frequency table for one grouping dimension.
pub fn group_summary_table(dimension: &str, summaries: &[GroupSummary]) -> String {
    let mut output = String::new();

    output.push_str(&format!("\nClaim Frequency by {dimension}\n"));
    output.push_str(&"=".repeat(100));
    output.push('\n');
    output.push_str(&format!(
        "{:<20} {:>10} {:>10} {:>10} {:>14} {:>14} {:>10}\n",
        "Group", "Policies", "Claims", "Frequency", "Severity", "Margin", "Loss Ratio"
    ));
    output.push_str(&"-".repeat(100));
    output.push('\n');

    for row in summaries {
        output.push_str(&format!(
            "{:<20} {:>10} {:>10} {:>10.4} {:>14} {:>14.2} {:>10}\n",
            row.group.as_deref().unwrap_or("(missing)"),
            row.total_policies,
            row.claims_count,
            row.claim_frequency,
            format_optional(row.claim_severity, 2),
            row.margin,
            format_optional(row.loss_ratio, 4)
        ));
    }

    output.push_str(&"=".repeat(100));
    output.push('\n');
    output
}
