//! Tests for equality of location across two or more groups.

use crate::contingency::chi2_sf;
use crate::descriptive::{mean, rank_with_ties, tie_term, variance};
use crate::{StatsError, TestStatistic, distribution_error};
use statrs::distribution::{ContinuousCDF, FisherSnedecor};

fn check_groups(groups: &[Vec<f64>]) -> Result<usize, StatsError> {
    if groups.len() < 2 {
        return Err(StatsError::InsufficientData {
            required: 2,
            actual: groups.len(),
        });
    }
    if let Some(empty) = groups.iter().position(Vec::is_empty) {
        return Err(StatsError::InvalidInput(format!("group {empty} is empty")));
    }
    if groups.iter().flatten().any(|v| !v.is_finite()) {
        return Err(StatsError::InvalidInput(
            "observations must be finite".to_string(),
        ));
    }
    Ok(groups.iter().map(Vec::len).sum())
}

/// One-way analysis of variance.
///
/// Returns the F statistic with `(k - 1, N - k)` degrees of freedom; the
/// reported `degrees_of_freedom` is the between-group value `k - 1`.
///
/// # Errors
/// [`StatsError::Degenerate`] when any group has zero variance or the F
/// statistic is not finite. Callers fall back to [`kruskal_wallis`].
pub fn one_way_anova(groups: &[Vec<f64>]) -> Result<TestStatistic, StatsError> {
    let n_total = check_groups(groups)?;
    let k = groups.len();

    if n_total <= k {
        return Err(StatsError::InsufficientData {
            required: k + 1,
            actual: n_total,
        });
    }

    if let Some(flat) = groups
        .iter()
        .position(|g| variance(g, 0).is_some_and(|v| v == 0.0))
    {
        return Err(StatsError::Degenerate(format!(
            "group {flat} has zero variance"
        )));
    }

    let grand_mean = groups.iter().flatten().sum::<f64>() / n_total as f64;

    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for group in groups {
        let group_mean = mean(group).unwrap_or(grand_mean);
        ss_between += group.len() as f64 * (group_mean - grand_mean).powi(2);
        ss_within += group.iter().map(|&x| (x - group_mean).powi(2)).sum::<f64>();
    }

    let df_between = (k - 1) as f64;
    let df_within = (n_total - k) as f64;
    let f = (ss_between / df_between) / (ss_within / df_within);

    if !f.is_finite() {
        return Err(StatsError::Degenerate(format!("F statistic is {f}")));
    }

    let dist = FisherSnedecor::new(df_between, df_within).map_err(distribution_error)?;

    Ok(TestStatistic {
        statistic: f,
        p_value: dist.sf(f).clamp(0.0, 1.0),
        degrees_of_freedom: Some(df_between),
    })
}

/// Kruskal-Wallis H test on ranks, with tie correction.
///
/// # Errors
/// [`StatsError::Degenerate`] when every observation is identical.
pub fn kruskal_wallis(groups: &[Vec<f64>]) -> Result<TestStatistic, StatsError> {
    let n_total = check_groups(groups)?;
    let n = n_total as f64;

    let pooled: Vec<f64> = groups.iter().flatten().copied().collect();
    let (ranks, ties) = rank_with_ties(&pooled);

    let correction = 1.0 - tie_term(&ties) / (n * n * n - n);
    if correction <= 0.0 {
        return Err(StatsError::Degenerate(
            "all observations are identical".to_string(),
        ));
    }

    let mut offset = 0;
    let mut rank_term = 0.0;
    for group in groups {
        let rank_sum: f64 = ranks[offset..offset + group.len()].iter().sum();
        rank_term += rank_sum * rank_sum / group.len() as f64;
        offset += group.len();
    }

    let h = (12.0 / (n * (n + 1.0)) * rank_term - 3.0 * (n + 1.0)) / correction;
    let dof = (groups.len() - 1) as f64;

    Ok(TestStatistic {
        statistic: h,
        p_value: chi2_sf(h, dof)?,
        degrees_of_freedom: Some(dof),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_anova_known_values() {
        let groups = vec![
            vec![6.0, 8.0, 4.0, 5.0, 3.0, 4.0],
            vec![8.0, 12.0, 9.0, 11.0, 6.0, 8.0],
            vec![13.0, 9.0, 11.0, 8.0, 7.0, 12.0],
        ];
        let result = one_way_anova(&groups).unwrap();

        // group means 5, 9, 10; grand mean 8
        // SSB = 6*(9 + 1 + 4) = 84, SSW = 16 + 24 + 28 = 68
        let expected_f = (84.0 / 2.0) / (68.0 / 15.0);
        assert_relative_eq!(result.statistic, expected_f, epsilon = 1e-10);
        assert_eq!(result.degrees_of_freedom, Some(2.0));
        assert!(result.p_value < 0.01);
    }

    #[test]
    fn test_anova_identical_groups() {
        let groups = vec![vec![1.0, 2.0, 3.0], vec![1.0, 2.0, 3.0]];
        let result = one_way_anova(&groups).unwrap();
        assert_relative_eq!(result.statistic, 0.0);
        assert_relative_eq!(result.p_value, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_anova_zero_variance_group_is_degenerate() {
        let groups = vec![vec![5.0, 5.0, 5.0], vec![1.0, 2.0, 3.0]];
        assert!(matches!(
            one_way_anova(&groups),
            Err(StatsError::Degenerate(_))
        ));
    }

    #[test]
    fn test_anova_needs_two_groups() {
        assert!(matches!(
            one_way_anova(&[vec![1.0, 2.0]]),
            Err(StatsError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_kruskal_without_ties() {
        let groups = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]];
        let result = kruskal_wallis(&groups).unwrap();

        // rank sums 6 and 15, N = 6
        let expected_h = 12.0 / 42.0 * (36.0 / 3.0 + 225.0 / 3.0) - 21.0;
        assert_relative_eq!(result.statistic, expected_h, epsilon = 1e-10);
        assert_eq!(result.degrees_of_freedom, Some(1.0));
    }

    #[test]
    fn test_kruskal_handles_constant_group() {
        let groups = vec![vec![5.0, 5.0, 5.0], vec![1.0, 2.0, 3.0]];
        let result = kruskal_wallis(&groups).unwrap();
        assert!(result.statistic > 0.0);
        assert!(result.p_value > 0.0 && result.p_value < 1.0);
    }

    #[test]
    fn test_kruskal_all_identical_is_degenerate() {
        let groups = vec![vec![2.0, 2.0], vec![2.0, 2.0, 2.0]];
        assert!(matches!(
            kruskal_wallis(&groups),
            Err(StatsError::Degenerate(_))
        ));
    }
}
