//! Row-level view of the columns a hypothesis test reads.

use crate::error::Result;
use claimlens_data::schema::{TOTAL_CLAIMS, TOTAL_PREMIUM};
use claimlens_data::{f64_column, require_columns, string_column};
use polars::prelude::DataFrame;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone)]
struct PolicyRow {
    group: Option<String>,
    premium: Option<f64>,
    claims: f64,
}

/// Group key, premium and claim amount per policy.
///
/// A null claim amount counts as no claim. Rows with a null group key are
/// kept for counting but never take part in a test.
#[derive(Debug, Clone)]
pub(crate) struct PolicyRows {
    rows: Vec<PolicyRow>,
}

impl PolicyRows {
    pub(crate) fn from_frame(df: &DataFrame, dimension: &str) -> Result<Self> {
        require_columns(df, &[dimension, TOTAL_PREMIUM, TOTAL_CLAIMS])?;

        let groups = string_column(df, dimension)?;
        let premiums = f64_column(df, TOTAL_PREMIUM)?;
        let claims = f64_column(df, TOTAL_CLAIMS)?;

        let rows = groups
            .into_iter()
            .zip(premiums)
            .zip(claims)
            .map(|((group, premium), claims)| PolicyRow {
                group,
                premium,
                claims: claims.unwrap_or(0.0),
            })
            .collect();

        Ok(Self { rows })
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Keep rows whose group key is present and accepted by `keep`.
    pub(crate) fn retain_groups(&mut self, keep: impl Fn(&str) -> bool) {
        self.rows
            .retain(|row| row.group.as_deref().is_some_and(|g| keep(g)));
    }

    /// Keyed rows as `(group, premium, claims)`.
    fn keyed(&self) -> impl Iterator<Item = (&str, Option<f64>, f64)> + '_ {
        self.rows
            .iter()
            .filter_map(|row| row.group.as_deref().map(|g| (g, row.premium, row.claims)))
    }

    /// `[no claim, claim]` counts per group.
    pub(crate) fn claim_counts(&self) -> BTreeMap<&str, [f64; 2]> {
        let mut counts: BTreeMap<&str, [f64; 2]> = BTreeMap::new();
        for (group, _, claims) in self.keyed() {
            let cell = counts.entry(group).or_insert([0.0, 0.0]);
            cell[usize::from(claims > 0.0)] += 1.0;
        }
        counts
    }

    /// Claim amounts of claim records per group.
    pub(crate) fn claim_amounts(&self) -> BTreeMap<&str, Vec<f64>> {
        let mut amounts: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
        for (group, _, claims) in self.keyed().filter(|(_, _, c)| *c > 0.0) {
            amounts.entry(group).or_default().push(claims);
        }
        amounts
    }

    /// Premium minus claims per group, skipping rows without a premium.
    pub(crate) fn margins(&self) -> BTreeMap<&str, Vec<f64>> {
        let mut margins: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
        for (group, premium, claims) in self.keyed() {
            if let Some(premium) = premium {
                margins.entry(group).or_default().push(premium - claims);
            }
        }
        margins
    }

    /// Groups ordered by descending row count, ties in order of first
    /// appearance.
    pub(crate) fn groups_by_count(&self) -> Vec<(String, usize)> {
        let mut order: Vec<(String, usize)> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        for (group, _, _) in self.keyed() {
            match index.get(group) {
                Some(&i) => order[i].1 += 1,
                None => {
                    index.insert(group, order.len());
                    order.push((group.to_string(), 1));
                }
            }
        }
        // stable sort keeps first-appearance order among equal counts
        order.sort_by(|a, b| b.1.cmp(&a.1));
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn frame() -> DataFrame {
        DataFrame::new(vec![
            Column::new("Province".into(), &[Some("A"), Some("B"), None, Some("A")]),
            Column::new(TOTAL_PREMIUM.into(), &[Some(100.0), None, Some(50.0), Some(80.0)]),
            Column::new(TOTAL_CLAIMS.into(), &[Some(0.0), Some(40.0), None, Some(120.0)]),
        ])
        .unwrap()
    }

    #[test]
    fn test_null_group_excluded_from_counts() {
        let rows = PolicyRows::from_frame(&frame(), "Province").unwrap();
        assert_eq!(rows.len(), 4);

        let counts = rows.claim_counts();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts["A"], [1.0, 1.0]);
        assert_eq!(counts["B"], [0.0, 1.0]);
    }

    #[test]
    fn test_margins_skip_missing_premium() {
        let rows = PolicyRows::from_frame(&frame(), "Province").unwrap();
        let margins = rows.margins();
        assert_eq!(margins["A"], vec![100.0, -40.0]);
        assert!(!margins.contains_key("B"));
    }

    #[test]
    fn test_retain_groups() {
        let mut rows = PolicyRows::from_frame(&frame(), "Province").unwrap();
        rows.retain_groups(|g| g == "A");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.claim_amounts()["A"], vec![120.0]);
    }

    #[test]
    fn test_groups_by_count_ties_keep_first_appearance() {
        let df = DataFrame::new(vec![
            Column::new("PostalCode".into(), &["9", "5", "5", "9", "1"]),
            Column::new(TOTAL_PREMIUM.into(), &[1.0; 5]),
            Column::new(TOTAL_CLAIMS.into(), &[0.0; 5]),
        ])
        .unwrap();
        let rows = PolicyRows::from_frame(&df, "PostalCode").unwrap();
        let counts = rows.groups_by_count();
        let ranked: Vec<&str> = counts
            .iter()
            .map(|(g, _)| g.as_str())
            .collect();
        assert_eq!(ranked, vec!["9", "5", "1"]);
    }
}
