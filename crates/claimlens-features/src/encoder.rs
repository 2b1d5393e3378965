//! One-hot encoding of categorical columns.

use crate::error::Result;
use claimlens_data::string_column;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Levels observed for one categorical column at fit time, sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedColumn {
    /// Source column
    pub name: String,
    /// Sorted distinct levels; the first one is the reference level
    pub levels: Vec<String>,
}

impl EncodedColumn {
    /// Indicator column names (every level except the reference).
    pub fn indicator_names(&self) -> Vec<String> {
        self.levels
            .iter()
            .skip(1)
            .map(|level| indicator_name(&self.name, level))
            .collect()
    }
}

fn indicator_name(column: &str, level: &str) -> String {
    format!("{column}_{level}")
}

/// Drop-first one-hot encoder.
///
/// A column with `k` levels at fit time always expands to `k - 1` indicator
/// columns named `<column>_<level>`. Levels unseen at fit time, and nulls,
/// encode as all zeros.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    columns: Vec<EncodedColumn>,
}

impl OneHotEncoder {
    /// Record the sorted distinct levels of each categorical column.
    pub fn fit(df: &DataFrame, categorical: &[String]) -> Result<Self> {
        let mut columns = Vec::with_capacity(categorical.len());
        for name in categorical {
            let levels: BTreeSet<String> = string_column(df, name)?.into_iter().flatten().collect();
            columns.push(EncodedColumn {
                name: name.clone(),
                levels: levels.into_iter().collect(),
            });
        }
        Ok(Self { columns })
    }

    /// Fitted columns.
    pub fn columns(&self) -> &[EncodedColumn] {
        &self.columns
    }

    /// Names of all indicator columns, in output order.
    pub fn indicator_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .flat_map(EncodedColumn::indicator_names)
            .collect()
    }

    /// Replace the fitted categorical columns by their indicators.
    ///
    /// Other columns keep their order; indicators follow them, column by
    /// column in fit order.
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let encoded: BTreeSet<&str> = self.columns.iter().map(|c| c.name.as_str()).collect();

        let mut exprs: Vec<Expr> = df
            .get_column_names()
            .iter()
            .filter(|name| !encoded.contains(name.as_str()))
            .map(|name| col(name.as_str()))
            .collect();

        for column in &self.columns {
            for level in column.levels.iter().skip(1) {
                exprs.push(
                    when(col(column.name.as_str()).cast(DataType::String).eq(lit(level.as_str())))
                        .then(lit(1.0))
                        .otherwise(lit(0.0))
                        .alias(indicator_name(&column.name, level)),
                );
            }
        }

        Ok(df.clone().lazy().select(exprs).collect()?)
    }
}

/// Fit an encoder on `categorical` columns of `df` and apply it.
pub fn encode_categoricals(
    df: &DataFrame,
    categorical: &[String],
) -> Result<(DataFrame, OneHotEncoder)> {
    let encoder = OneHotEncoder::fit(df, categorical)?;
    let encoded = encoder.transform(df)?;
    Ok((encoded, encoder))
}
