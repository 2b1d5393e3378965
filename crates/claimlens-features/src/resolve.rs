//! Mapping of logical features to source columns.

use crate::error::{FeatureError, Result};
use crate::registry::FeatureInfo;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A logical feature bound to the source column it is read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedColumn {
    /// Canonical feature name
    pub feature: String,
    /// Column in the source table
    pub source: String,
}

/// Resolution of a feature allow-list against a table's columns.
///
/// Each logical feature binds to the first table column (in table order)
/// whose lower-cased name equals the canonical name or one of its aliases, so
/// case variants of the same column are never selected twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnResolution {
    columns: Vec<ResolvedColumn>,
}

impl ColumnResolution {
    /// Resolve `features` against the columns of `df`.
    ///
    /// # Errors
    /// [`FeatureError::NoFeatures`] when no feature matches any column.
    pub fn resolve(df: &DataFrame, features: &[FeatureInfo]) -> Result<Self> {
        let table_columns: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();

        let mut columns: Vec<ResolvedColumn> = Vec::new();
        for feature in features {
            if columns.iter().any(|c| c.feature == feature.name) {
                continue;
            }
            let found = table_columns
                .iter()
                .find(|name| feature.matches(name) && !columns.iter().any(|c| &c.source == *name));
            match found {
                Some(source) => columns.push(ResolvedColumn {
                    feature: feature.name.to_string(),
                    source: source.clone(),
                }),
                None => debug!(feature = feature.name, "Feature not present in table"),
            }
        }

        if columns.is_empty() {
            let wanted: Vec<&str> = features.iter().map(|f| f.name).collect();
            return Err(FeatureError::NoFeatures(wanted.join(", ")));
        }

        Ok(Self { columns })
    }

    /// Resolved columns in allow-list order.
    pub fn columns(&self) -> &[ResolvedColumn] {
        &self.columns
    }

    /// Canonical names of the resolved features.
    pub fn feature_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.feature.as_str()).collect()
    }

    /// Number of resolved features.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether nothing was resolved (never true for a constructed resolution).
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
