//! Loading the policy dataset from delimited text files.
//!
//! The raw export ships as pipe-separated `.txt`; derived extracts are
//! usually comma-separated `.csv`. Both go through [`read_delimited`].

use crate::error::{DataError, Result};
use polars::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Number of rows polars scans to infer column dtypes.
const INFER_SCHEMA_ROWS: usize = 10_000;

/// Field separator of a delimited file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// `,`
    Comma,
    /// `|`
    Pipe,
}

impl Delimiter {
    /// The separator byte.
    pub const fn byte(&self) -> u8 {
        match self {
            Self::Comma => b',',
            Self::Pipe => b'|',
        }
    }

    /// Delimiters to try for a file, in order.
    ///
    /// `.txt` files are tried as pipe-separated first, everything else is
    /// read as comma-separated.
    pub fn candidates(path: &Path) -> Vec<Self> {
        let is_txt = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));

        if is_txt {
            vec![Self::Pipe, Self::Comma]
        } else {
            vec![Self::Comma]
        }
    }
}

/// Load the insurance dataset.
///
/// With no explicit `path`, the first `.csv` or `.txt` file (by name) in
/// `raw_dir` is used.
///
/// # Errors
/// Returns [`DataError::FileNotFound`] when no candidate file exists.
pub fn load_insurance_data(path: Option<&Path>, raw_dir: &Path) -> Result<DataFrame> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => find_data_file(raw_dir)?,
    };

    if !path.is_file() {
        return Err(DataError::FileNotFound(path.display().to_string()));
    }

    info!(path = %path.display(), "loading insurance data");
    let df = read_delimited(&path)?;
    info!(rows = df.height(), columns = df.width(), "loaded insurance data");

    Ok(df)
}

/// Find the first data file in a directory.
fn find_data_file(dir: &Path) -> Result<PathBuf> {
    let not_found = || {
        DataError::FileNotFound(format!(
            "no .csv or .txt files in {}; provide a path or place data in the raw data directory",
            dir.display()
        ))
    };

    if !dir.is_dir() {
        return Err(not_found());
    }

    let mut candidates: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| {
                        ext.eq_ignore_ascii_case("csv") || ext.eq_ignore_ascii_case("txt")
                    })
        })
        .collect();
    candidates.sort();

    candidates.into_iter().next().ok_or_else(not_found)
}

/// Read a delimited file, detecting the delimiter.
///
/// A parse that fails or collapses every row into a single column is treated
/// as the wrong delimiter and the next candidate is tried.
pub fn read_delimited(path: &Path) -> Result<DataFrame> {
    let candidates = Delimiter::candidates(path);
    let mut last_error = None;

    for (i, delimiter) in candidates.iter().enumerate() {
        let is_last = i + 1 == candidates.len();
        match read_with(path, *delimiter) {
            Ok(df) if df.width() > 1 || is_last => {
                debug!(?delimiter, columns = df.width(), "parsed delimited file");
                return Ok(df);
            }
            Ok(_) => {
                warn!(?delimiter, "delimiter produced a single column, trying next");
            }
            Err(e) => {
                warn!(?delimiter, error = %e, "failed to parse with delimiter");
                last_error = Some(e);
            }
        }
    }

    Err(last_error.map_or_else(
        || DataError::Parse(format!("could not parse {}", path.display())),
        DataError::from,
    ))
}

fn read_with(path: &Path, delimiter: Delimiter) -> PolarsResult<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .map_parse_options(|opts| opts.with_separator(delimiter.byte()))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
}

/// Basic information about a loaded dataset.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetInfo {
    /// (rows, columns)
    pub shape: (usize, usize),

    /// Column names in table order.
    pub columns: Vec<String>,

    /// Column dtypes, keyed by column name.
    pub dtypes: BTreeMap<String, String>,

    /// Null counts, keyed by column name.
    pub missing_values: BTreeMap<String, usize>,

    /// Estimated in-memory size in megabytes.
    pub memory_usage_mb: f64,
}

/// Summarize shape, dtypes and missing values of a table.
pub fn dataset_info(df: &DataFrame) -> DatasetInfo {
    let mut columns = Vec::with_capacity(df.width());
    let mut dtypes = BTreeMap::new();
    let mut missing_values = BTreeMap::new();

    for column in df.get_columns() {
        let name = column.name().to_string();
        dtypes.insert(name.clone(), column.dtype().to_string());
        missing_values.insert(name.clone(), column.null_count());
        columns.push(name);
    }

    DatasetInfo {
        shape: df.shape(),
        columns,
        dtypes,
        missing_values,
        memory_usage_mb: df.estimated_size() as f64 / (1024.0 * 1024.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("data.txt", vec![Delimiter::Pipe, Delimiter::Comma])]
    #[case("DATA.TXT", vec![Delimiter::Pipe, Delimiter::Comma])]
    #[case("data.csv", vec![Delimiter::Comma])]
    #[case("data", vec![Delimiter::Comma])]
    fn test_delimiter_candidates(#[case] file: &str, #[case] expected: Vec<Delimiter>) {
        assert_eq!(Delimiter::candidates(Path::new(file)), expected);
    }

    #[test]
    fn test_dataset_info() {
        let df = DataFrame::new(vec![
            Column::new("col1".into(), &[Some(1i64), Some(2), Some(3), None]),
            Column::new("col2".into(), &["a", "b", "c", "d"]),
            Column::new("col3".into(), &[1.1, 2.2, 3.3, 4.4]),
        ])
        .unwrap();

        let info = dataset_info(&df);

        assert_eq!(info.shape, (4, 3));
        assert_eq!(info.columns.len(), 3);
        assert_eq!(info.missing_values["col1"], 1);
        assert_eq!(info.missing_values["col2"], 0);
        assert!(info.dtypes.contains_key("col3"));
    }

    #[test]
    fn test_missing_directory_is_file_not_found() {
        let err = load_insurance_data(None, Path::new("/nonexistent/claimlens/raw")).unwrap_err();
        assert!(matches!(err, DataError::FileNotFound(_)));
    }

    #[test]
    fn test_missing_file_is_file_not_found() {
        let err = load_insurance_data(
            Some(Path::new("/nonexistent/claimlens/policies.csv")),
            Path::new("."),
        )
        .unwrap_err();
        assert!(matches!(err, DataError::FileNotFound(_)));
    }
}
