#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/claimlens/claimlens/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod loader;
pub mod schema;
pub mod table;

pub use error::{DataError, Result};
pub use loader::{DatasetInfo, Delimiter, dataset_info, load_insurance_data, read_delimited};
pub use schema::Gender;
pub use table::{f64_column, is_numeric_dtype, require_columns, string_column};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
