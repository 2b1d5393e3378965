#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/claimlens/claimlens/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod encoder;
pub mod error;
pub mod impute;
pub mod pipeline;
pub mod registry;
pub mod resolve;
pub mod scaler;
pub mod split;

pub use encoder::{EncodedColumn, OneHotEncoder, encode_categoricals};
pub use error::{FeatureError, Result};
pub use impute::{Imputation, median_fill, mode_fill};
pub use pipeline::{
    FittedPreprocessor, PreparedDataset, create_has_claim_label, prepare_dataset,
    prepare_premium_dataset, prepare_severity_dataset,
};
pub use registry::{Dataset, FeatureInfo, available_features, features_for};
pub use resolve::{ColumnResolution, ResolvedColumn};
pub use scaler::StandardScaler;
pub use split::{SplitConfig, SplitIndices, train_test_split};

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
