#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/claimlens/claimlens/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod paths;

// Re-export main types from sub-crates
pub use claimlens_data as data;
pub use claimlens_features as features;
pub use claimlens_hypothesis as hypothesis;
pub use claimlens_models as models;
pub use claimlens_output as output;
pub use claimlens_stats as stats;

pub use config::{AnalysisConfig, ConfigError};
pub use paths::ProjectPaths;

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
