#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/claimlens/claimlens/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod engine;
pub mod error;
pub mod format;
mod records;
pub mod result;
pub mod summary;

pub use engine::{
    test_gender_risk_difference, test_province_risk_difference, test_risk_difference,
    test_zipcode_margin_difference, test_zipcode_risk_difference, top_postal_codes,
};
pub use error::{HypothesisError, Result};
pub use format::{HypothesisOutcome, format_results};
pub use result::{
    MarginDifferenceResult, OverallVerdict, RiskDifferenceResult, SubTest, TestMethod,
    TestResult,
};
pub use summary::{GroupSummary, SeveritySummary, group_claim_frequency, group_claim_severity};

/// Default significance level.
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Default number of postal codes compared by the zip-code tests.
pub const DEFAULT_TOP_N: usize = 10;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
