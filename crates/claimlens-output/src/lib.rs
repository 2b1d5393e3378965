#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/claimlens/claimlens/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod report;
pub mod table;

pub use export::{
    ExportError, ExportFormat, Exporter, claim_frequency_csv, claim_frequency_path,
    claim_severity_path, export_claim_frequency, export_claim_severity,
};
pub use report::{Report, ReportBuilder, ReportError};
pub use table::{ComparisonTable, group_summary_table};
