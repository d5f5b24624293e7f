#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/carhart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod fetch;
mod format;
pub mod momentum;
pub mod regression;
pub mod report;

pub use export::{ExportError, ExportFormat, Exporter};
pub use fetch::FetchSummary;
pub use momentum::{BacktestReport, MomentumReport};
pub use regression::RegressionReport;
pub use report::Report;
