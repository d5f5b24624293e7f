#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/carhart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod align;
pub mod error;
pub mod fama_french;
pub mod ols;

pub use align::merge_on_period;
pub use error::{RegressionError, Result};
pub use fama_french::{four_factor_regression, umd_regression};
pub use ols::{INTERCEPT, OlsRegression, OlsResults};
