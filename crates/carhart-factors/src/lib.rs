#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/carhart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod lag;
pub mod momentum;
pub mod rank;
pub mod resample;
pub mod returns;
pub mod traits;

pub use error::{FactorError, Result};
pub use momentum::{MomentumFactor, MomentumFactorConfig, UmdConfig, UmdFactor};
pub use rank::percentile_rank;
pub use resample::{monthly_closes, monthly_returns};
pub use returns::{forward_returns, simple_returns};
pub use traits::{ConfigurableFactor, Factor};
