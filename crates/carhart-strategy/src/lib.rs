#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/carhart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod backtest;
pub mod config;
pub mod error;
pub mod metrics;
pub mod selection;
pub mod strategy;

pub use backtest::{BacktestPeriod, BacktestResult};
pub use config::MomentumConfig;
pub use error::{Result, StrategyError};
pub use metrics::PerformanceMetrics;
pub use selection::{MomentumSelection, Position};
pub use strategy::MomentumStrategy;
