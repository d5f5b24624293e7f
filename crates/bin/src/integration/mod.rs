//! Glue between the command line and the library crates.
//!
//! Quote loading with caching and progress reporting, and the monthly factor
//! inputs the regressions need.

pub(crate) mod cache_manager;
pub(crate) mod data_pipeline;
pub(crate) mod factor_data;
