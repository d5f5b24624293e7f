//! Error types for the momentum strategy.

use carhart_data::DataError;
use carhart_factors::FactorError;
use polars::prelude::PolarsError;
use thiserror::Error;

/// Result type for strategy operations.
pub type Result<T> = std::result::Result<T, StrategyError>;

/// Errors raised while selecting or backtesting positions.
#[derive(Debug, Error)]
pub enum StrategyError {
    /// Momentum scoring failed
    #[error("Factor error: {0}")]
    Factor(#[from] FactorError),

    /// Polars computation error
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    /// Quote frame could not be read
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// Not enough ranked securities to form both baskets
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Strategy parameters are out of range
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}
