//! Error types for factor computation.

use thiserror::Error;

/// Result type for factor computation.
pub type Result<T> = std::result::Result<T, FactorError>;

/// Errors that can occur while computing factors.
#[derive(Debug, Error)]
pub enum FactorError {
    /// Polars computation error
    #[error("Computation error: {0}")]
    Computation(#[from] polars::prelude::PolarsError),

    /// Input frame lacks a required column
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Factor configuration is out of range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
