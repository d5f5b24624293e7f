//! Error types for regression fitting.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Result type for regression operations.
pub type Result<T> = std::result::Result<T, RegressionError>;

/// Regression errors
#[derive(Debug, Error)]
pub enum RegressionError {
    /// `X'X` is not positive definite
    #[error("Design matrix is singular; regressors are collinear")]
    SingularMatrix,

    /// Fewer observations than parameters plus one
    #[error("Insufficient data: {observations} observations for {parameters} parameters")]
    InsufficientData {
        /// Usable observations
        observations: usize,
        /// Fitted parameters, intercept included
        parameters: usize,
    },

    /// Inputs disagree in shape
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Input contains NaN or infinite values
    #[error("Non-finite value in {0}")]
    NonFinite(String),

    /// Reference distribution could not be built
    #[error("Distribution error: {0}")]
    Distribution(String),

    /// Polars computation error
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}
