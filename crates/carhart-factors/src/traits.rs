//! Core factor traits.

use crate::error::{FactorError, Result};
use polars::prelude::*;

/// A cross-sectional factor computed from a long-format frame.
pub trait Factor: std::fmt::Debug + Send + Sync {
    /// Unique factor name.
    fn name(&self) -> &str;

    /// Columns the input frame must provide.
    fn required_columns(&self) -> &[&str];

    /// Compute factor scores.
    ///
    /// Implementations keep the input columns and append their own.
    fn compute_scores(&self, data: LazyFrame) -> Result<LazyFrame>;

    /// Check that `data` carries every required column.
    fn validate(&self, data: &LazyFrame) -> Result<()> {
        let schema = data.clone().collect_schema()?;
        match self
            .required_columns()
            .iter()
            .find(|name| !schema.contains(name))
        {
            Some(missing) => Err(FactorError::MissingColumn((*missing).to_string())),
            None => Ok(()),
        }
    }
}

/// A factor built from a configuration struct.
pub trait ConfigurableFactor: Factor + Sized {
    /// Configuration type.
    type Config;

    /// Create the factor, rejecting out-of-range parameters.
    fn with_config(config: Self::Config) -> Result<Self>;

    /// Current configuration.
    fn config(&self) -> &Self::Config;
}
