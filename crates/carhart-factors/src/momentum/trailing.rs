//! Trailing-Return Momentum Factor
//!
//! Scores each security on its return over a lookback window that ends a few
//! periods before the scoring date, skipping the most recent periods to avoid
//! short-term reversal. Windows are counted in bars of the input frame, so a
//! monthly frame with the defaults gives the classic 12-1 momentum.

use crate::error::{FactorError, Result};
use crate::lag::{PERIOD, with_period_index, with_shifted};
use crate::rank::{is_valid, percentile_rank};
use crate::traits::{ConfigurableFactor, Factor};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Configuration for the trailing momentum factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MomentumFactorConfig {
    /// Lookback window in periods (default: 12)
    pub lookback: usize,
    /// Most recent periods skipped before the window ends (default: 1)
    pub lag: usize,
}

impl Default for MomentumFactorConfig {
    fn default() -> Self {
        Self {
            lookback: 12,
            lag: 1,
        }
    }
}

/// Trailing momentum: `price[t - lag] / price[t - lag - lookback] - 1`.
///
/// Produces `momentum` and `momentum_rank` (percentile rank within the date).
/// Rows without a complete window are dropped.
#[derive(Debug, Default)]
pub struct MomentumFactor {
    config: MomentumFactorConfig,
}

impl Factor for MomentumFactor {
    fn name(&self) -> &str {
        "momentum"
    }

    fn required_columns(&self) -> &[&str] {
        &["symbol", "date", "adjusted_close"]
    }

    fn compute_scores(&self, data: LazyFrame) -> Result<LazyFrame> {
        self.validate(&data)?;

        let lag = self.config.lag as i64;
        let lookback = self.config.lookback as i64;
        tracing::debug!(lookback, lag, "building trailing momentum scores");

        let scored = with_period_index(data);
        let scored = with_shifted(scored, PERIOD, "adjusted_close", lag, "_price_end");
        let scored = with_shifted(
            scored,
            PERIOD,
            "adjusted_close",
            lag + lookback,
            "_price_start",
        );

        let result = scored
            .with_column((col("_price_end") / col("_price_start") - lit(1.0)).alias("momentum"))
            .drop(["_price_end", "_price_start"])
            .filter(is_valid("momentum"))
            .with_column(percentile_rank("momentum", &["date"]).alias("momentum_rank"))
            .sort(["symbol", "date"], Default::default());

        Ok(result)
    }
}

impl ConfigurableFactor for MomentumFactor {
    type Config = MomentumFactorConfig;

    fn with_config(config: Self::Config) -> Result<Self> {
        if config.lookback == 0 {
            return Err(FactorError::InvalidParameter(
                "momentum lookback must be at least one period".to_string(),
            ));
        }
        Ok(Self { config })
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}
