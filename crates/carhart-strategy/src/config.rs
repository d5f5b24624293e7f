//! Strategy configuration.

use crate::error::{Result, StrategyError};
use carhart_factors::MomentumFactorConfig;
use serde::{Deserialize, Serialize};

/// Parameters of the momentum long/short strategy.
///
/// Windows are counted in bars of the quote frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MomentumConfig {
    /// Trailing return window (default: 12)
    pub lookback: usize,
    /// Most recent periods skipped (default: 1)
    pub lag: usize,
    /// Securities per basket (default: 10)
    pub num_stocks: usize,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            lookback: 12,
            lag: 1,
            num_stocks: 10,
        }
    }
}

impl MomentumConfig {
    /// Reject parameters that cannot produce a ranking.
    pub fn validate(&self) -> Result<()> {
        if self.lookback == 0 {
            return Err(StrategyError::InvalidConfig(
                "lookback must be at least one period".to_string(),
            ));
        }
        if self.num_stocks == 0 {
            return Err(StrategyError::InvalidConfig(
                "num_stocks must be at least one".to_string(),
            ));
        }
        Ok(())
    }

    /// Scoring parameters for the momentum factor.
    pub const fn factor_config(&self) -> MomentumFactorConfig {
        MomentumFactorConfig {
            lookback: self.lookback,
            lag: self.lag,
        }
    }
}
