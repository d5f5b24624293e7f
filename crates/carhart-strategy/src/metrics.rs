//! Performance metrics of a periodic return series.

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Summary statistics of the strategy's period returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Number of return periods
    pub periods: usize,
    /// Compounded return over all periods
    pub total_return: f64,
    /// Geometric annualised return
    pub annualized_return: f64,
    /// Sample standard deviation scaled by the square root of periods per year
    pub annualized_volatility: f64,
    /// Annualised mean over annualised volatility, zero risk-free rate
    pub sharpe_ratio: f64,
    /// Largest peak-to-trough loss of the compounded equity curve, as a positive fraction
    pub max_drawdown: f64,
    /// Share of periods with a positive return
    pub hit_rate: f64,
}

impl PerformanceMetrics {
    /// Compute metrics for returns sampled `periods_per_year` times a year.
    pub fn from_returns(returns: &[f64], periods_per_year: f64) -> Self {
        if returns.is_empty() {
            return Self::default();
        }

        let periods = returns.len();
        let equity = equity_curve(returns);
        let total_return = equity.last().copied().unwrap_or(1.0) - 1.0;

        let years = periods as f64 / periods_per_year;
        let annualized_return = if total_return > -1.0 {
            (1.0 + total_return).powf(1.0 / years) - 1.0
        } else {
            -1.0
        };

        let mean = returns.mean();
        let std_dev = if periods > 1 { returns.std_dev() } else { 0.0 };
        let annualized_volatility = std_dev * periods_per_year.sqrt();

        let sharpe_ratio = if std_dev > 0.0 {
            mean / std_dev * periods_per_year.sqrt()
        } else {
            0.0
        };

        let wins = returns.iter().filter(|r| **r > 0.0).count();

        Self {
            periods,
            total_return,
            annualized_return,
            annualized_volatility,
            sharpe_ratio,
            max_drawdown: max_drawdown(&equity),
            hit_rate: wins as f64 / periods as f64,
        }
    }
}

/// Compounded value of one unit invested, starting at 1.0 before the first return.
pub fn equity_curve(returns: &[f64]) -> Vec<f64> {
    let mut value = 1.0;
    let mut curve = Vec::with_capacity(returns.len() + 1);
    curve.push(value);
    for r in returns {
        value *= 1.0 + r;
        curve.push(value);
    }
    curve
}

fn max_drawdown(equity: &[f64]) -> f64 {
    let mut peak = f64::MIN;
    let mut worst = 0.0_f64;
    for &value in equity {
        peak = peak.max(value);
        if peak > 0.0 {
            worst = worst.max((peak - value) / peak);
        }
    }
    worst
}
