//! Backtest result types.

use crate::metrics::PerformanceMetrics;
use carhart_data::Interval;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One rebalance: baskets formed at `date` and held for one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestPeriod {
    /// Rebalance date
    pub date: NaiveDate,
    /// Long basket symbols, best first
    pub long: Vec<String>,
    /// Short basket symbols, worst first
    pub short: Vec<String>,
    /// Equal-weighted next-period return of the long basket
    pub long_return: f64,
    /// Equal-weighted next-period return of the short basket
    pub short_return: f64,
    /// Long minus short
    pub spread: f64,
}

/// Outcome of a momentum backtest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Bar size of the simulated periods
    pub interval: Interval,
    /// Realised periods in date order
    pub periods: Vec<BacktestPeriod>,
    /// Metrics of the spread returns
    pub metrics: PerformanceMetrics,
}

impl BacktestResult {
    /// Result over realised periods, with metrics of their spreads.
    pub fn from_periods(interval: Interval, periods: Vec<BacktestPeriod>) -> Self {
        let mut result = Self {
            interval,
            periods,
            metrics: PerformanceMetrics::default(),
        };
        result.metrics =
            PerformanceMetrics::from_returns(&result.spreads(), interval.periods_per_year());
        result
    }

    /// Spread return of every period.
    pub fn spreads(&self) -> Vec<f64> {
        self.periods.iter().map(|p| p.spread).collect()
    }

    /// First and last rebalance dates.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.periods.first()?.date, self.periods.last()?.date))
    }
}
