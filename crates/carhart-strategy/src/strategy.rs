//! Momentum long/short strategy.

use crate::backtest::{BacktestPeriod, BacktestResult};
use crate::config::MomentumConfig;
use crate::error::{Result, StrategyError};
use crate::selection::{Candidate, MomentumSelection, Position, cross_sections, form_baskets};
use carhart_data::Interval;
use carhart_data::bars::read_dates;
use carhart_factors::lag::{PERIOD, with_period_index};
use carhart_factors::{ConfigurableFactor, Factor, MomentumFactor, forward_returns};
use chrono::NaiveDate;
use polars::prelude::*;

/// Ranks securities by trailing return and holds the extremes long and short.
#[derive(Debug)]
pub struct MomentumStrategy {
    config: MomentumConfig,
    factor: MomentumFactor,
}

impl MomentumStrategy {
    /// Create a strategy, rejecting invalid parameters.
    pub fn new(config: MomentumConfig) -> Result<Self> {
        config.validate()?;
        let factor = MomentumFactor::with_config(config.factor_config())?;
        Ok(Self { config, factor })
    }

    /// Strategy parameters.
    pub const fn config(&self) -> &MomentumConfig {
        &self.config
    }

    /// Baskets for the most recent date in `quotes`.
    ///
    /// Only securities with a bar and a complete momentum window on that date
    /// are ranked.
    pub fn select(&self, quotes: LazyFrame) -> Result<MomentumSelection> {
        let as_of = latest_date(&quotes)?;
        let scores = self.factor.compute_scores(quotes)?.collect()?;

        let positions: Vec<Position> = cross_sections(&scores)?
            .remove(&as_of)
            .unwrap_or_default()
            .into_iter()
            .map(|c| c.position)
            .collect();
        let ranked = positions.len();

        tracing::debug!(%as_of, ranked, "ranked latest cross-section");

        let (long, short) = form_baskets(positions, self.config.num_stocks, |p| p)?;

        Ok(MomentumSelection {
            as_of,
            ranked,
            long,
            short,
        })
    }

    /// Rebalance every period and hold each basket until the next bar.
    ///
    /// Periods in which either basket has no realised return are skipped.
    pub fn backtest(&self, quotes: LazyFrame, interval: Interval) -> Result<BacktestResult> {
        let data = forward_returns(with_period_index(quotes), PERIOD);
        let scores = self.factor.compute_scores(data)?.collect()?;

        let mut periods = Vec::new();
        for (date, candidates) in cross_sections(&scores)? {
            if candidates.len() < 2 {
                continue;
            }

            let (long, short) =
                form_baskets(candidates, self.config.num_stocks, |c: &Candidate| &c.position)?;

            let (Some(long_return), Some(short_return)) =
                (basket_return(&long), basket_return(&short))
            else {
                tracing::debug!(%date, "no realised return, skipping period");
                continue;
            };

            periods.push(BacktestPeriod {
                date,
                long: basket_symbols(&long),
                short: basket_symbols(&short),
                long_return,
                short_return,
                spread: long_return - short_return,
            });
        }

        if periods.is_empty() {
            return Err(StrategyError::InsufficientData(
                "no period with ranked securities and realised returns".to_string(),
            ));
        }

        let result = BacktestResult::from_periods(interval, periods);

        tracing::info!(
            periods = result.periods.len(),
            total_return = result.metrics.total_return,
            "momentum backtest complete"
        );

        Ok(result)
    }
}

/// Most recent date of a quote frame.
fn latest_date(quotes: &LazyFrame) -> Result<NaiveDate> {
    let df = quotes.clone().select([col("date").max()]).collect()?;
    read_dates(&df, "date")?
        .first()
        .copied()
        .flatten()
        .ok_or_else(|| StrategyError::InsufficientData("quote frame is empty".to_string()))
}

/// Equal-weighted mean of the realised returns in a basket.
fn basket_return(basket: &[Candidate]) -> Option<f64> {
    let realised: Vec<f64> = basket.iter().filter_map(|c| c.forward_return).collect();
    if realised.is_empty() {
        return None;
    }
    Some(realised.iter().sum::<f64>() / realised.len() as f64)
}

fn basket_symbols(basket: &[Candidate]) -> Vec<String> {
    basket.iter().map(|c| c.position.symbol.clone()).collect()
}
