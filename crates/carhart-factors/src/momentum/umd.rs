//! UMD (up minus down) Momentum Factor
//!
//! Each month, securities are ranked on their 12-1 momentum
//! `close[t-1] / close[t-12] - 1`. The top `percentile` of the cross-section
//! forms the winner portfolio and the bottom `percentile` the loser
//! portfolio. UMD is the equal-weighted winner return minus the loser return
//! over the same month.

use crate::error::{FactorError, Result};
use crate::lag::with_shifted;
use crate::rank::{is_valid, percentile_rank};
use crate::resample::{MONTH_INDEX, YYYYMM, monthly_returns};
use crate::traits::{ConfigurableFactor, Factor};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Months skipped at the recent end of the ranking window.
const SKIP_MONTHS: i64 = 1;

/// Months back to the start of the ranking window.
const WINDOW_MONTHS: i64 = 12;

/// Configuration for the UMD factor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UmdConfig {
    /// Share of the cross-section in each portfolio, in (0, 0.5] (default: 0.3)
    pub percentile: f64,
}

impl Default for UmdConfig {
    fn default() -> Self {
        Self { percentile: 0.3 }
    }
}

/// Winners-minus-losers momentum factor on calendar months.
#[derive(Debug, Default)]
pub struct UmdFactor {
    config: UmdConfig,
}

impl UmdFactor {
    /// Monthly factor returns.
    ///
    /// Columns `yyyymm, winners, losers, umd`, sorted by `yyyymm`. Months in
    /// which either portfolio has no realised return are dropped.
    pub fn factor_returns(&self, data: LazyFrame) -> Result<LazyFrame> {
        let x = self.config.percentile;
        tracing::debug!(percentile = x, "building UMD winner and loser portfolios");
        let ranked = self.compute_scores(data)?;

        let returns = ranked
            .group_by([col(YYYYMM)])
            .agg([
                col("returns")
                    .filter(col("momentum_rank").gt_eq(lit(1.0 - x)))
                    .mean()
                    .alias("winners"),
                col("returns")
                    .filter(col("momentum_rank").lt_eq(lit(x)))
                    .mean()
                    .alias("losers"),
            ])
            .with_column((col("winners") - col("losers")).alias("umd"))
            .filter(is_valid("umd"))
            .sort([YYYYMM], Default::default());

        Ok(returns)
    }
}

impl Factor for UmdFactor {
    fn name(&self) -> &str {
        "umd"
    }

    fn required_columns(&self) -> &[&str] {
        &["symbol", "date", "adjusted_close"]
    }

    /// Ranked monthly panel.
    ///
    /// One row per symbol and month with a valid 12-1 score: the monthly close
    /// columns plus `returns`, `momentum` and `momentum_rank`.
    fn compute_scores(&self, data: LazyFrame) -> Result<LazyFrame> {
        self.validate(&data)?;

        let monthly = monthly_returns(data);
        let monthly = with_shifted(monthly, MONTH_INDEX, "adjusted_close", SKIP_MONTHS, "_close_end");
        let monthly = with_shifted(
            monthly,
            MONTH_INDEX,
            "adjusted_close",
            WINDOW_MONTHS,
            "_close_start",
        );

        let ranked = monthly
            .with_column((col("_close_end") / col("_close_start") - lit(1.0)).alias("momentum"))
            .drop(["_close_end", "_close_start"])
            .filter(is_valid("momentum"))
            .with_column(percentile_rank("momentum", &[YYYYMM]).alias("momentum_rank"))
            .sort(["symbol", MONTH_INDEX], Default::default());

        Ok(ranked)
    }
}

impl ConfigurableFactor for UmdFactor {
    type Config = UmdConfig;

    fn with_config(config: Self::Config) -> Result<Self> {
        let x = config.percentile;
        if !(x > 0.0 && x <= 0.5) {
            return Err(FactorError::InvalidParameter(format!(
                "UMD percentile must lie in (0, 0.5], got {x}"
            )));
        }
        Ok(Self { config })
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use carhart_data::closes_to_frame;
    use chrono::NaiveDate;
    use rstest::rstest;

    /// Flat at 100 for eleven months, then a step and two active months.
    fn panel() -> DataFrame {
        let dates: Vec<NaiveDate> = (0..14u32)
            .map(|i| NaiveDate::from_ymd_opt(2023 + (i / 12) as i32, i % 12 + 1, 28).unwrap())
            .collect();
        let series = |step: f64, m12: f64, m13: f64| {
            let mut prices = vec![100.0; 11];
            prices.extend([step, m12, m13]);
            prices
        };
        closes_to_frame(
            &dates,
            &[
                ("AAA", series(100.0, 110.0, 99.0)),
                ("BBB", series(150.0, 165.0, 198.0)),
                ("CCC", series(120.0, 120.0, 132.0)),
                ("DDD", series(80.0, 76.0, 76.0)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_hand_computed_spread() {
        let factor = UmdFactor::default();
        let out = factor.factor_returns(panel().lazy()).unwrap().collect().unwrap();

        let months: Vec<i32> = out.column(YYYYMM).unwrap().i32().unwrap().into_no_null_iter().collect();
        assert_eq!(months, vec![202401, 202402]);

        let winners = out.column("winners").unwrap().f64().unwrap();
        let losers = out.column("losers").unwrap().f64().unwrap();
        let umd = out.column("umd").unwrap().f64().unwrap();

        // Jan 2024: winners BBB (+10%) and CCC (0%), loser DDD (-5%).
        assert_relative_eq!(winners.get(0).unwrap(), 0.05, epsilon = 1e-12);
        assert_relative_eq!(losers.get(0).unwrap(), -0.05, epsilon = 1e-12);
        assert_relative_eq!(umd.get(0).unwrap(), 0.10, epsilon = 1e-12);

        // Feb 2024: winners BBB (+20%) and CCC (+10%), loser DDD (0%).
        assert_relative_eq!(winners.get(1).unwrap(), 0.15, epsilon = 1e-12);
        assert_relative_eq!(losers.get(1).unwrap(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(umd.get(1).unwrap(), 0.15, epsilon = 1e-12);
    }

    #[test]
    fn test_ranked_panel() {
        let ranked = UmdFactor::default()
            .compute_scores(panel().lazy())
            .unwrap()
            .collect()
            .unwrap();

        assert_eq!(ranked.height(), 8);
        let top = ranked
            .lazy()
            .filter(col(YYYYMM).eq(lit(202401)).and(col("symbol").eq(lit("BBB"))))
            .collect()
            .unwrap();
        let momentum = top.column("momentum").unwrap().f64().unwrap().get(0).unwrap();
        let rank = top.column("momentum_rank").unwrap().f64().unwrap().get(0).unwrap();
        assert_relative_eq!(momentum, 0.5, epsilon = 1e-12);
        assert_relative_eq!(rank, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_side_drops_month() {
        let factor = UmdFactor::with_config(UmdConfig { percentile: 0.01 }).unwrap();
        let out = factor.factor_returns(panel().lazy()).unwrap().collect().unwrap();
        assert_eq!(out.height(), 0);
    }

    #[rstest]
    #[case(0.0)]
    #[case(-0.1)]
    #[case(0.51)]
    #[case(f64::NAN)]
    fn test_percentile_out_of_range(#[case] percentile: f64) {
        let result = UmdFactor::with_config(UmdConfig { percentile });
        assert!(matches!(result, Err(FactorError::InvalidParameter(_))));
    }

    #[rstest]
    #[case(0.1)]
    #[case(0.5)]
    fn test_percentile_in_range(#[case] percentile: f64) {
        assert!(UmdFactor::with_config(UmdConfig { percentile }).is_ok());
    }
}
