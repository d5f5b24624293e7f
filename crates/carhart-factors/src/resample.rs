//! Calendar-month resampling of quote frames.

use crate::returns::simple_returns;
use polars::prelude::*;

/// Period key column, `year * 100 + month`.
pub const YYYYMM: &str = "yyyymm";

/// Consecutive month number, `year * 12 + month - 1`.
pub const MONTH_INDEX: &str = "month_index";

/// Last adjusted close of every calendar month, per symbol.
///
/// Output columns: `symbol, yyyymm, month_index, date, adjusted_close`, with
/// `date` the last bar date seen in the month. Sorted by `(symbol, month_index)`.
/// Months without a bar produce no row.
pub fn monthly_closes(data: LazyFrame) -> LazyFrame {
    let year = col("date").dt().year();
    let month = col("date").dt().month();

    data.filter(col("adjusted_close").is_not_null())
        .with_columns([
            (year.clone().cast(DataType::Int32) * lit(100i32)
                + month.clone().cast(DataType::Int32))
            .alias(YYYYMM),
            (year.cast(DataType::Int64) * lit(12i64) + month.cast(DataType::Int64) - lit(1i64))
                .alias(MONTH_INDEX),
        ])
        .sort(["symbol", "date"], Default::default())
        .group_by_stable([col("symbol"), col(YYYYMM), col(MONTH_INDEX)])
        .agg([col("date").last(), col("adjusted_close").last()])
        .sort(["symbol", MONTH_INDEX], Default::default())
}

/// Monthly closes with `returns`, the change since the previous calendar month.
///
/// The return is null when the symbol has no bar in the previous month.
pub fn monthly_returns(data: LazyFrame) -> LazyFrame {
    simple_returns(monthly_closes(data), MONTH_INDEX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use carhart_data::{QuoteBar, bars_to_frame};
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_last_close_of_each_month() {
        let bars = vec![
            QuoteBar::flat("AAA", ymd(2023, 12, 28), 9.0),
            QuoteBar::flat("AAA", ymd(2024, 1, 2), 10.0),
            QuoteBar::flat("AAA", ymd(2024, 1, 31), 11.0),
            QuoteBar::flat("AAA", ymd(2024, 2, 15), 12.0),
            QuoteBar::flat("AAA", ymd(2024, 2, 29), 13.2),
        ];
        let df = bars_to_frame(&bars).unwrap();

        let out = monthly_closes(df.lazy()).collect().unwrap();
        assert_eq!(out.height(), 3);

        let keys: Vec<i32> = out.column(YYYYMM).unwrap().i32().unwrap().into_no_null_iter().collect();
        assert_eq!(keys, vec![202312, 202401, 202402]);

        let index: Vec<i64> = out
            .column(MONTH_INDEX)
            .unwrap()
            .i64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(index, vec![2023 * 12 + 11, 2024 * 12, 2024 * 12 + 1]);

        let closes: Vec<f64> = out
            .column("adjusted_close")
            .unwrap()
            .f64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(closes, vec![9.0, 11.0, 13.2]);
    }

    #[test]
    fn test_monthly_returns_skip_gaps() {
        let bars = vec![
            QuoteBar::flat("AAA", ymd(2024, 1, 31), 10.0),
            QuoteBar::flat("AAA", ymd(2024, 2, 29), 11.0),
            // No March bar.
            QuoteBar::flat("AAA", ymd(2024, 4, 30), 12.0),
            QuoteBar::flat("AAA", ymd(2024, 5, 31), 9.0),
        ];
        let df = bars_to_frame(&bars).unwrap();

        let out = monthly_returns(df.lazy()).collect().unwrap();
        let returns = out.column("returns").unwrap().f64().unwrap();

        assert_eq!(returns.get(0), None);
        assert_relative_eq!(returns.get(1).unwrap(), 0.1, epsilon = 1e-12);
        assert_eq!(returns.get(2), None);
        assert_relative_eq!(returns.get(3).unwrap(), -0.25, epsilon = 1e-12);
    }
}
