//! Period-aligned lags and leads on long-format frames.
//!
//! Shifting rows within a symbol misaligns series that skip a period. These
//! helpers look values up by period number instead, so a missing bar yields a
//! null rather than a value from the wrong period.

use polars::prelude::*;

/// Name of the dense period column added by [`with_period_index`].
pub const PERIOD: &str = "period";

/// Append `period`: the dense rank of `date` across the whole frame, from 1.
///
/// Every symbol shares this calendar, like the row index of a wide
/// date-by-symbol table.
pub fn with_period_index(data: LazyFrame) -> LazyFrame {
    let options = RankOptions {
        method: RankMethod::Dense,
        descending: false,
    };
    data.with_column(
        col("date")
            .cast(DataType::Int32)
            .rank(options, None)
            .cast(DataType::Int64)
            .alias(PERIOD),
    )
}

/// Append `alias`: `value` of the same symbol `offset` periods earlier.
///
/// A negative offset looks ahead. `period` must be an `Int64` column.
pub fn with_shifted(
    data: LazyFrame,
    period: &str,
    value: &str,
    offset: i64,
    alias: &str,
) -> LazyFrame {
    let shifted = data.clone().select([
        col("symbol"),
        (col(period) + lit(offset)).cast(DataType::Int64).alias(period),
        col(value).alias(alias),
    ]);

    data.join(
        shifted,
        [col("symbol"), col(period)],
        [col("symbol"), col(period)],
        JoinArgs::new(JoinType::Left),
    )
    .sort(["symbol", period], Default::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use carhart_data::closes_to_frame;
    use chrono::NaiveDate;

    #[test]
    fn test_missing_period_yields_null() {
        let dates: Vec<NaiveDate> = (1..=4)
            .map(|m| NaiveDate::from_ymd_opt(2024, m, 1).unwrap())
            .collect();
        let df = closes_to_frame(
            &dates,
            &[
                ("AAA", vec![1.0, 2.0, 3.0, 4.0]),
                ("BBB", vec![10.0, f64::NAN, 30.0, 40.0]),
            ],
        )
        .unwrap();

        let out = with_shifted(
            with_period_index(df.lazy()),
            PERIOD,
            "adjusted_close",
            1,
            "prev",
        )
        .collect()
        .unwrap();

        let prev: Vec<Option<f64>> = out.column("prev").unwrap().f64().unwrap().into_iter().collect();
        assert_eq!(
            prev,
            vec![None, Some(1.0), Some(2.0), Some(3.0), None, None, Some(30.0)]
        );
    }

    #[test]
    fn test_negative_offset_leads() {
        let dates: Vec<NaiveDate> = (1..=3)
            .map(|m| NaiveDate::from_ymd_opt(2024, m, 1).unwrap())
            .collect();
        let df = closes_to_frame(&dates, &[("AAA", vec![1.0, 2.0, 3.0])]).unwrap();

        let out = with_shifted(
            with_period_index(df.lazy()),
            PERIOD,
            "adjusted_close",
            -1,
            "next",
        )
        .collect()
        .unwrap();

        let next: Vec<Option<f64>> = out.column("next").unwrap().f64().unwrap().into_iter().collect();
        assert_eq!(next, vec![Some(2.0), Some(3.0), None]);
    }
}
