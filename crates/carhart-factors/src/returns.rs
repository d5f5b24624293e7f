//! Period returns from adjusted closes.

use crate::lag::with_shifted;
use polars::prelude::*;

/// Append `returns`, the simple return of `adjusted_close` since the previous period.
///
/// Null when the symbol has no bar in the previous period.
pub fn simple_returns(data: LazyFrame, period: &str) -> LazyFrame {
    with_shifted(data, period, "adjusted_close", 1, "_prev_close")
        .with_column((col("adjusted_close") / col("_prev_close") - lit(1.0)).alias("returns"))
        .drop(["_prev_close"])
}

/// Append `forward_return`, the simple return realised over the next period.
///
/// Null when the symbol has no bar in the next period.
pub fn forward_returns(data: LazyFrame, period: &str) -> LazyFrame {
    with_shifted(data, period, "adjusted_close", -1, "_next_close")
        .with_column(
            (col("_next_close") / col("adjusted_close") - lit(1.0)).alias("forward_return"),
        )
        .drop(["_next_close"])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lag::{PERIOD, with_period_index};
    use approx::assert_relative_eq;
    use carhart_data::closes_to_frame;
    use chrono::NaiveDate;

    fn frame() -> LazyFrame {
        let dates: Vec<NaiveDate> = (1..=3)
            .map(|m| NaiveDate::from_ymd_opt(2024, m, 1).unwrap())
            .collect();
        let df = closes_to_frame(
            &dates,
            &[("BBB", vec![10.0, 5.0, 10.0]), ("AAA", vec![100.0, 110.0, 99.0])],
        )
        .unwrap();
        with_period_index(df.lazy())
    }

    #[test]
    fn test_simple_returns() {
        let df = simple_returns(frame(), PERIOD).collect().unwrap();
        let returns = df.column("returns").unwrap().f64().unwrap();

        // Sorted by symbol: AAA first.
        assert_eq!(returns.get(0), None);
        assert_relative_eq!(returns.get(1).unwrap(), 0.10, epsilon = 1e-12);
        assert_relative_eq!(returns.get(2).unwrap(), -0.10, epsilon = 1e-12);
        assert_eq!(returns.get(3), None);
        assert_relative_eq!(returns.get(4).unwrap(), -0.5, epsilon = 1e-12);
        assert_relative_eq!(returns.get(5).unwrap(), 1.0, epsilon = 1e-12);
        assert!(df.column("_prev_close").is_err());
    }

    #[test]
    fn test_forward_returns() {
        let df = forward_returns(frame(), PERIOD).collect().unwrap();
        let fwd = df.column("forward_return").unwrap().f64().unwrap();

        assert_relative_eq!(fwd.get(0).unwrap(), 0.10, epsilon = 1e-12);
        assert_relative_eq!(fwd.get(1).unwrap(), -0.10, epsilon = 1e-12);
        assert_eq!(fwd.get(2), None);
        assert_relative_eq!(fwd.get(3).unwrap(), -0.5, epsilon = 1e-12);
        assert_relative_eq!(fwd.get(4).unwrap(), 1.0, epsilon = 1e-12);
        assert_eq!(fwd.get(5), None);
    }
}
