//! Sampling interval of a price history.

use crate::error::DataError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bar size requested from the quote source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Interval {
    /// One bar per trading day.
    Daily,
    /// One bar per week.
    Weekly,
    /// One bar per calendar month.
    #[default]
    Monthly,
}

impl Interval {
    /// Interval code understood by the Yahoo chart API.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "1d",
            Self::Weekly => "1wk",
            Self::Monthly => "1mo",
        }
    }

    /// Number of bars in a year, used to annualise statistics.
    pub const fn periods_per_year(&self) -> f64 {
        match self {
            Self::Daily => 252.0,
            Self::Weekly => 52.0,
            Self::Monthly => 12.0,
        }
    }

    /// Longest calendar gap, in days, between a range end and its last bar.
    ///
    /// Covers weekends and holidays for daily bars, and bars dated at the
    /// start of their week or month.
    pub const fn max_gap_days(&self) -> i64 {
        match self {
            Self::Daily => 4,
            Self::Weekly => 7,
            Self::Monthly => 31,
        }
    }

    /// Approximate number of bars between two dates (inclusive).
    pub fn expected_periods(&self, start: NaiveDate, end: NaiveDate) -> i64 {
        let days = (end - start).num_days().max(0) as f64;
        let periods = days / 365.25 * self.periods_per_year();
        periods.floor() as i64
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1d" | "daily" | "day" => Ok(Self::Daily),
            "1wk" | "weekly" | "week" => Ok(Self::Weekly),
            "1mo" | "monthly" | "month" => Ok(Self::Monthly),
            other => Err(DataError::InvalidInterval(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1d", Interval::Daily)]
    #[case("1wk", Interval::Weekly)]
    #[case("1mo", Interval::Monthly)]
    #[case(" Monthly ", Interval::Monthly)]
    fn test_parse(#[case] input: &str, #[case] expected: Interval) {
        assert_eq!(input.parse::<Interval>().unwrap(), expected);
    }

    #[test]
    fn test_parse_invalid() {
        let err = "5m".parse::<Interval>().unwrap_err();
        assert!(matches!(err, DataError::InvalidInterval(_)));
    }

    #[test]
    fn test_display_round_trips_yahoo_code() {
        for interval in [Interval::Daily, Interval::Weekly, Interval::Monthly] {
            assert_eq!(interval.to_string().parse::<Interval>().unwrap(), interval);
        }
    }

    #[test]
    fn test_expected_periods() {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
        assert_eq!(Interval::Monthly.expected_periods(start, end), 24);
        assert_eq!(Interval::Daily.expected_periods(start, end), 504);
        assert_eq!(Interval::Weekly.expected_periods(end, start), 0);
    }
}
