//! Conversion between quote bars and long-format polars frames.
//!
//! Every quote frame in the workspace has the columns
//! `symbol, date, open, high, low, close, volume, adjusted_close`.

use crate::error::{DataError, Result};
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Days from 0001-01-01 (CE) to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Column names of a quote frame, in order.
pub const QUOTE_COLUMNS: [&str; 8] = [
    "symbol",
    "date",
    "open",
    "high",
    "low",
    "close",
    "volume",
    "adjusted_close",
];

/// One OHLCV bar for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteBar {
    /// Ticker symbol
    pub symbol: String,
    /// Bar date
    pub date: NaiveDate,
    /// Opening price
    pub open: f64,
    /// High price
    pub high: f64,
    /// Low price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Traded volume
    pub volume: u64,
    /// Close adjusted for splits and dividends
    pub adjusted_close: f64,
}

impl QuoteBar {
    /// Bar where every price field equals `price`. Handy for synthetic series.
    pub fn flat(symbol: impl Into<String>, date: NaiveDate, price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            date,
            open: price,
            high: price,
            low: price,
            close: price,
            volume: 0,
            adjusted_close: price,
        }
    }
}

/// Convert a date to days since the Unix epoch (polars `Date` physical value).
pub fn date_to_epoch_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

/// Convert days since the Unix epoch back to a date.
pub fn epoch_days_to_date(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)?)
}

/// Build a `Date` column from calendar dates.
pub fn date_column(name: &str, dates: &[NaiveDate]) -> Result<Column> {
    let days: Vec<i32> = dates.iter().copied().map(date_to_epoch_days).collect();
    let series = Series::new(name.into(), days).cast(&DataType::Date)?;
    Ok(series.into())
}

/// Read a `Date` column back into calendar dates.
pub fn read_dates(df: &DataFrame, name: &str) -> Result<Vec<Option<NaiveDate>>> {
    let days = df.column(name)?.cast(&DataType::Int32)?;
    Ok(days
        .i32()?
        .into_iter()
        .map(|d| d.and_then(epoch_days_to_date))
        .collect())
}

/// Build a quote frame from bars.
pub fn bars_to_frame(bars: &[QuoteBar]) -> Result<DataFrame> {
    let dates: Vec<NaiveDate> = bars.iter().map(|b| b.date).collect();

    let df = DataFrame::new(vec![
        Series::new(
            "symbol".into(),
            bars.iter().map(|b| b.symbol.as_str()).collect::<Vec<_>>(),
        )
        .into(),
        date_column("date", &dates)?,
        Series::new("open".into(), bars.iter().map(|b| b.open).collect::<Vec<_>>()).into(),
        Series::new("high".into(), bars.iter().map(|b| b.high).collect::<Vec<_>>()).into(),
        Series::new("low".into(), bars.iter().map(|b| b.low).collect::<Vec<_>>()).into(),
        Series::new("close".into(), bars.iter().map(|b| b.close).collect::<Vec<_>>()).into(),
        Series::new(
            "volume".into(),
            bars.iter().map(|b| b.volume).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "adjusted_close".into(),
            bars.iter().map(|b| b.adjusted_close).collect::<Vec<_>>(),
        )
        .into(),
    ])?;

    Ok(df)
}

/// Read bars out of a quote frame. Rows with a missing field are rejected.
pub fn frame_to_bars(df: &DataFrame) -> Result<Vec<QuoteBar>> {
    let symbols = df.column("symbol")?.str()?;
    let dates = read_dates(df, "date")?;
    let opens = df.column("open")?.f64()?;
    let highs = df.column("high")?.f64()?;
    let lows = df.column("low")?.f64()?;
    let closes = df.column("close")?.f64()?;
    let volumes = df.column("volume")?.cast(&DataType::UInt64)?;
    let volumes = volumes.u64()?;
    let adj_closes = df.column("adjusted_close")?.f64()?;

    let missing = |field: &str, row: usize| DataError::Parse(format!("Missing {field} in row {row}"));

    (0..df.height())
        .map(|i| {
            Ok(QuoteBar {
                symbol: symbols.get(i).ok_or_else(|| missing("symbol", i))?.to_string(),
                date: dates[i].ok_or_else(|| missing("date", i))?,
                open: opens.get(i).ok_or_else(|| missing("open", i))?,
                high: highs.get(i).ok_or_else(|| missing("high", i))?,
                low: lows.get(i).ok_or_else(|| missing("low", i))?,
                close: closes.get(i).ok_or_else(|| missing("close", i))?,
                volume: volumes.get(i).ok_or_else(|| missing("volume", i))?,
                adjusted_close: adj_closes
                    .get(i)
                    .ok_or_else(|| missing("adjusted_close", i))?,
            })
        })
        .collect()
}

/// Build a quote frame from per-symbol adjusted close series sharing one date axis.
///
/// `NaN` prices are skipped, which lets tests model late listings and gaps.
pub fn closes_to_frame(dates: &[NaiveDate], closes: &[(&str, Vec<f64>)]) -> Result<DataFrame> {
    let mut bars = Vec::new();
    for (symbol, prices) in closes {
        if prices.len() != dates.len() {
            return Err(DataError::Parse(format!(
                "{symbol}: {} prices for {} dates",
                prices.len(),
                dates.len()
            )));
        }
        for (date, price) in dates.iter().zip(prices) {
            if !price.is_nan() {
                bars.push(QuoteBar::flat(*symbol, *date, *price));
            }
        }
    }
    bars_to_frame(&bars)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_epoch_days() {
        assert_eq!(date_to_epoch_days(ymd(1970, 1, 1)), 0);
        assert_eq!(date_to_epoch_days(ymd(1970, 1, 31)), 30);
        assert_eq!(epoch_days_to_date(-1), Some(ymd(1969, 12, 31)));
        assert_eq!(epoch_days_to_date(19_723), Some(ymd(2024, 1, 1)));
    }

    #[test]
    fn test_bars_frame_schema() {
        let bars = vec![
            QuoteBar::flat("AAPL", ymd(2024, 1, 1), 185.0),
            QuoteBar::flat("AAPL", ymd(2024, 2, 1), 181.5),
        ];
        let df = bars_to_frame(&bars).unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(df.get_column_names(), QUOTE_COLUMNS.to_vec());
        assert_eq!(df.column("date").unwrap().dtype(), &DataType::Date);

        let back = frame_to_bars(&df).unwrap();
        assert_eq!(back, bars);
    }

    #[test]
    fn test_closes_to_frame_skips_nan() {
        let dates = [ymd(2024, 1, 1), ymd(2024, 2, 1), ymd(2024, 3, 1)];
        let df = closes_to_frame(
            &dates,
            &[("AAA", vec![1.0, 2.0, 3.0]), ("BBB", vec![f64::NAN, 5.0, 6.0])],
        )
        .unwrap();
        assert_eq!(df.height(), 5);
    }

    #[test]
    fn test_closes_to_frame_length_mismatch() {
        let dates = [ymd(2024, 1, 1)];
        let result = closes_to_frame(&dates, &[("AAA", vec![1.0, 2.0])]);
        assert!(matches!(result, Err(DataError::Parse(_))));
    }
}
