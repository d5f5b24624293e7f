//! Quote history fetching from Yahoo Finance.

use crate::bars::{QuoteBar, bars_to_frame};
use crate::error::{DataError, Result};
use crate::interval::Interval;
use chrono::{DateTime, Utc};
use polars::prelude::*;
use std::time::Duration;
use tokio::time::sleep;
use yahoo_finance_api as yahoo;

/// Yahoo Finance quote provider with rate limiting.
pub struct YahooQuoteProvider {
    provider: yahoo::YahooConnector,
    rate_limit_delay: Duration,
}

impl std::fmt::Debug for YahooQuoteProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooQuoteProvider")
            .field("rate_limit_delay", &self.rate_limit_delay)
            .finish_non_exhaustive()
    }
}

impl YahooQuoteProvider {
    /// Create a provider with the default rate limit (one request every 250ms).
    pub fn new() -> Result<Self> {
        Self::with_rate_limit(Duration::from_millis(250))
    }

    /// Create a provider with a custom delay after each request.
    pub fn with_rate_limit(rate_limit_delay: Duration) -> Result<Self> {
        Ok(Self {
            provider: yahoo::YahooConnector::new()?,
            rate_limit_delay,
        })
    }

    /// Fetch OHLCV bars for a single symbol.
    ///
    /// # Arguments
    /// * `symbol` - The ticker symbol (e.g., "AAPL")
    /// * `start` - Start of the requested window
    /// * `end` - End of the requested window
    /// * `interval` - Bar size
    ///
    /// # Returns
    /// A quote frame with columns: symbol, date, open, high, low, close, volume, adjusted_close
    pub async fn fetch_quotes(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval: Interval,
    ) -> Result<DataFrame> {
        if start > end {
            return Err(DataError::InvalidDateRange {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }

        if symbol.trim().is_empty() {
            return Err(DataError::InvalidSymbol("Empty symbol".to_string()));
        }

        let start_time = time::OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| DataError::TimeConversion(e.to_string()))?;
        let end_time = time::OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| DataError::TimeConversion(e.to_string()))?;

        tracing::debug!(symbol, %interval, "requesting quote history");
        let response = self
            .provider
            .get_quote_history_interval(symbol, start_time, end_time, interval.as_str())
            .await?;

        let quotes = response
            .quotes()
            .map_err(|e| DataError::YahooApi(e.to_string()))?;

        let bars = quotes
            .iter()
            .map(|q| to_bar(symbol, q))
            .collect::<Result<Vec<_>>>()?;

        if bars.is_empty() {
            return Err(DataError::MissingData {
                symbol: symbol.to_string(),
                reason: "No data returned from Yahoo Finance".to_string(),
            });
        }

        let df = bars_to_frame(&bars)?
            .lazy()
            .sort(["date"], Default::default())
            .collect()?;

        sleep(self.rate_limit_delay).await;

        Ok(df)
    }

    /// Fetch bars for multiple symbols, one after another.
    ///
    /// Symbols that fail are logged and skipped.
    pub async fn fetch_quotes_batch(
        &self,
        symbols: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval: Interval,
    ) -> Result<DataFrame> {
        let mut dfs = Vec::new();

        for symbol in symbols {
            match self.fetch_quotes(symbol, start, end, interval).await {
                Ok(df) => dfs.push(df.lazy()),
                Err(e) => {
                    tracing::warn!(%symbol, error = %e, "failed to fetch quotes");
                    continue;
                }
            }
        }

        if dfs.is_empty() {
            return Err(DataError::MissingData {
                symbol: "batch".to_string(),
                reason: "No data fetched for any symbol".to_string(),
            });
        }

        let combined = concat(dfs, UnionArgs::default())?.collect()?;

        Ok(combined)
    }
}

/// Convert one Yahoo quote to a bar dated by its UTC calendar day.
fn to_bar(symbol: &str, quote: &yahoo::Quote) -> Result<QuoteBar> {
    let timestamp = i64::try_from(quote.timestamp)
        .map_err(|e| DataError::TimeConversion(e.to_string()))?;
    let date = DateTime::<Utc>::from_timestamp(timestamp, 0)
        .ok_or_else(|| DataError::TimeConversion(format!("timestamp {timestamp} out of range")))?
        .date_naive();

    Ok(QuoteBar {
        symbol: symbol.to_string(),
        date,
        open: quote.open,
        high: quote.high,
        low: quote.low,
        close: quote.close,
        volume: quote.volume,
        adjusted_close: quote.adjclose,
    })
}
