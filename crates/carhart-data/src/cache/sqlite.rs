//! SQLite caching layer for quote history.

use crate::bars::{QuoteBar, bars_to_frame, frame_to_bars};
use crate::error::{DataError, Result};
use crate::interval::Interval;
use chrono::{NaiveDate, Utc};
use polars::prelude::*;
use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// SQLite cache for quote history.
#[derive(Debug)]
pub struct SqliteCache {
    conn: Connection,
}

/// Row counts describing the cache contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Total cached bars across all intervals
    pub total_quotes: usize,
    /// Distinct symbols with at least one bar
    pub unique_symbols: usize,
    /// Cached daily bars
    pub daily_quotes: usize,
    /// Cached weekly bars
    pub weekly_quotes: usize,
    /// Cached monthly bars
    pub monthly_quotes: usize,
}

impl SqliteCache {
    /// Create a new SQLite cache.
    ///
    /// # Arguments
    /// * `path` - Path to the SQLite database file
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let cache = Self { conn };
        cache.initialize_schema()?;
        Ok(cache)
    }

    /// Create an in-memory cache (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let cache = Self { conn };
        cache.initialize_schema()?;
        Ok(cache)
    }

    fn initialize_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS quotes (
                symbol TEXT NOT NULL,
                date TEXT NOT NULL,
                interval TEXT NOT NULL,
                open REAL NOT NULL,
                high REAL NOT NULL,
                low REAL NOT NULL,
                close REAL NOT NULL,
                volume INTEGER NOT NULL,
                adjusted_close REAL NOT NULL,
                cached_at TEXT NOT NULL,
                PRIMARY KEY (symbol, date, interval)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_quotes_interval_date ON quotes(interval, date)",
            [],
        )?;

        Ok(())
    }

    /// Check if quotes are cached for a symbol, date range and interval.
    ///
    /// The range counts as cached when at least 70% of the expected bars are
    /// present and the latest cached bar lies within one interval of `end`.
    pub fn has_quotes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        interval: Interval,
    ) -> Result<bool> {
        let (count, latest): (i64, Option<String>) = self.conn.query_row(
            "SELECT COUNT(*), MAX(date) FROM quotes
             WHERE symbol = ?1 AND interval = ?2 AND date >= ?3 AND date <= ?4",
            params![symbol, interval.as_str(), start.to_string(), end.to_string()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let Some(latest) = latest else {
            return Ok(false);
        };
        let latest = latest
            .parse::<NaiveDate>()
            .map_err(|e| DataError::Parse(format!("Invalid cached date {latest}: {e}")))?;

        if (end - latest).num_days() > interval.max_gap_days() {
            tracing::debug!(symbol, %latest, %end, "cached quotes end early");
            return Ok(false);
        }

        let expected = (interval.expected_periods(start, end) as f64 * 0.7) as i64;

        Ok(count > 0 && count >= expected)
    }

    /// Get cached quotes for a symbol, date range and interval.
    pub fn get_quotes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        interval: Interval,
    ) -> Result<DataFrame> {
        let mut stmt = self.conn.prepare(
            "SELECT symbol, date, open, high, low, close, volume, adjusted_close
             FROM quotes
             WHERE symbol = ?1 AND interval = ?2 AND date >= ?3 AND date <= ?4
             ORDER BY date ASC",
        )?;

        let rows = stmt.query_map(
            params![symbol, interval.as_str(), start.to_string(), end.to_string()],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, f64>(2)?,
                    row.get::<_, f64>(3)?,
                    row.get::<_, f64>(4)?,
                    row.get::<_, f64>(5)?,
                    row.get::<_, i64>(6)?,
                    row.get::<_, f64>(7)?,
                ))
            },
        )?;

        let mut bars = Vec::new();
        for row in rows {
            let (symbol, date, open, high, low, close, volume, adjusted_close) = row?;
            let date = date
                .parse::<NaiveDate>()
                .map_err(|e| DataError::Parse(format!("Invalid cached date {date}: {e}")))?;
            bars.push(QuoteBar {
                symbol,
                date,
                open,
                high,
                low,
                close,
                volume: volume.max(0) as u64,
                adjusted_close,
            });
        }

        if bars.is_empty() {
            return Err(DataError::MissingData {
                symbol: symbol.to_string(),
                reason: "No cached data found".to_string(),
            });
        }

        bars_to_frame(&bars)
    }

    /// Store a quote frame in the cache, replacing existing bars.
    pub fn put_quotes(&self, df: &DataFrame, interval: Interval) -> Result<usize> {
        let cached_at = Utc::now().to_rfc3339();
        let bars = frame_to_bars(df)?;

        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO quotes
                 (symbol, date, interval, open, high, low, close, volume, adjusted_close, cached_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;

            for bar in &bars {
                let volume = i64::try_from(bar.volume).unwrap_or(i64::MAX);
                stmt.execute(params![
                    bar.symbol,
                    bar.date.to_string(),
                    interval.as_str(),
                    bar.open,
                    bar.high,
                    bar.low,
                    bar.close,
                    volume,
                    bar.adjusted_close,
                    cached_at
                ])?;
            }
        }
        tx.commit()?;

        Ok(bars.len())
    }

    /// Symbols with cached bars at the given interval.
    pub fn cached_symbols(&self, interval: Interval) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT symbol FROM quotes WHERE interval = ?1 ORDER BY symbol")?;

        let symbols = stmt
            .query_map(params![interval.as_str()], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;

        Ok(symbols)
    }

    /// Remove every cached bar.
    pub fn clear_all(&self) -> Result<()> {
        self.conn.execute("DELETE FROM quotes", [])?;
        Ok(())
    }

    /// Remove every cached bar of one symbol.
    pub fn clear_symbol(&self, symbol: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM quotes WHERE symbol = ?1", params![symbol])?;
        Ok(())
    }

    /// Get cache statistics.
    pub fn get_stats(&self) -> Result<CacheStats> {
        let count = |sql: &str| -> Result<usize> {
            let n: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
            Ok(n.max(0) as usize)
        };
        let count_interval = |interval: Interval| -> Result<usize> {
            let n: i64 = self.conn.query_row(
                "SELECT COUNT(*) FROM quotes WHERE interval = ?1",
                params![interval.as_str()],
                |row| row.get(0),
            )?;
            Ok(n.max(0) as usize)
        };

        Ok(CacheStats {
            total_quotes: count("SELECT COUNT(*) FROM quotes")?,
            unique_symbols: count("SELECT COUNT(DISTINCT symbol) FROM quotes")?,
            daily_quotes: count_interval(Interval::Daily)?,
            weekly_quotes: count_interval(Interval::Weekly)?,
            monthly_quotes: count_interval(Interval::Monthly)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn monthly_bars(symbol: &str, months: u32) -> DataFrame {
        let bars: Vec<QuoteBar> = (1..=months)
            .map(|m| QuoteBar::flat(symbol, ymd(2023, m, 1), 100.0 + m as f64))
            .collect();
        bars_to_frame(&bars).unwrap()
    }

    #[test]
    fn test_cache_initialization() {
        let cache = SqliteCache::in_memory();
        assert!(cache.is_ok());
    }

    #[test]
    fn test_quote_round_trip() {
        let cache = SqliteCache::in_memory().unwrap();
        let df = monthly_bars("AAPL", 12);

        let written = cache.put_quotes(&df, Interval::Monthly).unwrap();
        assert_eq!(written, 12);

        let start = ymd(2023, 1, 1);
        let end = ymd(2023, 12, 31);
        assert!(cache.has_quotes("AAPL", start, end, Interval::Monthly).unwrap());

        let cached = cache
            .get_quotes("AAPL", start, end, Interval::Monthly)
            .unwrap();
        assert_eq!(frame_to_bars(&cached).unwrap(), frame_to_bars(&df).unwrap());
    }

    #[test]
    fn test_intervals_are_kept_apart() {
        let cache = SqliteCache::in_memory().unwrap();
        cache
            .put_quotes(&monthly_bars("MSFT", 6), Interval::Monthly)
            .unwrap();

        let start = ymd(2023, 1, 1);
        let end = ymd(2023, 6, 30);
        assert!(!cache.has_quotes("MSFT", start, end, Interval::Daily).unwrap());
        let result = cache.get_quotes("MSFT", start, end, Interval::Daily);
        assert!(matches!(result, Err(DataError::MissingData { .. })));
    }

    #[test]
    fn test_sparse_range_is_not_cached() {
        let cache = SqliteCache::in_memory().unwrap();
        cache
            .put_quotes(&monthly_bars("XOM", 2), Interval::Monthly)
            .unwrap();

        let start = ymd(2023, 1, 1);
        let end = ymd(2023, 12, 31);
        assert!(!cache.has_quotes("XOM", start, end, Interval::Monthly).unwrap());
    }

    #[test]
    fn test_stale_tail_is_not_cached() {
        let cache = SqliteCache::in_memory().unwrap();
        cache
            .put_quotes(&monthly_bars("AAPL", 9), Interval::Monthly)
            .unwrap();

        let start = ymd(2023, 1, 1);
        assert!(!cache.has_quotes("AAPL", start, ymd(2023, 12, 31), Interval::Monthly).unwrap());
        assert!(cache.has_quotes("AAPL", start, ymd(2023, 9, 30), Interval::Monthly).unwrap());
    }

    #[test]
    fn test_replace_and_clear() {
        let cache = SqliteCache::in_memory().unwrap();
        cache
            .put_quotes(&monthly_bars("AAPL", 3), Interval::Monthly)
            .unwrap();
        cache
            .put_quotes(&monthly_bars("AAPL", 3), Interval::Monthly)
            .unwrap();
        cache
            .put_quotes(&monthly_bars("JPM", 3), Interval::Daily)
            .unwrap();

        let stats = cache.get_stats().unwrap();
        assert_eq!(stats.total_quotes, 6);
        assert_eq!(stats.unique_symbols, 2);
        assert_eq!(stats.monthly_quotes, 3);
        assert_eq!(stats.daily_quotes, 3);
        assert_eq!(stats.weekly_quotes, 0);

        assert_eq!(
            cache.cached_symbols(Interval::Monthly).unwrap(),
            vec!["AAPL".to_string()]
        );

        cache.clear_symbol("AAPL").unwrap();
        assert_eq!(cache.get_stats().unwrap().total_quotes, 3);

        cache.clear_all().unwrap();
        assert_eq!(cache.get_stats().unwrap().total_quotes, 0);
    }
}
