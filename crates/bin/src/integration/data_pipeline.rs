//! Data pipeline for fetching universe quotes.
//!
//! Fetches OHLCV bars for every symbol in the universe, serving what it can
//! from the SQLite cache and downloading the rest from Yahoo Finance with
//! bounded concurrency.

use super::cache_manager;
use carhart_data::Interval;
use carhart_data::bars::read_dates;
use carhart_data::cache::SqliteCache;
use carhart_data::error::DataError;
use carhart_data::yahoo::YahooQuoteProvider;
use carhart_output::FetchSummary;
use chrono::{DateTime, NaiveDate, Utc};
use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Error type for data pipeline operations.
#[derive(Debug, thiserror::Error)]
pub(crate) enum DataPipelineError {
    /// Data fetch error from Yahoo or the cache.
    #[error("Data fetch error: {0}")]
    Fetch(#[from] DataError),
    /// Polars DataFrame error.
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    /// Nothing could be loaded for any symbol.
    #[error("No quotes loaded for any of {0} symbols")]
    NoData(usize),
}

/// Configuration for data fetching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct FetchConfig {
    /// Whether to use the cache.
    pub(crate) use_cache: bool,
    /// Whether to force refresh (ignore cached bars, still write new ones).
    pub(crate) force_refresh: bool,
    /// Bar size to request.
    pub(crate) interval: Interval,
    /// Cache directory override.
    pub(crate) cache_dir: Option<PathBuf>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            use_cache: true,
            force_refresh: false,
            interval: Interval::Monthly,
            cache_dir: None,
        }
    }
}

/// Quotes for the whole universe and a summary of how they were obtained.
#[derive(Debug)]
pub(crate) struct UniverseData {
    /// Combined quote frame
    pub(crate) quotes: DataFrame,
    /// What the fetch produced
    pub(crate) summary: FetchSummary,
}

/// Default number of concurrent fetches.
const DEFAULT_CONCURRENCY: usize = 10;

/// Run `log` without corrupting the progress bar.
fn report(progress: Option<&ProgressBar>, log: impl FnOnce()) {
    match progress {
        Some(pb) => pb.suspend(log),
        None => log(),
    }
}

/// Split symbols into frames served from the cache and symbols to download.
fn split_cached(
    cache: Option<&SqliteCache>,
    symbols: &[String],
    start: NaiveDate,
    end: NaiveDate,
    config: &FetchConfig,
) -> (Vec<LazyFrame>, Vec<String>) {
    let Some(cache) = cache.filter(|_| !config.force_refresh) else {
        return (Vec::new(), symbols.to_vec());
    };

    let mut cached = Vec::new();
    let mut missing = Vec::new();

    for symbol in symbols {
        if cache
            .has_quotes(symbol, start, end, config.interval)
            .unwrap_or(false)
            && let Ok(df) = cache.get_quotes(symbol, start, end, config.interval)
        {
            cached.push(df.lazy());
            continue;
        }
        missing.push(symbol.clone());
    }

    (cached, missing)
}

/// Earliest and latest bar dates of a quote frame.
fn date_bounds(quotes: &DataFrame) -> Result<(Option<NaiveDate>, Option<NaiveDate>), DataError> {
    let dates = read_dates(quotes, "date")?;
    let first = dates.iter().flatten().min().copied();
    let last = dates.iter().flatten().max().copied();
    Ok((first, last))
}

/// Fetch quotes for all symbols, with an optional progress bar.
///
/// Cached ranges are served from SQLite unless a refresh is forced; the rest
/// is downloaded at most [`DEFAULT_CONCURRENCY`] symbols at a time and written
/// back to the cache. Symbols that fail are logged and listed in the summary.
pub(crate) async fn fetch_universe_data_with_progress(
    provider: &YahooQuoteProvider,
    symbols: &[String],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    config: &FetchConfig,
    progress: Option<&ProgressBar>,
) -> Result<UniverseData, DataPipelineError> {
    let start_date = start.date_naive();
    let end_date = end.date_naive();
    let interval = config.interval;

    let cache = if config.use_cache {
        match cache_manager::open_cache(config.cache_dir.as_deref()) {
            Ok(cache) => Some(cache),
            Err(e) => {
                report(progress, || {
                    tracing::warn!(error = %e, "quote cache unavailable, fetching everything");
                });
                None
            }
        }
    } else {
        None
    };

    let (mut frames, symbols_to_fetch) =
        split_cached(cache.as_ref(), symbols, start_date, end_date, config);
    let from_cache = frames.len();

    if let Some(pb) = progress {
        pb.set_length(symbols.len() as u64);
        pb.set_position(from_cache as u64);
        if symbols_to_fetch.is_empty() {
            pb.set_message("Loading from cache...");
        } else {
            pb.set_message(format!(
                "Fetching {} symbols ({} concurrent)...",
                symbols_to_fetch.len(),
                DEFAULT_CONCURRENCY
            ));
        }
    }

    tracing::debug!(
        cached = from_cache,
        to_fetch = symbols_to_fetch.len(),
        %interval,
        "resolved cache hits"
    );

    let mut failed = Vec::new();
    let mut downloads = stream::iter(symbols_to_fetch)
        .map(|symbol| async move {
            let result = provider.fetch_quotes(&symbol, start, end, interval).await;
            (symbol, result)
        })
        .buffer_unordered(DEFAULT_CONCURRENCY);

    while let Some((symbol, result)) = downloads.next().await {
        match result {
            Ok(df) => {
                if let Some(cache) = &cache
                    && let Err(e) = cache.put_quotes(&df, interval)
                {
                    report(progress, || {
                        tracing::warn!(%symbol, error = %e, "failed to cache quotes");
                    });
                }
                frames.push(df.lazy());
            }
            Err(e) => {
                report(progress, || {
                    tracing::warn!(%symbol, error = %e, "failed to fetch quotes");
                });
                failed.push(symbol);
            }
        }
        if let Some(pb) = progress {
            pb.inc(1);
        }
    }

    if frames.is_empty() {
        return Err(DataPipelineError::NoData(symbols.len()));
    }

    let fetched = frames.len();
    let quotes = concat(frames, UnionArgs::default())?
        .sort(["symbol", "date"], Default::default())
        .collect()?;
    let (first_date, last_date) = date_bounds(&quotes)?;

    failed.sort();
    let summary = FetchSummary {
        interval: interval.to_string(),
        requested: symbols.len(),
        fetched,
        from_cache,
        failed,
        rows: quotes.height(),
        first_date,
        last_date,
    };

    tracing::info!(
        fetched = summary.fetched,
        from_cache = summary.from_cache,
        failed = summary.failed.len(),
        rows = summary.rows,
        "loaded universe quotes"
    );

    Ok(UniverseData { quotes, summary })
}
