//! Basket formation from a ranked cross-section.

use crate::error::{Result, StrategyError};
use carhart_data::bars::read_dates;
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One security in a basket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Ticker symbol
    pub symbol: String,
    /// Trailing momentum score
    pub momentum: f64,
    /// Percentile rank within the cross-section, in (0, 1]
    pub rank: f64,
}

/// Long and short baskets for one ranking date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentumSelection {
    /// Date of the ranked cross-section
    pub as_of: NaiveDate,
    /// Securities with a valid score on that date
    pub ranked: usize,
    /// Highest-ranked securities, best first
    pub long: Vec<Position>,
    /// Lowest-ranked securities, worst first
    pub short: Vec<Position>,
}

/// A ranked security with the return realised while held.
#[derive(Debug, Clone)]
pub(crate) struct Candidate {
    pub(crate) position: Position,
    pub(crate) forward_return: Option<f64>,
}

/// Split a cross-section into disjoint long and short baskets.
///
/// Orders by rank descending with ties broken by symbol, and caps the basket
/// size at half the cross-section.
pub(crate) fn form_baskets<T, F>(mut ranked: Vec<T>, num_stocks: usize, position: F) -> Result<(Vec<T>, Vec<T>)>
where
    T: Clone,
    F: Fn(&T) -> &Position,
{
    if ranked.len() < 2 {
        return Err(StrategyError::InsufficientData(format!(
            "need at least 2 ranked securities, found {}",
            ranked.len()
        )));
    }

    ranked.sort_by(|a, b| {
        let (a, b) = (position(a), position(b));
        b.rank
            .total_cmp(&a.rank)
            .then_with(|| a.symbol.cmp(&b.symbol))
    });

    let n = num_stocks.min(ranked.len() / 2);
    let long = ranked[..n].to_vec();
    let short = ranked[ranked.len() - n..].iter().rev().cloned().collect();
    Ok((long, short))
}

/// Group scored rows by date.
///
/// Reads `symbol, date, momentum, momentum_rank` and, when present,
/// `forward_return`. Rows missing any of the first four are skipped.
pub(crate) fn cross_sections(df: &DataFrame) -> Result<BTreeMap<NaiveDate, Vec<Candidate>>> {
    let symbols = df.column("symbol")?.str()?;
    let dates = read_dates(df, "date")?;
    let momentum = df.column("momentum")?.f64()?;
    let ranks = df.column("momentum_rank")?.f64()?;
    let forward = match df.column("forward_return") {
        Ok(column) => Some(column.f64()?),
        Err(_) => None,
    };

    let mut sections: BTreeMap<NaiveDate, Vec<Candidate>> = BTreeMap::new();
    for (i, date) in dates.into_iter().enumerate() {
        let (Some(date), Some(symbol), Some(momentum), Some(rank)) =
            (date, symbols.get(i), momentum.get(i), ranks.get(i))
        else {
            continue;
        };

        sections.entry(date).or_default().push(Candidate {
            position: Position {
                symbol: symbol.to_string(),
                momentum,
                rank,
            },
            forward_return: forward
                .and_then(|f| f.get(i))
                .filter(|r| r.is_finite()),
        });
    }

    Ok(sections)
}
