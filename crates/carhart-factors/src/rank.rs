//! Cross-sectional ranking expressions.

use polars::prelude::*;

/// Rows where `column` holds a usable number (not null, not NaN).
pub fn is_valid(column: &str) -> Expr {
    col(column).is_not_null().and(col(column).is_not_nan())
}

/// Percentile rank of `column` within each `by` group.
///
/// Ties receive their average rank, and ranks are divided by the number of
/// non-null observations in the group, so the top observation scores 1.0.
/// Filter invalid rows with [`is_valid`] before applying it.
pub fn percentile_rank(column: &str, by: &[&str]) -> Expr {
    let partition: Vec<Expr> = by.iter().map(|name| col(*name)).collect();
    let options = RankOptions {
        method: RankMethod::Average,
        descending: false,
    };

    (col(column).rank(options, None).cast(DataType::Float64)
        / col(column).count().cast(DataType::Float64))
    .over(partition)
}
