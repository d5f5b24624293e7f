//! Fama-French factor regressions.
//!
//! Inputs are monthly frames keyed by `yyyymm`:
//!
//! - factors: `mkt_rf, smb, hml, rf` in decimal units
//! - UMD: `umd`
//! - asset: `returns`

use crate::align::{PERIOD_KEY, column_vector, design_matrix, merge_on_period};
use crate::error::Result;
use crate::ols::{OlsRegression, OlsResults};
use polars::prelude::*;

/// Fama-French three-factor columns and their display names.
const FF3: [(&str, &str); 3] = [("mkt_rf", "Mkt-RF"), ("smb", "SMB"), ("hml", "HML")];

/// `UMD ~ const + Mkt-RF + SMB + HML` over the months both frames cover.
///
/// A significant intercept means momentum earns a return the three factors
/// do not explain.
pub fn umd_regression(umd: &DataFrame, factors: &DataFrame) -> Result<OlsResults> {
    let merged = merge_on_period(
        umd.clone().lazy().select([col(PERIOD_KEY), col("umd")]),
        factors.clone().lazy(),
    )
    .drop_nulls(None)
    .collect()?;

    tracing::debug!(months = merged.height(), "aligned UMD with Fama-French factors");

    let columns: Vec<&str> = FF3.iter().map(|(c, _)| *c).collect();
    let y = column_vector(&merged, "umd")?;
    let x = design_matrix(&merged, &columns)?;

    OlsRegression::new(FF3.iter().map(|(_, name)| *name)).fit(&y, &x)
}

/// Carhart four-factor regression of one security's excess return.
///
/// `(returns - rf) ~ const + Mkt-RF + SMB + HML + UMD`
pub fn four_factor_regression(
    asset: &DataFrame,
    umd: &DataFrame,
    factors: &DataFrame,
) -> Result<OlsResults> {
    let merged = merge_on_period(
        merge_on_period(
            asset.clone().lazy().select([col(PERIOD_KEY), col("returns")]),
            umd.clone().lazy().select([col(PERIOD_KEY), col("umd")]),
        ),
        factors.clone().lazy(),
    )
    .with_column((col("returns") - col("rf")).alias("excess_return"))
    .drop_nulls(None)
    .collect()?;

    tracing::debug!(months = merged.height(), "aligned asset returns with four factors");

    let mut columns: Vec<&str> = FF3.iter().map(|(c, _)| *c).collect();
    columns.push("umd");
    let mut names: Vec<&str> = FF3.iter().map(|(_, n)| *n).collect();
    names.push("UMD");

    let y = column_vector(&merged, "excess_return")?;
    let x = design_matrix(&merged, &columns)?;

    OlsRegression::new(names).fit(&y, &x)
}
