//! Monthly factor inputs for the regressions.

use carhart_data::error::DataError;
use carhart_data::french::{FamaFrenchClient, FamaFrenchFactors};
use carhart_factors::resample::YYYYMM;
use carhart_factors::{ConfigurableFactor, FactorError, UmdConfig, UmdFactor, monthly_returns};
use chrono::NaiveDate;
use polars::prelude::*;
use std::path::Path;

/// Fama-French factors from a local CSV, or downloaded from the data library.
pub(crate) async fn load_fama_french(
    ff_file: Option<&Path>,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<FamaFrenchFactors, DataError> {
    let factors = match ff_file {
        Some(path) => {
            tracing::debug!(path = %path.display(), "reading Fama-French factors from file");
            FamaFrenchFactors::from_path(path)?
        }
        None => FamaFrenchClient::new()?.fetch_monthly().await?,
    };

    let window = factors.between(start, end);
    if window.is_empty() {
        return Err(DataError::MissingData {
            symbol: "Fama-French".to_string(),
            reason: format!("no factor months between {start} and {end}"),
        });
    }
    Ok(window)
}

/// Monthly UMD series (`yyyymm, winners, losers, umd`) of a quote panel.
pub(crate) fn umd_returns(quotes: &DataFrame, config: UmdConfig) -> Result<DataFrame, FactorError> {
    let factor = UmdFactor::with_config(config)?;
    Ok(factor.factor_returns(quotes.clone().lazy())?.collect()?)
}

/// Monthly returns (`yyyymm, returns`) of one symbol.
pub(crate) fn asset_returns(quotes: &DataFrame, symbol: &str) -> Result<DataFrame, FactorError> {
    let asset = quotes
        .clone()
        .lazy()
        .filter(col("symbol").eq(lit(symbol)));

    let returns = monthly_returns(asset)
        .filter(col("returns").is_not_null())
        .select([col(YYYYMM), col("returns")])
        .collect()?;

    if returns.height() == 0 {
        return Err(FactorError::InvalidParameter(format!(
            "no monthly returns for {symbol}"
        )));
    }
    Ok(returns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use carhart_data::closes_to_frame;
    use rstest::rstest;

    fn month_ends(months: u32) -> Vec<NaiveDate> {
        (0..months)
            .map(|i| NaiveDate::from_ymd_opt(2023 + (i / 12) as i32, i % 12 + 1, 28).unwrap())
            .collect()
    }

    fn panel() -> DataFrame {
        let dates = month_ends(15);
        let trend = |start: f64, step: f64| -> Vec<f64> {
            (0..15).map(|i| start * (1.0 + step).powi(i)).collect()
        };
        closes_to_frame(
            &dates,
            &[
                ("UP", trend(100.0, 0.02)),
                ("DRIFT", trend(40.0, 0.01)),
                ("FLAT", trend(50.0, 0.0)),
                ("DOWN", trend(80.0, -0.01)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_asset_returns_for_one_symbol() {
        let returns = asset_returns(&panel(), "UP").unwrap();

        // The first month has no prior close.
        assert_eq!(returns.height(), 14);
        assert_eq!(returns.get_column_names(), vec![YYYYMM, "returns"]);

        let values = returns.column("returns").unwrap().f64().unwrap();
        for r in values.into_no_null_iter() {
            assert!((r - 0.02).abs() < 1e-12);
        }
    }

    #[test]
    fn test_asset_returns_unknown_symbol() {
        let result = asset_returns(&panel(), "NOPE");
        assert!(matches!(result, Err(FactorError::InvalidParameter(_))));
    }

    #[test]
    fn test_umd_returns_spread() {
        let umd = umd_returns(&panel(), UmdConfig::default()).unwrap();

        // Twelve months of history are needed before the first score.
        assert_eq!(umd.height(), 3);

        // Winners UP and DRIFT, loser DOWN.
        let spread = umd.column("umd").unwrap().f64().unwrap();
        for value in spread.into_no_null_iter() {
            assert!((value - 0.025).abs() < 1e-12);
        }
    }

    #[rstest]
    #[case(0.0)]
    #[case(0.75)]
    fn test_umd_rejects_bad_percentile(#[case] percentile: f64) {
        let result = umd_returns(&panel(), UmdConfig { percentile });
        assert!(matches!(result, Err(FactorError::InvalidParameter(_))));
    }
}
