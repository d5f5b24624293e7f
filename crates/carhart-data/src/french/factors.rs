//! Parsing of the Fama-French research factor table.
//!
//! The data library publishes the three factors as a CSV with a free-text
//! preamble, a monthly block keyed by `YYYYMM` and an annual block keyed by
//! `YYYY`. Values are in percent.

use crate::error::{DataError, Result};
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Sentinel the data library uses for missing observations.
const MISSING_SENTINELS: [f64; 2] = [-99.99, -999.0];

/// One month of Fama-French factor returns, in decimal units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FamaFrenchRow {
    /// Period key, year * 100 + month
    pub yyyymm: i32,
    /// Market excess return (`Mkt-RF`)
    pub mkt_rf: f64,
    /// Small minus big (`SMB`)
    pub smb: f64,
    /// High minus low book-to-market (`HML`)
    pub hml: f64,
    /// One-month T-bill rate (`RF`)
    pub rf: f64,
}

/// Monthly Fama-French three-factor series, sorted by period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FamaFrenchFactors {
    rows: Vec<FamaFrenchRow>,
}

/// Column positions resolved from the header row.
#[derive(Debug, Clone, Copy)]
struct Header {
    mkt_rf: usize,
    smb: usize,
    hml: usize,
    rf: usize,
}

impl Header {
    fn detect(record: &csv::StringRecord) -> Option<Self> {
        let find = |name: &str| {
            record
                .iter()
                .position(|field| field.trim().eq_ignore_ascii_case(name))
        };
        Some(Self {
            mkt_rf: find("Mkt-RF")?,
            smb: find("SMB")?,
            hml: find("HML")?,
            rf: find("RF")?,
        })
    }
}

/// Period key (`year * 100 + month`) of a date.
pub fn period_key(date: NaiveDate) -> i32 {
    date.year() * 100 + date.month() as i32
}

/// Parse a six-digit `YYYYMM` label.
fn parse_period(label: &str) -> Option<i32> {
    let label = label.trim();
    if label.len() != 6 || !label.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let key: i32 = label.parse().ok()?;
    (1..=12).contains(&(key % 100)).then_some(key)
}

impl FamaFrenchFactors {
    /// Build from rows; rows are sorted by period and de-duplicated.
    pub fn from_rows(mut rows: Vec<FamaFrenchRow>) -> Self {
        rows.sort_by_key(|r| r.yyyymm);
        rows.dedup_by_key(|r| r.yyyymm);
        Self { rows }
    }

    /// Parse the monthly block of a research factors CSV.
    ///
    /// Accepts the raw data library file as well as a bare
    /// `,Mkt-RF,SMB,HML,RF` table. Percent values are divided by 100.
    pub fn parse<R: Read>(reader: R) -> Result<Self> {
        let mut csv = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut header: Option<Header> = None;
        let mut rows = Vec::new();

        for (line, record) in csv.records().enumerate() {
            let record = record?;

            let Some(columns) = header else {
                header = Header::detect(&record);
                continue;
            };

            let Some(yyyymm) = record.get(0).and_then(parse_period) else {
                if rows.is_empty() {
                    continue;
                }
                // The annual block starts after the monthly one.
                break;
            };

            let value = |idx: usize, name: &str| -> Result<f64> {
                let raw = record.get(idx).ok_or_else(|| {
                    DataError::Parse(format!("line {}: missing {name}", line + 1))
                })?;
                raw.parse::<f64>().map_err(|e| {
                    DataError::Parse(format!("line {}: invalid {name} '{raw}': {e}", line + 1))
                })
            };

            let values = [
                value(columns.mkt_rf, "Mkt-RF")?,
                value(columns.smb, "SMB")?,
                value(columns.hml, "HML")?,
                value(columns.rf, "RF")?,
            ];

            if values.iter().any(|v| MISSING_SENTINELS.contains(v)) {
                tracing::warn!(yyyymm, "skipping month with missing factor values");
                continue;
            }

            rows.push(FamaFrenchRow {
                yyyymm,
                mkt_rf: values[0] / 100.0,
                smb: values[1] / 100.0,
                hml: values[2] / 100.0,
                rf: values[3] / 100.0,
            });
        }

        if header.is_none() {
            return Err(DataError::Parse(
                "no Mkt-RF/SMB/HML/RF header found in factor file".to_string(),
            ));
        }
        if rows.is_empty() {
            return Err(DataError::MissingData {
                symbol: "Fama-French".to_string(),
                reason: "factor file has no monthly observations".to_string(),
            });
        }

        Ok(Self::from_rows(rows))
    }

    /// Parse a factor CSV from disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::parse(file)
    }

    /// Months whose period lies between the months of `start` and `end`, inclusive.
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> Self {
        let (lo, hi) = (period_key(start), period_key(end));
        Self {
            rows: self
                .rows
                .iter()
                .filter(|r| r.yyyymm >= lo && r.yyyymm <= hi)
                .copied()
                .collect(),
        }
    }

    /// All rows, sorted by period.
    pub fn rows(&self) -> &[FamaFrenchRow] {
        &self.rows
    }

    /// Number of months.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no months.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Frame with columns `yyyymm, mkt_rf, smb, hml, rf`.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let df = DataFrame::new(vec![
            Series::new(
                "yyyymm".into(),
                self.rows.iter().map(|r| r.yyyymm).collect::<Vec<_>>(),
            )
            .into(),
            Series::new(
                "mkt_rf".into(),
                self.rows.iter().map(|r| r.mkt_rf).collect::<Vec<_>>(),
            )
            .into(),
            Series::new(
                "smb".into(),
                self.rows.iter().map(|r| r.smb).collect::<Vec<_>>(),
            )
            .into(),
            Series::new(
                "hml".into(),
                self.rows.iter().map(|r| r.hml).collect::<Vec<_>>(),
            )
            .into(),
            Series::new(
                "rf".into(),
                self.rows.iter().map(|r| r.rf).collect::<Vec<_>>(),
            )
            .into(),
        ])?;
        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const LIBRARY_FILE: &str = "This file was created by CMPT_ME_BEME_RETS using the 202312 CRSP database.
The 1-month TBill return is from Ibbotson and Associates Inc.

,Mkt-RF,SMB,HML,RF
202310,   -5.19,   -3.88,    0.19,    0.47
202311,    8.84,   -0.12,    1.66,    0.44
202312,    4.87,    6.34,    4.93,    0.43

 Annual Factors: January-December
,Mkt-RF,SMB,HML,RF
  2023,   21.69,   -3.59,  -13.52,    5.09

Copyright 2024 Kenneth R. French
";

    #[test]
    fn test_parse_library_file() {
        let factors = FamaFrenchFactors::parse(LIBRARY_FILE.as_bytes()).unwrap();

        assert_eq!(factors.len(), 3);
        let first = factors.rows()[0];
        assert_eq!(first.yyyymm, 202310);
        assert_relative_eq!(first.mkt_rf, -0.0519, epsilon = 1e-12);
        assert_relative_eq!(first.smb, -0.0388, epsilon = 1e-12);
        assert_relative_eq!(first.hml, 0.0019, epsilon = 1e-12);
        assert_relative_eq!(first.rf, 0.0047, epsilon = 1e-12);
        assert_eq!(factors.rows()[2].yyyymm, 202312);
    }

    #[test]
    fn test_parse_bare_table_with_reordered_columns() {
        let data = "Date,RF,Mkt-RF,HML,SMB\n202402,0.42,5.06,-3.49,-0.78\n202401,0.47,0.71,-2.38,-5.09\n";
        let factors = FamaFrenchFactors::parse(data.as_bytes()).unwrap();

        assert_eq!(factors.len(), 2);
        // Sorted by period regardless of input order.
        assert_eq!(factors.rows()[0].yyyymm, 202401);
        assert_relative_eq!(factors.rows()[0].rf, 0.0047, epsilon = 1e-12);
        assert_relative_eq!(factors.rows()[1].smb, -0.0078, epsilon = 1e-12);
    }

    #[test]
    fn test_missing_sentinel_rows_are_skipped() {
        let data = ",Mkt-RF,SMB,HML,RF\n202401,1.0,1.0,-99.99,0.4\n202402,2.0,1.0,1.0,0.4\n";
        let factors = FamaFrenchFactors::parse(data.as_bytes()).unwrap();
        assert_eq!(factors.len(), 1);
        assert_eq!(factors.rows()[0].yyyymm, 202402);
    }

    #[test]
    fn test_missing_header_is_an_error() {
        let result = FamaFrenchFactors::parse("202401,1,2,3,4\n".as_bytes());
        assert!(matches!(result, Err(DataError::Parse(_))));
    }

    #[test]
    fn test_invalid_value_is_an_error() {
        let data = ",Mkt-RF,SMB,HML,RF\n202401,abc,1.0,1.0,0.4\n";
        let result = FamaFrenchFactors::parse(data.as_bytes());
        assert!(matches!(result, Err(DataError::Parse(_))));
    }

    #[test]
    fn test_between_and_frame() {
        let factors = FamaFrenchFactors::parse(LIBRARY_FILE.as_bytes()).unwrap();
        let start = NaiveDate::from_ymd_opt(2023, 11, 15).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();

        let window = factors.between(start, end);
        assert_eq!(window.len(), 2);

        let df = window.to_frame().unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(
            df.get_column_names(),
            vec!["yyyymm", "mkt_rf", "smb", "hml", "rf"]
        );
    }

    #[test]
    fn test_period_labels() {
        assert_eq!(parse_period("202312"), Some(202312));
        assert_eq!(parse_period(" 192607 "), Some(192607));
        assert_eq!(parse_period("202313"), None);
        assert_eq!(parse_period("2023"), None);
        assert_eq!(parse_period("Annual"), None);
    }
}
