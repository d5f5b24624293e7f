//! Integration tests for the text reports and JSON export.

use carhart_output::{
    BacktestReport, ExportFormat, Exporter, MomentumReport, RegressionReport, Report,
};
use carhart_data::Interval;
use carhart_regression::OlsResults;
use carhart_strategy::{
    BacktestPeriod, BacktestResult, MomentumConfig, MomentumSelection, PerformanceMetrics,
    Position,
};
use chrono::NaiveDate;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn position(symbol: &str, momentum: f64, rank: f64) -> Position {
    Position {
        symbol: symbol.to_string(),
        momentum,
        rank,
    }
}

fn selection() -> MomentumSelection {
    MomentumSelection {
        as_of: ymd(2024, 12, 1),
        ranked: 4,
        long: vec![position("NVDA", 1.2345, 1.0), position("META", 0.6, 0.75)],
        short: vec![position("INTC", -0.55, 0.25), position("PFE", -0.2, 0.5)],
    }
}

fn regression() -> OlsResults {
    OlsResults {
        names: vec!["const".into(), "Mkt-RF".into(), "SMB".into(), "HML".into()],
        coefficients: vec![0.0061, -0.2417, 0.0832, -0.4410],
        std_errors: vec![0.0023, 0.0611, 0.1020, 0.0950],
        t_values: vec![2.652, -3.956, 0.816, -4.642],
        p_values: vec![0.009, 0.0001, 0.416, 0.00001],
        conf_intervals: vec![
            (0.0016, 0.0106),
            (-0.3627, -0.1207),
            (-0.1188, 0.2852),
            (-0.6291, -0.2529),
        ],
        r_squared: 0.312,
        adj_r_squared: 0.295,
        f_statistic: 17.8,
        f_p_value: 1.2e-9,
        residual_std_error: 0.0241,
        durbin_watson: 1.94,
        n_obs: 120,
        df_resid: 116,
    }
}

#[test]
fn test_momentum_report() {
    let report = MomentumReport::new(MomentumConfig::default(), selection());

    let ascii = report.to_ascii_table();
    assert!(ascii.contains("Momentum Selection as of 2024-12-01"));
    assert!(ascii.contains("ranked securities: 4"));
    assert!(ascii.contains("NVDA"));
    assert!(ascii.contains("+123.45%"));
    assert!(ascii.contains("100.0%"));
    assert!(ascii.find("Long").unwrap() < ascii.find("Short").unwrap());
    assert_eq!(report.to_string(), ascii);

    let markdown = report.to_markdown();
    assert!(markdown.starts_with("# Momentum Selection"));
    assert!(markdown.contains("| 1 | INTC | -55.00% | 25.0% |"));
}

#[test]
fn test_backtest_report() {
    let periods = vec![
        BacktestPeriod {
            date: ymd(2024, 1, 1),
            long: vec!["NVDA".into()],
            short: vec!["INTC".into()],
            long_return: 0.05,
            short_return: -0.02,
            spread: 0.07,
        },
        BacktestPeriod {
            date: ymd(2024, 2, 1),
            long: vec!["META".into()],
            short: vec!["PFE".into()],
            long_return: 0.01,
            short_return: 0.03,
            spread: -0.02,
        },
    ];
    let spreads: Vec<f64> = periods.iter().map(|p| p.spread).collect();
    let result = BacktestResult {
        interval: Interval::Monthly,
        periods,
        metrics: PerformanceMetrics::from_returns(&spreads, 12.0),
    };
    let report = BacktestReport::new(MomentumConfig::default(), result);

    let ascii = report.to_ascii_table();
    assert!(ascii.contains("Rebalances: 2024-01-01 to 2024-02-01"));
    assert!(ascii.contains("Periods:                  2"));
    assert!(ascii.contains("Hit Rate:                 50.0%"));
    assert!(ascii.contains("NVDA / INTC"));

    let markdown = report.to_markdown();
    assert!(markdown.contains("| 2024-02-01 | +1.00% | +3.00% | -2.00% |"));
}

#[test]
fn test_regression_report() {
    let report = RegressionReport::new("UMD on Fama-French factors", "UMD", regression());

    let ascii = report.to_ascii_table();
    assert!(ascii.contains("Dep. Variable:"));
    assert!(ascii.contains("P>|t|"));
    assert!(ascii.contains("[0.025"));
    assert!(ascii.contains("Mkt-RF"));
    assert!(ascii.contains("No. Observations:120"));

    let markdown = report.to_markdown();
    assert!(markdown.contains("| HML | -0.4410 |"));
}

#[test]
fn test_json_envelope_round_trip() {
    let report = MomentumReport::new(MomentumConfig::default(), selection());
    let envelope = Report::new("momentum", &report).unwrap();

    let json = envelope.export_to_string(ExportFormat::Json).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed["kind"], "momentum");
    assert_eq!(parsed["contents"]["selection"]["long"][0]["symbol"], "NVDA");
    assert_eq!(parsed["contents"]["config"]["num_stocks"], 10);
}
