//! Momentum selection and backtest reports.

use crate::format::{pct, rule, signed_pct};
use carhart_strategy::{BacktestResult, MomentumConfig, MomentumSelection, Position};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Latest long and short baskets with the parameters that formed them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentumReport {
    /// Strategy parameters
    pub config: MomentumConfig,
    /// Selected baskets
    pub selection: MomentumSelection,
}

impl MomentumReport {
    /// Create a report.
    pub const fn new(config: MomentumConfig, selection: MomentumSelection) -> Self {
        Self { config, selection }
    }

    /// Format as an ASCII table.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\nMomentum Selection as of {}\n",
            self.selection.as_of
        ));
        output.push_str(&format!(
            "Lookback: {} periods, lag: {}, ranked securities: {}\n",
            self.config.lookback, self.config.lag, self.selection.ranked
        ));
        output.push_str(&rule('='));

        for (title, basket) in [
            ("Long", &self.selection.long),
            ("Short", &self.selection.short),
        ] {
            output.push_str(&format!("\n{title} ({}):\n", basket.len()));
            output.push_str(&rule('-'));
            output.push_str(&format!(
                "{:>4}  {:<10} {:>14} {:>16}\n",
                "#", "Symbol", "Momentum", "Momentum Rank"
            ));
            output.push_str(&rule('-'));
            for (i, position) in basket.iter().enumerate() {
                output.push_str(&ascii_row(i + 1, position));
            }
        }

        output
    }

    /// Format as Markdown.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "# Momentum Selection as of {}\n\n",
            self.selection.as_of
        ));
        output.push_str(&format!(
            "**Lookback:** {} periods, **lag:** {}, **ranked securities:** {}\n\n",
            self.config.lookback, self.config.lag, self.selection.ranked
        ));

        for (title, basket) in [
            ("Long", &self.selection.long),
            ("Short", &self.selection.short),
        ] {
            output.push_str(&format!("## {title}\n\n"));
            output.push_str("| # | Symbol | Momentum | Momentum Rank |\n");
            output.push_str("|---|--------|----------|---------------|\n");
            for (i, p) in basket.iter().enumerate() {
                output.push_str(&format!(
                    "| {} | {} | {} | {} |\n",
                    i + 1,
                    p.symbol,
                    signed_pct(p.momentum),
                    pct(p.rank)
                ));
            }
            output.push('\n');
        }

        output
    }
}

fn ascii_row(n: usize, position: &Position) -> String {
    format!(
        "{:>3}.  {:<10} {:>14} {:>16}\n",
        n,
        position.symbol,
        signed_pct(position.momentum),
        pct(position.rank)
    )
}

impl fmt::Display for MomentumReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_ascii_table())
    }
}

/// Period-by-period momentum backtest with summary metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestReport {
    /// Strategy parameters
    pub config: MomentumConfig,
    /// Backtest outcome
    pub result: BacktestResult,
}

impl BacktestReport {
    /// Create a report.
    pub const fn new(config: MomentumConfig, result: BacktestResult) -> Self {
        Self { config, result }
    }

    /// Format as an ASCII table.
    pub fn to_ascii_table(&self) -> String {
        let m = &self.result.metrics;
        let mut output = String::new();

        output.push_str("\nMomentum Backtest\n");
        output.push_str(&format!(
            "Interval: {}, lookback: {}, lag: {}, basket size: {}\n",
            self.result.interval, self.config.lookback, self.config.lag, self.config.num_stocks
        ));
        if let Some((first, last)) = self.result.date_range() {
            output.push_str(&format!("Rebalances: {first} to {last}\n"));
        }
        output.push_str(&rule('='));

        output.push_str("\nPerformance (long minus short):\n");
        output.push_str(&rule('-'));
        output.push_str(&format!("  Periods:                  {}\n", m.periods));
        output.push_str(&format!("  Total Return:             {}\n", signed_pct(m.total_return)));
        output.push_str(&format!(
            "  Annualized Return:        {}\n",
            signed_pct(m.annualized_return)
        ));
        output.push_str(&format!(
            "  Annualized Volatility:    {:.2}%\n",
            m.annualized_volatility * 100.0
        ));
        output.push_str(&format!("  Sharpe Ratio:             {:.2}\n", m.sharpe_ratio));
        output.push_str(&format!("  Max Drawdown:             {:.2}%\n", m.max_drawdown * 100.0));
        output.push_str(&format!("  Hit Rate:                 {}\n", pct(m.hit_rate)));

        output.push_str("\nPeriods:\n");
        output.push_str(&rule('-'));
        output.push_str(&format!(
            "{:<12} {:>12} {:>12} {:>12}   {}\n",
            "Date", "Long", "Short", "Spread", "Top / Bottom"
        ));
        output.push_str(&rule('-'));
        for p in &self.result.periods {
            output.push_str(&format!(
                "{:<12} {:>12} {:>12} {:>12}   {} / {}\n",
                p.date.to_string(),
                signed_pct(p.long_return),
                signed_pct(p.short_return),
                signed_pct(p.spread),
                p.long.first().map_or("-", String::as_str),
                p.short.first().map_or("-", String::as_str),
            ));
        }

        output
    }

    /// Format as Markdown.
    pub fn to_markdown(&self) -> String {
        let m = &self.result.metrics;
        let mut output = String::from("# Momentum Backtest\n\n");

        output.push_str(&format!(
            "**Interval:** {}, **lookback:** {}, **lag:** {}, **basket size:** {}\n\n",
            self.result.interval, self.config.lookback, self.config.lag, self.config.num_stocks
        ));

        output.push_str("## Performance\n\n");
        output.push_str(&format!("- **Periods:** {}\n", m.periods));
        output.push_str(&format!("- **Total Return:** {}\n", signed_pct(m.total_return)));
        output.push_str(&format!(
            "- **Annualized Return:** {}\n",
            signed_pct(m.annualized_return)
        ));
        output.push_str(&format!(
            "- **Annualized Volatility:** {:.2}%\n",
            m.annualized_volatility * 100.0
        ));
        output.push_str(&format!("- **Sharpe Ratio:** {:.2}\n", m.sharpe_ratio));
        output.push_str(&format!("- **Max Drawdown:** {:.2}%\n", m.max_drawdown * 100.0));
        output.push_str(&format!("- **Hit Rate:** {}\n\n", pct(m.hit_rate)));

        output.push_str("## Periods\n\n");
        output.push_str("| Date | Long | Short | Spread |\n");
        output.push_str("|------|------|-------|--------|\n");
        for p in &self.result.periods {
            output.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                p.date,
                signed_pct(p.long_return),
                signed_pct(p.short_return),
                signed_pct(p.spread)
            ));
        }

        output
    }
}

impl fmt::Display for BacktestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_ascii_table())
    }
}
