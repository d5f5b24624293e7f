//! Symbol universes.
//!
//! Symbols are stored in Yahoo Finance form: upper case, with share-class
//! dots written as dashes (`BRK.B` becomes `BRK-B`).

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Large-cap S&P 500 constituents, grouped by GICS sector.
const SP500_SYMBOLS: &[&str] = &[
    // Information Technology
    "AAPL", "MSFT", "NVDA", "AVGO", "ORCL", "CSCO", "ACN", "AMD", "IBM", "INTC", "TXN", "QCOM",
    "ADBE", "CRM", "NOW", "ADI", "AMAT", "LRCX", "KLAC", "MU", "INTU", "PANW", "SNPS", "CDNS",
    "ANET", "MSI", "APH",
    // Health Care
    "LLY", "UNH", "JNJ", "ABBV", "MRK", "TMO", "ABT", "DHR", "PFE", "BMY", "AMGN", "GILD", "ISRG",
    "SYK", "BSX", "MDT", "VRTX", "REGN", "ZTS", "CI", "ELV", "HUM", "CVS", "MCK", "HCA", "BDX",
    // Financials
    "BRK.B", "JPM", "V", "MA", "BAC", "WFC", "MS", "GS", "BLK", "C", "AXP", "SCHW", "SPGI", "MCO",
    "ICE", "CME", "PGR", "CB", "MMC", "AON", "TRV", "AIG", "MET", "PRU", "USB", "PNC", "COF",
    "ADP", "PAYX", "FI", "PYPL",
    // Consumer Discretionary
    "AMZN", "TSLA", "HD", "MCD", "NKE", "SBUX", "LOW", "TJX", "BKNG", "CMG", "F", "GM", "TGT",
    "ORLY", "AZO", "ROST", "MAR", "HLT", "YUM", "LULU", "EBAY",
    // Communication Services
    "GOOGL", "GOOG", "META", "NFLX", "DIS", "CMCSA", "T", "VZ", "TMUS", "EA", "CHTR",
    // Industrials
    "CAT", "UNP", "RTX", "HON", "UPS", "BA", "DE", "LMT", "GE", "MMM", "FDX", "NSC", "ETN", "ITW",
    "EMR", "GD", "NOC", "WM", "CSX", "PH", "CTAS", "TT",
    // Consumer Staples
    "WMT", "PG", "COST", "KO", "PEP", "PM", "MO", "CL", "MDLZ", "KHC", "ADM", "GIS", "KMB", "STZ",
    "SYY", "HSY",
    // Energy
    "XOM", "CVX", "COP", "SLB", "EOG", "MPC", "PSX", "VLO", "OXY", "HAL", "KMI", "WMB", "OKE",
    // Utilities
    "NEE", "SO", "DUK", "CEG", "AEP", "EXC", "XEL", "D", "SRE", "PCG", "ED",
    // Real Estate
    "PLD", "AMT", "EQIX", "CCI", "PSA", "SPG", "O", "WELL", "DLR", "VICI",
    // Materials
    "LIN", "APD", "SHW", "FCX", "NEM", "ECL", "DD", "DOW", "PPG", "NUE", "MLM", "VMC",
];

/// An ordered, de-duplicated list of ticker symbols.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolUniverse {
    symbols: Vec<String>,
}

impl SymbolUniverse {
    /// Built-in large-cap S&P 500 universe.
    pub fn sp500() -> Self {
        Self::from_symbols(SP500_SYMBOLS.iter().copied())
    }

    /// Universe of the given symbols, normalised and de-duplicated in order.
    ///
    /// Blank entries are dropped.
    pub fn from_symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let symbols = symbols
            .into_iter()
            .map(|s| normalize(s.as_ref()))
            .filter(|s| !s.is_empty())
            .filter(|s| seen.insert(s.clone()))
            .collect();
        Self { symbols }
    }

    /// Symbols in universe order.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Whether the universe holds `symbol`, compared in normalised form.
    pub fn contains(&self, symbol: &str) -> bool {
        let symbol = normalize(symbol);
        self.symbols.iter().any(|s| *s == symbol)
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether the universe is empty.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl Default for SymbolUniverse {
    fn default() -> Self {
        Self::sp500()
    }
}

fn normalize(symbol: &str) -> String {
    symbol.trim().to_ascii_uppercase().replace('.', "-")
}
