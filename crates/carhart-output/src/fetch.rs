//! Summary of a quote download.

use crate::format::rule;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a fetch run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchSummary {
    /// Bar size, e.g. `1mo`
    pub interval: String,
    /// Symbols requested
    pub requested: usize,
    /// Symbols with data
    pub fetched: usize,
    /// Symbols served from the cache
    pub from_cache: usize,
    /// Symbols that failed
    pub failed: Vec<String>,
    /// Bars loaded
    pub rows: usize,
    /// Earliest bar date
    pub first_date: Option<NaiveDate>,
    /// Latest bar date
    pub last_date: Option<NaiveDate>,
}

impl FetchSummary {
    /// Format as an ASCII table.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str("\nFetch Summary\n");
        output.push_str(&rule('='));
        output.push_str(&format!("  Interval:          {}\n", self.interval));
        output.push_str(&format!(
            "  Stocks fetched:    {} of {} ({} from cache)\n",
            self.fetched, self.requested, self.from_cache
        ));
        output.push_str(&format!("  Rows:              {}\n", self.rows));
        output.push_str(&format!("  Date range:        {}\n", self.date_range()));

        if !self.failed.is_empty() {
            output.push_str(&format!(
                "  Failed ({}):        {}\n",
                self.failed.len(),
                self.failed.join(", ")
            ));
        }

        output
    }

    /// Format as Markdown.
    pub fn to_markdown(&self) -> String {
        let mut output = String::from("# Fetch Summary\n\n");
        output.push_str(&format!("- **Interval:** {}\n", self.interval));
        output.push_str(&format!(
            "- **Stocks fetched:** {} of {} ({} from cache)\n",
            self.fetched, self.requested, self.from_cache
        ));
        output.push_str(&format!("- **Rows:** {}\n", self.rows));
        output.push_str(&format!("- **Date range:** {}\n", self.date_range()));
        if !self.failed.is_empty() {
            output.push_str(&format!("- **Failed:** {}\n", self.failed.join(", ")));
        }
        output
    }

    fn date_range(&self) -> String {
        match (self.first_date, self.last_date) {
            (Some(first), Some(last)) => format!("{first} to {last}"),
            _ => "n/a".to_string(),
        }
    }
}

impl fmt::Display for FetchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_ascii_table())
    }
}
