//! Shared number formatting for the text reports.

/// Width of every text report.
pub(crate) const WIDTH: usize = 80;

pub(crate) fn rule(c: char) -> String {
    let mut line = c.to_string().repeat(WIDTH);
    line.push('\n');
    line
}

/// Signed percentage with two decimals, `+12.34%`.
pub(crate) fn signed_pct(x: f64) -> String {
    format!("{:+.2}%", x * 100.0)
}

/// Percentage with one decimal, `56.7%`.
pub(crate) fn pct(x: f64) -> String {
    format!("{:.1}%", x * 100.0)
}
