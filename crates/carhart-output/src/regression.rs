//! OLS regression summary.

use crate::format::rule;
use carhart_regression::OlsResults;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Regression results with the labels needed to print a summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionReport {
    /// Heading, e.g. `UMD on Fama-French factors`
    pub title: String,
    /// Dependent variable name
    pub dependent: String,
    /// Fitted model
    pub results: OlsResults,
}

impl RegressionReport {
    /// Create a report.
    pub fn new(title: impl Into<String>, dependent: impl Into<String>, results: OlsResults) -> Self {
        Self {
            title: title.into(),
            dependent: dependent.into(),
            results,
        }
    }

    /// Format as an ASCII table in the layout of a classic OLS summary.
    pub fn to_ascii_table(&self) -> String {
        let r = &self.results;
        let mut output = String::new();

        output.push_str(&format!("\n{}\n", self.title));
        output.push_str(&rule('='));
        output.push_str(&format!(
            "{:<17}{:<23}{:<22}{:>18}\n",
            "Dep. Variable:",
            self.dependent,
            "R-squared:",
            format!("{:.3}", r.r_squared)
        ));
        output.push_str(&format!(
            "{:<17}{:<23}{:<22}{:>18}\n",
            "Model:",
            "OLS",
            "Adj. R-squared:",
            format!("{:.3}", r.adj_r_squared)
        ));
        output.push_str(&format!(
            "{:<17}{:<23}{:<22}{:>18}\n",
            "No. Observations:",
            r.n_obs,
            "F-statistic:",
            format!("{:.3}", r.f_statistic)
        ));
        output.push_str(&format!(
            "{:<17}{:<23}{:<22}{:>18}\n",
            "Df Residuals:",
            r.df_resid,
            "Prob (F-statistic):",
            format!("{:.3e}", r.f_p_value)
        ));
        output.push_str(&format!(
            "{:<17}{:<23}{:<22}{:>18}\n",
            "Df Model:",
            r.names.len().saturating_sub(1),
            "Durbin-Watson:",
            format!("{:.3}", r.durbin_watson)
        ));
        output.push_str(&rule('-'));
        output.push_str(&format!(
            "{:<12}{:>11}{:>11}{:>10}{:>10}{:>13}{:>13}\n",
            "", "coef", "std err", "t", "P>|t|", "[0.025", "0.975]"
        ));
        output.push_str(&rule('-'));

        for (i, name) in r.names.iter().enumerate() {
            let (lo, hi) = r.conf_intervals[i];
            output.push_str(&format!(
                "{:<12}{:>11.4}{:>11.4}{:>10.3}{:>10.3}{:>13.4}{:>13.4}\n",
                name, r.coefficients[i], r.std_errors[i], r.t_values[i], r.p_values[i], lo, hi
            ));
        }

        output.push_str(&rule('='));
        output.push_str(&format!(
            "Residual std. error: {:.4}\n",
            r.residual_std_error
        ));

        output
    }

    /// Format as Markdown.
    pub fn to_markdown(&self) -> String {
        let r = &self.results;
        let mut output = String::new();

        output.push_str(&format!("# {}\n\n", self.title));
        output.push_str(&format!("- **Dependent variable:** {}\n", self.dependent));
        output.push_str(&format!("- **Observations:** {}\n", r.n_obs));
        output.push_str(&format!(
            "- **R-squared:** {:.3} (adjusted {:.3})\n",
            r.r_squared, r.adj_r_squared
        ));
        output.push_str(&format!(
            "- **F-statistic:** {:.3} (p = {:.3e})\n",
            r.f_statistic, r.f_p_value
        ));
        output.push_str(&format!("- **Durbin-Watson:** {:.3}\n\n", r.durbin_watson));

        output.push_str("| Term | Coef | Std Err | t | P>\\|t\\| | 95% CI |\n");
        output.push_str("|------|------|---------|---|--------|--------|\n");
        for (i, name) in r.names.iter().enumerate() {
            let (lo, hi) = r.conf_intervals[i];
            output.push_str(&format!(
                "| {} | {:.4} | {:.4} | {:.3} | {:.3} | [{:.4}, {:.4}] |\n",
                name, r.coefficients[i], r.std_errors[i], r.t_values[i], r.p_values[i], lo, hi
            ));
        }

        output
    }
}

impl fmt::Display for RegressionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_ascii_table())
    }
}
