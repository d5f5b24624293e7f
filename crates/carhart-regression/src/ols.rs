//! Ordinary Least Squares
//!
//! Fits `y = X b + e` with an intercept column prepended to `X`, solving the
//! normal equations `X'X b = X'y` through a Cholesky factorisation of `X'X`.
//! The same factor gives `(X'X)^-1`, from which the classical (homoskedastic)
//! standard errors follow:
//!
//! se(b) = sqrt(diag(s^2 (X'X)^-1)),  s^2 = e'e / (n - k)

use crate::error::{RegressionError, Result};
use ndarray::{Array1, Array2, Axis, concatenate};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, FisherSnedecor, StudentsT};

/// Name given to the intercept term.
pub const INTERCEPT: &str = "const";

/// Confidence level of the reported coefficient intervals.
const CONFIDENCE: f64 = 0.95;

/// Relative pivot size below which `X'X` is treated as singular.
const PIVOT_TOLERANCE: f64 = 1e-12;

/// OLS estimator with named regressors.
#[derive(Debug, Clone)]
pub struct OlsRegression {
    names: Vec<String>,
}

/// Fitted model and inference statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OlsResults {
    /// Term names, intercept first
    pub names: Vec<String>,
    /// Estimated coefficients
    pub coefficients: Vec<f64>,
    /// Standard errors of the coefficients
    pub std_errors: Vec<f64>,
    /// t statistics
    pub t_values: Vec<f64>,
    /// Two-sided p-values of the t statistics
    pub p_values: Vec<f64>,
    /// 95% confidence intervals
    pub conf_intervals: Vec<(f64, f64)>,
    /// Coefficient of determination
    pub r_squared: f64,
    /// R² adjusted for the number of regressors
    pub adj_r_squared: f64,
    /// F statistic of the regression against the intercept-only model
    pub f_statistic: f64,
    /// p-value of the F statistic
    pub f_p_value: f64,
    /// Residual standard error `s`
    pub residual_std_error: f64,
    /// Durbin-Watson statistic of the residuals
    pub durbin_watson: f64,
    /// Observations used
    pub n_obs: usize,
    /// Residual degrees of freedom, `n - k`
    pub df_resid: usize,
}

impl OlsResults {
    /// Coefficient of a named term.
    pub fn coefficient(&self, name: &str) -> Option<f64> {
        self.index_of(name).map(|i| self.coefficients[i])
    }

    /// p-value of a named term.
    pub fn p_value(&self, name: &str) -> Option<f64> {
        self.index_of(name).map(|i| self.p_values[i])
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}

impl OlsRegression {
    /// Estimator for regressors called `names`, in column order.
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Regressor names, without the intercept.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Fit `y` on the columns of `x` plus an intercept.
    pub fn fit(&self, y: &Array1<f64>, x: &Array2<f64>) -> Result<OlsResults> {
        if x.ncols() != self.names.len() {
            return Err(RegressionError::DimensionMismatch(format!(
                "{} regressor names for {} columns",
                self.names.len(),
                x.ncols()
            )));
        }
        if x.nrows() != y.len() {
            return Err(RegressionError::DimensionMismatch(format!(
                "{} observations of y, {} rows of x",
                y.len(),
                x.nrows()
            )));
        }
        if y.iter().any(|v| !v.is_finite()) {
            return Err(RegressionError::NonFinite("dependent variable".to_string()));
        }
        if x.iter().any(|v| !v.is_finite()) {
            return Err(RegressionError::NonFinite("regressors".to_string()));
        }

        let n = y.len();
        let k = x.ncols() + 1;
        if n <= k {
            return Err(RegressionError::InsufficientData {
                observations: n,
                parameters: k,
            });
        }

        let ones = Array2::<f64>::ones((n, 1));
        let design = concatenate(Axis(1), &[ones.view(), x.view()])
            .map_err(|e| RegressionError::DimensionMismatch(e.to_string()))?;

        let xtx = design.t().dot(&design);
        let xty = design.t().dot(y);

        let l = cholesky(&xtx)?;
        let beta = cholesky_solve(&l, &xty);
        let xtx_inv = cholesky_inverse(&l);

        let residuals = y - &design.dot(&beta);
        let ssr = residuals.dot(&residuals);
        let y_mean = y.sum() / n as f64;
        let sst: f64 = y.iter().map(|v| (v - y_mean).powi(2)).sum();

        let df_resid = n - k;
        let df_model = k - 1;
        let sigma2 = ssr / df_resid as f64;

        let t_dist = StudentsT::new(0.0, 1.0, df_resid as f64)
            .map_err(|e| RegressionError::Distribution(e.to_string()))?;
        let t_crit = t_dist.inverse_cdf(0.5 + CONFIDENCE / 2.0);

        let mut std_errors = Vec::with_capacity(k);
        let mut t_values = Vec::with_capacity(k);
        let mut p_values = Vec::with_capacity(k);
        let mut conf_intervals = Vec::with_capacity(k);
        for (i, b) in beta.iter().enumerate() {
            let se = (sigma2 * xtx_inv[[i, i]]).sqrt();
            let t = b / se;
            std_errors.push(se);
            t_values.push(t);
            p_values.push(2.0 * (1.0 - t_dist.cdf(t.abs())));
            conf_intervals.push((b - t_crit * se, b + t_crit * se));
        }

        let r_squared = 1.0 - ssr / sst;
        let adj_r_squared = 1.0 - (1.0 - r_squared) * (n - 1) as f64 / df_resid as f64;

        let (f_statistic, f_p_value) = if df_model > 0 {
            let f = ((sst - ssr) / df_model as f64) / sigma2;
            let f_dist = FisherSnedecor::new(df_model as f64, df_resid as f64)
                .map_err(|e| RegressionError::Distribution(e.to_string()))?;
            (f, 1.0 - f_dist.cdf(f))
        } else {
            (f64::NAN, f64::NAN)
        };

        let durbin_watson = residuals
            .windows(2)
            .into_iter()
            .map(|w| (w[1] - w[0]).powi(2))
            .sum::<f64>()
            / ssr;

        let mut names = Vec::with_capacity(k);
        names.push(INTERCEPT.to_string());
        names.extend(self.names.iter().cloned());

        tracing::debug!(n, k, r_squared, "fitted OLS");

        Ok(OlsResults {
            names,
            coefficients: beta.to_vec(),
            std_errors,
            t_values,
            p_values,
            conf_intervals,
            r_squared,
            adj_r_squared,
            f_statistic,
            f_p_value,
            residual_std_error: sigma2.sqrt(),
            durbin_watson,
            n_obs: n,
            df_resid,
        })
    }
}

/// Lower-triangular `L` with `A = L L'`.
fn cholesky(a: &Array2<f64>) -> Result<Array2<f64>> {
    let n = a.nrows();
    let mut l = Array2::<f64>::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let mut sum = 0.0;
            for p in 0..j {
                sum += l[[i, p]] * l[[j, p]];
            }

            if i == j {
                let pivot = a[[i, i]] - sum;
                if pivot <= PIVOT_TOLERANCE * a[[i, i]].abs().max(1.0) {
                    return Err(RegressionError::SingularMatrix);
                }
                l[[i, j]] = pivot.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    Ok(l)
}

/// Solve `L L' x = b` by forward then backward substitution.
fn cholesky_solve(l: &Array2<f64>, b: &Array1<f64>) -> Array1<f64> {
    let n = l.nrows();

    let mut z = Array1::<f64>::zeros(n);
    for i in 0..n {
        let sum: f64 = (0..i).map(|j| l[[i, j]] * z[j]).sum();
        z[i] = (b[i] - sum) / l[[i, i]];
    }

    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let sum: f64 = ((i + 1)..n).map(|j| l[[j, i]] * x[j]).sum();
        x[i] = (z[i] - sum) / l[[i, i]];
    }

    x
}

/// `(L L')^-1`, one unit column at a time.
fn cholesky_inverse(l: &Array2<f64>) -> Array2<f64> {
    let n = l.nrows();
    let mut inv = Array2::<f64>::zeros((n, n));
    for c in 0..n {
        let mut unit = Array1::<f64>::zeros(n);
        unit[c] = 1.0;
        inv.column_mut(c).assign(&cholesky_solve(l, &unit));
    }
    inv
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Five-point simple regression worked in most introductory texts.
    fn textbook() -> OlsResults {
        let x = array![[1.0], [2.0], [3.0], [4.0], [5.0]];
        let y = array![2.0, 4.0, 5.0, 4.0, 5.0];
        OlsRegression::new(["x"]).fit(&y, &x).unwrap()
    }

    #[test]
    fn test_textbook_coefficients() {
        let fit = textbook();
        assert_eq!(fit.names, vec!["const", "x"]);
        assert_relative_eq!(fit.coefficients[0], 2.2, epsilon = 1e-10);
        assert_relative_eq!(fit.coefficients[1], 0.6, epsilon = 1e-10);
        assert_eq!(fit.n_obs, 5);
        assert_eq!(fit.df_resid, 3);
    }

    #[test]
    fn test_textbook_inference() {
        let fit = textbook();

        // s^2 = 2.4 / 3, Sxx = 10
        assert_relative_eq!(fit.std_errors[0], 0.88f64.sqrt(), epsilon = 1e-10);
        assert_relative_eq!(fit.std_errors[1], 0.08f64.sqrt(), epsilon = 1e-10);
        assert_relative_eq!(fit.t_values[1], 0.6 / 0.08f64.sqrt(), epsilon = 1e-10);
        assert_relative_eq!(fit.p_values[1], 0.124_027_062_657_554_6, epsilon = 1e-6);

        let t_crit = 3.182_446_305_283_706;
        let (lo, hi) = fit.conf_intervals[1];
        assert_relative_eq!(lo, 0.6 - t_crit * 0.08f64.sqrt(), epsilon = 1e-6);
        assert_relative_eq!(hi, 0.6 + t_crit * 0.08f64.sqrt(), epsilon = 1e-6);

        assert_relative_eq!(fit.r_squared, 0.6, epsilon = 1e-10);
        assert_relative_eq!(fit.adj_r_squared, 1.0 - 0.4 * 4.0 / 3.0, epsilon = 1e-10);
        assert_relative_eq!(fit.f_statistic, 4.5, epsilon = 1e-10);
        // One regressor: F = t^2 and the tests agree.
        assert_relative_eq!(fit.f_p_value, fit.p_values[1], epsilon = 1e-8);
        assert_relative_eq!(fit.residual_std_error, 0.8f64.sqrt(), epsilon = 1e-10);
        assert_relative_eq!(fit.durbin_watson, 4.84 / 2.4, epsilon = 1e-10);
    }

    #[test]
    fn test_recovers_noiseless_coefficients() {
        let mut rng = StdRng::seed_from_u64(42);
        let n = 60;
        let x = Array2::from_shape_fn((n, 3), |_| rng.gen_range(-0.1..0.1));
        let y = x.map_axis(Axis(1), |row| 0.002 + 1.1 * row[0] - 0.4 * row[1] + 0.25 * row[2]);

        let fit = OlsRegression::new(["a", "b", "c"]).fit(&y, &x).unwrap();

        assert_relative_eq!(fit.coefficient("const").unwrap(), 0.002, epsilon = 1e-10);
        assert_relative_eq!(fit.coefficient("a").unwrap(), 1.1, epsilon = 1e-10);
        assert_relative_eq!(fit.coefficient("b").unwrap(), -0.4, epsilon = 1e-10);
        assert_relative_eq!(fit.coefficient("c").unwrap(), 0.25, epsilon = 1e-10);
        assert_relative_eq!(fit.r_squared, 1.0, epsilon = 1e-10);
        assert!(fit.coefficient("missing").is_none());
    }

    #[test]
    fn test_noisy_fit_covers_truth() {
        let mut rng = StdRng::seed_from_u64(7);
        let n = 400;
        let x = Array2::from_shape_fn((n, 2), |_| rng.gen_range(-1.0..1.0));
        let noise = Array1::from_shape_fn(n, |_| rng.gen_range(-0.05..0.05));
        let y = x.map_axis(Axis(1), |row| 0.5 * row[0] - 0.3 * row[1]) + &noise;

        let fit = OlsRegression::new(["a", "b"]).fit(&y, &x).unwrap();

        let (lo, hi) = fit.conf_intervals[1];
        assert!(lo < 0.5 && 0.5 < hi);
        assert!(fit.p_value("a").unwrap() < 1e-6);
        assert!(fit.r_squared > 0.95);
        assert!((1.5..2.5).contains(&fit.durbin_watson));
    }

    #[test]
    fn test_collinear_regressors() {
        let x = array![[1.0, 2.0], [2.0, 4.0], [3.0, 6.0], [4.0, 8.0], [5.0, 10.0]];
        let y = array![1.0, 2.0, 2.5, 4.0, 5.5];
        let result = OlsRegression::new(["a", "b"]).fit(&y, &x);
        assert!(matches!(result, Err(RegressionError::SingularMatrix)));
    }

    #[test]
    fn test_too_few_observations() {
        let x = array![[1.0, 0.5], [2.0, 0.1], [3.0, 0.7]];
        let y = array![1.0, 2.0, 3.0];
        let result = OlsRegression::new(["a", "b"]).fit(&y, &x);
        assert!(matches!(
            result,
            Err(RegressionError::InsufficientData {
                observations: 3,
                parameters: 3
            })
        ));
    }

    #[test]
    fn test_shape_and_value_checks() {
        let x = array![[1.0], [2.0], [3.0]];
        let y = array![1.0, 2.0];
        assert!(matches!(
            OlsRegression::new(["a"]).fit(&y, &x),
            Err(RegressionError::DimensionMismatch(_))
        ));
        assert!(matches!(
            OlsRegression::new(["a", "b"]).fit(&array![1.0, 2.0, 3.0], &x),
            Err(RegressionError::DimensionMismatch(_))
        ));
        assert!(matches!(
            OlsRegression::new(["a"]).fit(&array![1.0, f64::NAN, 3.0], &x),
            Err(RegressionError::NonFinite(_))
        ));
    }
}
