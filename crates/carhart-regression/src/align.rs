//! Alignment of monthly series on their period key.

use crate::error::{RegressionError, Result};
use ndarray::{Array1, Array2};
use polars::prelude::*;

/// Period key shared by every monthly frame.
pub const PERIOD_KEY: &str = "yyyymm";

/// Inner join of two monthly frames on `yyyymm`, sorted by period.
pub fn merge_on_period(left: LazyFrame, right: LazyFrame) -> LazyFrame {
    left.join(
        right,
        [col(PERIOD_KEY)],
        [col(PERIOD_KEY)],
        JoinArgs::new(JoinType::Inner),
    )
    .sort([PERIOD_KEY], Default::default())
}

/// A float column as a vector. Nulls are an error.
pub fn column_vector(df: &DataFrame, name: &str) -> Result<Array1<f64>> {
    let values = df.column(name)?.cast(&DataType::Float64)?;
    let values: Option<Vec<f64>> = values.f64()?.into_iter().collect();
    values
        .map(Array1::from)
        .ok_or_else(|| RegressionError::NonFinite(format!("column {name} has nulls")))
}

/// Float columns stacked into an `n x k` matrix.
pub fn design_matrix(df: &DataFrame, names: &[&str]) -> Result<Array2<f64>> {
    let mut x = Array2::<f64>::zeros((df.height(), names.len()));
    for (j, name) in names.iter().enumerate() {
        x.column_mut(j).assign(&column_vector(df, name)?);
    }
    Ok(x)
}
