//! Timestamped envelope for exported results.

use crate::export::ExportError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A result tagged with what produced it and when.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Kind of result, e.g. `"momentum"` or `"umd_regression"`.
    pub kind: String,

    /// Report generation timestamp.
    pub timestamp: DateTime<Utc>,

    /// Report contents.
    pub contents: serde_json::Value,
}

impl Report {
    /// Wrap a serialisable result.
    pub fn new<T: Serialize>(kind: impl Into<String>, contents: &T) -> Result<Self, ExportError> {
        Ok(Self {
            kind: kind.into(),
            timestamp: Utc::now(),
            contents: serde_json::to_value(contents)?,
        })
    }
}
