#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/carhart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod bars;
pub mod cache;
pub mod error;
pub mod french;
pub mod interval;
pub mod yahoo;

pub use bars::{QuoteBar, bars_to_frame, closes_to_frame, frame_to_bars};
pub use error::{DataError, Result};
pub use interval::Interval;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
