//! Yahoo Finance quote history.

pub mod quotes;

pub use quotes::YahooQuoteProvider;
