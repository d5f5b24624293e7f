//! Caching layer for quote history.

pub mod sqlite;

pub use sqlite::{CacheStats, SqliteCache};
