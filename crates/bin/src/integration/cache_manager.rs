//! Location and opening of the quote cache.

use carhart_data::cache::SqliteCache;
use carhart_data::error::DataError;
use std::path::{Path, PathBuf};

/// File name of the cache database.
const CACHE_FILE: &str = "carhart.db";

/// Get the default cache directory path.
///
/// Uses platform-specific cache directories:
/// - Linux: `~/.cache/carhart/`
/// - macOS: `~/Library/Caches/carhart/`
/// - Windows: `%LOCALAPPDATA%\carhart\`
pub(crate) fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("carhart")
}

/// Database path inside `dir`, or inside the default directory.
pub(crate) fn cache_path(dir: Option<&Path>) -> PathBuf {
    dir.map_or_else(default_cache_dir, Path::to_path_buf)
        .join(CACHE_FILE)
}

/// Open the cache, creating the directory if needed.
pub(crate) fn open_cache(dir: Option<&Path>) -> Result<SqliteCache, DataError> {
    let path = cache_path(dir);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    tracing::debug!(path = %path.display(), "opening quote cache");
    SqliteCache::new(&path)
}
