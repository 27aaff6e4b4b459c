//! Platform-specific directories for logs and the offline cache.
//!
//! - Linux: `~/.cache/treehouse` (or `$XDG_CACHE_HOME/treehouse`)
//! - macOS: `~/Library/Caches/treehouse`
//! - Windows: `%LOCALAPPDATA%\treehouse\cache`
//! - Fallback: `/tmp/treehouse`
use std::path::PathBuf;

pub const APP_NAME: &str = "treehouse";

pub fn cache_root() -> PathBuf {
    directories::ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join(APP_NAME))
}

/// Per-session log directories live here.
pub fn log_dir() -> PathBuf {
    cache_root().join("logs")
}

/// Default root of the offline asset cache.
pub fn offline_cache_dir() -> PathBuf {
    cache_root().join("offline")
}
