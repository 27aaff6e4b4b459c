//! Storage abstraction for named cache versions.

use super::error::StorageError;
use super::types::CachedResponse;

pub type Result<T> = std::result::Result<T, StorageError>;

/// Persistence for named caches.
///
/// A cache is only ever written as a whole: [`CacheStorage::commit`] must make
/// either every entry visible or none of them.
pub trait CacheStorage: Send + Sync {
    /// Names of every stored cache, sorted.
    fn cache_names(&self) -> Result<Vec<String>>;

    /// Atomically replace the cache `cache_name` with `entries`.
    fn commit(&self, cache_name: &str, entries: Vec<CachedResponse>) -> Result<()>;

    /// Look up `url` in one cache.
    fn lookup(&self, cache_name: &str, url: &str) -> Result<Option<CachedResponse>>;

    /// URLs stored in one cache, in insertion order.
    fn urls(&self, cache_name: &str) -> Result<Vec<String>>;

    /// Delete a cache. Returns `false` if it did not exist.
    fn delete(&self, cache_name: &str) -> Result<bool>;

    fn contains(&self, cache_name: &str) -> Result<bool> {
        Ok(self.cache_names()?.iter().any(|name| name == cache_name))
    }
}

/// Cache names become directory names, so they must be plain path segments.
pub(super) fn validate_cache_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidCacheName {
            name: name.to_owned(),
        })
    }
}
