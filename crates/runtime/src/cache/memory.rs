//! In-memory CacheStorage implementation for tests and local runs.

use std::collections::BTreeMap;
use std::sync::RwLock;

use super::error::StorageError;
use super::storage::{CacheStorage, Result, validate_cache_name};
use super::types::CachedResponse;

/// In-memory implementation of CacheStorage.
///
/// Each cache is swapped in whole under the write lock, so readers never
/// observe a partially committed version.
#[derive(Debug, Default)]
pub struct InMemoryCacheStorage {
    caches: RwLock<BTreeMap<String, Vec<CachedResponse>>>,
}

impl InMemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStorage for InMemoryCacheStorage {
    fn cache_names(&self) -> Result<Vec<String>> {
        let caches = self
            .caches
            .read()
            .map_err(|_| StorageError::LockPoisoned)?;
        Ok(caches.keys().cloned().collect())
    }

    fn commit(&self, cache_name: &str, entries: Vec<CachedResponse>) -> Result<()> {
        validate_cache_name(cache_name)?;
        let mut caches = self
            .caches
            .write()
            .map_err(|_| StorageError::LockPoisoned)?;
        caches.insert(cache_name.to_owned(), entries);
        Ok(())
    }

    fn lookup(&self, cache_name: &str, url: &str) -> Result<Option<CachedResponse>> {
        let caches = self
            .caches
            .read()
            .map_err(|_| StorageError::LockPoisoned)?;
        Ok(caches
            .get(cache_name)
            .and_then(|entries| entries.iter().find(|e| e.url == url))
            .cloned())
    }

    fn urls(&self, cache_name: &str) -> Result<Vec<String>> {
        let caches = self
            .caches
            .read()
            .map_err(|_| StorageError::LockPoisoned)?;
        Ok(caches
            .get(cache_name)
            .map(|entries| entries.iter().map(|e| e.url.clone()).collect())
            .unwrap_or_default())
    }

    fn delete(&self, cache_name: &str) -> Result<bool> {
        let mut caches = self
            .caches
            .write()
            .map_err(|_| StorageError::LockPoisoned)?;
        Ok(caches.remove(cache_name).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_lookup_delete() {
        let storage = InMemoryCacheStorage::new();
        storage
            .commit("app-v1", vec![CachedResponse::new("./", 200, "<html>")])
            .unwrap();

        assert_eq!(storage.cache_names().unwrap(), vec!["app-v1".to_string()]);
        assert!(storage.lookup("app-v1", "./").unwrap().is_some());
        assert!(storage.lookup("app-v1", "./missing").unwrap().is_none());
        assert!(storage.lookup("app-v2", "./").unwrap().is_none());

        assert!(storage.delete("app-v1").unwrap());
        assert!(!storage.delete("app-v1").unwrap());
        assert!(storage.cache_names().unwrap().is_empty());
    }

    #[test]
    fn rejects_path_like_names() {
        let storage = InMemoryCacheStorage::new();
        assert!(matches!(
            storage.commit("../escape", Vec::new()),
            Err(StorageError::InvalidCacheName { .. })
        ));
    }
}
