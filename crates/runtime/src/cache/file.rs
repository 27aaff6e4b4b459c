//! File-based CacheStorage implementation.

use std::fs;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::error::StorageError;
use super::storage::{CacheStorage, Result, validate_cache_name};
use super::types::CachedResponse;

const INDEX_FILE: &str = "index.json";
const STAGING_PREFIX: &str = ".staging-";
const RETIRED_PREFIX: &str = ".retired-";

/// File-based implementation of CacheStorage.
///
/// # Layout
///
/// ```text
/// root/
/// └── treehouse-games-v16-superwhy/
///     ├── index.json          (url, status, content type, stored_at per entry)
///     └── <sha256(url)>.body  (raw response body)
/// ```
///
/// A commit writes the whole cache into a staging directory and renames it
/// into place, so a crash mid-install never leaves a partial cache visible.
pub struct FileCacheStorage {
    root: PathBuf,
}

#[derive(Serialize, Deserialize)]
struct IndexEntry {
    url: String,
    status: u16,
    content_type: Option<String>,
    stored_at: DateTime<Utc>,
    key: String,
}

impl FileCacheStorage {
    /// Create a new file-based cache storage rooted at `root`.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File name stem for a URL's body.
    pub fn entry_key(url: &str) -> String {
        hex::encode(Sha256::digest(url.as_bytes()))
    }

    fn cache_dir(&self, cache_name: &str) -> PathBuf {
        self.root.join(cache_name)
    }

    fn read_index(&self, cache_name: &str) -> Result<Option<Vec<IndexEntry>>> {
        validate_cache_name(cache_name)?;
        let path = self.cache_dir(cache_name).join(INDEX_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&path)?;
        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}

impl CacheStorage for FileCacheStorage {
    fn cache_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();

        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if let Some(name) = path.file_name().and_then(|s| s.to_str())
                && !name.starts_with('.')
                && path.join(INDEX_FILE).is_file()
            {
                names.push(name.to_owned());
            }
        }

        names.sort_unstable();
        Ok(names)
    }

    fn commit(&self, cache_name: &str, entries: Vec<CachedResponse>) -> Result<()> {
        validate_cache_name(cache_name)?;

        let staging = self.root.join(format!("{STAGING_PREFIX}{cache_name}"));
        if staging.exists() {
            fs::remove_dir_all(&staging)?;
        }
        fs::create_dir_all(&staging)?;

        let mut index = Vec::with_capacity(entries.len());
        for entry in entries {
            let key = Self::entry_key(&entry.url);
            fs::write(staging.join(format!("{key}.body")), &entry.body)?;
            index.push(IndexEntry {
                url: entry.url,
                status: entry.status,
                content_type: entry.content_type,
                stored_at: entry.stored_at,
                key,
            });
        }
        fs::write(staging.join(INDEX_FILE), serde_json::to_vec_pretty(&index)?)?;

        let target = self.cache_dir(cache_name);
        if target.exists() {
            let retired = self.root.join(format!("{RETIRED_PREFIX}{cache_name}"));
            if retired.exists() {
                fs::remove_dir_all(&retired)?;
            }
            swap_in(&staging, &target, &retired)?;
            fs::remove_dir_all(&retired)?;
        } else {
            fs::rename(&staging, &target)?;
        }

        tracing::debug!(
            "Committed cache {} ({} entries) to {}",
            cache_name,
            index.len(),
            target.display()
        );
        Ok(())
    }

    fn lookup(&self, cache_name: &str, url: &str) -> Result<Option<CachedResponse>> {
        let Some(index) = self.read_index(cache_name)? else {
            return Ok(None);
        };
        let Some(entry) = index.into_iter().find(|e| e.url == url) else {
            return Ok(None);
        };

        let body_path = self.cache_dir(cache_name).join(format!("{}.body", entry.key));
        let body = fs::read(&body_path).map_err(|e| {
            StorageError::CorruptedData(format!(
                "missing body for `{}` in {}: {}",
                url, cache_name, e
            ))
        })?;

        Ok(Some(CachedResponse {
            url: entry.url,
            status: entry.status,
            content_type: entry.content_type,
            body: Bytes::from(body),
            stored_at: entry.stored_at,
        }))
    }

    fn urls(&self, cache_name: &str) -> Result<Vec<String>> {
        Ok(self
            .read_index(cache_name)?
            .map(|index| index.into_iter().map(|e| e.url).collect())
            .unwrap_or_default())
    }

    fn delete(&self, cache_name: &str) -> Result<bool> {
        validate_cache_name(cache_name)?;
        let dir = self.cache_dir(cache_name);
        if !dir.exists() {
            return Ok(false);
        }
        fs::remove_dir_all(&dir)?;
        tracing::debug!("Deleted cache {}", cache_name);
        Ok(true)
    }
}

/// Moves `target` aside to `retired` and `staging` into its place.
///
/// If the second rename fails the retired copy is moved back, so the old
/// version stays visible.
fn swap_in(staging: &Path, target: &Path, retired: &Path) -> Result<()> {
    fs::rename(target, retired)?;
    if let Err(e) = fs::rename(staging, target) {
        if let Err(restore) = fs::rename(retired, target) {
            tracing::warn!(
                "Could not restore {} from {}: {}",
                target.display(),
                retired.display(),
                restore
            );
        }
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_then_lookup_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileCacheStorage::new(dir.path()).unwrap();
        storage
            .commit(
                "app-v1",
                vec![
                    CachedResponse::new("./", 200, "<html>").with_content_type("text/html"),
                    CachedResponse::new("./manifest.json", 200, "{}"),
                ],
            )
            .unwrap();

        let reopened = FileCacheStorage::new(dir.path()).unwrap();
        let hit = reopened.lookup("app-v1", "./").unwrap().unwrap();
        assert_eq!(hit.body, Bytes::from_static(b"<html>"));
        assert_eq!(hit.content_type.as_deref(), Some("text/html"));
        assert_eq!(
            reopened.urls("app-v1").unwrap(),
            vec!["./".to_string(), "./manifest.json".to_string()]
        );
    }

    #[test]
    fn recommit_replaces_whole_cache() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileCacheStorage::new(dir.path()).unwrap();
        storage
            .commit("app-v1", vec![CachedResponse::new("./old", 200, "a")])
            .unwrap();
        storage
            .commit("app-v1", vec![CachedResponse::new("./new", 200, "b")])
            .unwrap();

        assert!(storage.lookup("app-v1", "./old").unwrap().is_none());
        assert!(storage.lookup("app-v1", "./new").unwrap().is_some());
        assert_eq!(storage.cache_names().unwrap(), vec!["app-v1".to_string()]);
    }

    #[test]
    fn staging_leftovers_are_not_caches() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".staging-app-v2")).unwrap();
        fs::write(dir.path().join(".staging-app-v2").join(INDEX_FILE), "[]").unwrap();

        let storage = FileCacheStorage::new(dir.path()).unwrap();
        assert!(storage.cache_names().unwrap().is_empty());
        assert!(!storage.delete("app-v2").unwrap());
    }

    #[test]
    fn failed_swap_restores_current_version() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileCacheStorage::new(dir.path()).unwrap();
        storage
            .commit("app-v1", vec![CachedResponse::new("./", 200, "v1")])
            .unwrap();

        let target = dir.path().join("app-v1");
        let retired = dir.path().join(".retired-app-v1");
        let missing_staging = dir.path().join(".staging-app-v1");
        assert!(swap_in(&missing_staging, &target, &retired).is_err());

        assert!(!retired.exists());
        let hit = storage.lookup("app-v1", "./").unwrap().unwrap();
        assert_eq!(hit.body, Bytes::from_static(b"v1"));
    }

    #[test]
    fn entry_keys_are_sha256_hex() {
        let key = FileCacheStorage::entry_key("./");
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
