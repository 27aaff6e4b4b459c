//! Install, activation, and cache-first serving.
//!
//! ```text
//! Uninstalled ──install──▶ Installing ──ok──▶ Waiting ──activate──▶ Active
//!      ▲                       │
//!      └──── ensure_installed ─┴──failed──▶ Redundant
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use game_content::CacheManifest;

use super::error::CacheError;
use super::fetch::Fetcher;
use super::storage::CacheStorage;
use super::types::{CacheState, CachedResponse, ResponseSource, ServedResponse};
use crate::events::{CacheEvent, EventBus};

pub type Result<T> = std::result::Result<T, CacheError>;

/// Point-in-time view of the manager and its storage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStatus {
    pub cache_name: String,
    pub state: CacheState,
    /// Every cache version present in storage.
    pub caches: Vec<String>,
    /// Entries stored for the current version.
    pub entries: usize,
    pub clients_claimed: bool,
    pub last_error: Option<String>,
}

struct Lifecycle {
    state: CacheState,
    clients_claimed: bool,
    last_error: Option<String>,
}

/// Owner of the process-wide cache manifest.
pub struct CacheManager {
    manifest: CacheManifest,
    storage: Arc<dyn CacheStorage>,
    fetcher: Arc<dyn Fetcher>,
    event_bus: EventBus,
    skip_waiting: bool,
    lifecycle: RwLock<Lifecycle>,
}

impl CacheManager {
    pub fn new(
        manifest: CacheManifest,
        storage: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        Self {
            manifest,
            storage,
            fetcher,
            event_bus: EventBus::new(),
            skip_waiting: true,
            lifecycle: RwLock::new(Lifecycle {
                state: CacheState::Uninstalled,
                clients_claimed: false,
                last_error: None,
            }),
        }
    }

    /// Publish cache events on a shared bus.
    #[must_use]
    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = event_bus;
        self
    }

    /// Whether a successful install activates immediately (default: on).
    #[must_use]
    pub fn skip_waiting(mut self, skip_waiting: bool) -> Self {
        self.skip_waiting = skip_waiting;
        self
    }

    pub fn manifest(&self) -> &CacheManifest {
        &self.manifest
    }

    pub fn cache_name(&self) -> &str {
        self.manifest.cache_name()
    }

    pub async fn state(&self) -> CacheState {
        self.lifecycle.read().await.state
    }

    /// Run on every app load: adopts a cache committed by an earlier run, or
    /// (re)tries the install when none exists or the last attempt failed.
    pub async fn ensure_installed(&self) -> Result<CacheState> {
        let state = self.state().await;
        if !matches!(state, CacheState::Uninstalled | CacheState::Redundant) {
            return Ok(state);
        }

        if self.storage.contains(self.cache_name())? {
            // An earlier run may have committed without activating.
            debug!("Adopting existing cache {}", self.cache_name());
            self.activate().await?;
            return Ok(CacheState::Active);
        }

        self.install().await?;
        Ok(self.state().await)
    }

    /// Fetch every manifest URL and commit them as one batch.
    ///
    /// Any failed fetch or non-success status aborts the install before
    /// anything is written; caches from earlier versions keep serving.
    pub async fn install(&self) -> Result<()> {
        {
            let mut lifecycle = self.lifecycle.write().await;
            if lifecycle.state == CacheState::Installing {
                return Err(CacheError::InstallInProgress {
                    cache_name: self.cache_name().to_owned(),
                });
            }
            lifecycle.state = CacheState::Installing;
        }

        let urls = self.manifest.urls();
        info!("Installing {} ({} urls)", self.cache_name(), urls.len());
        self.event_bus.publish(CacheEvent::InstallStarted {
            cache_name: self.cache_name().to_owned(),
            urls: urls.len(),
        });

        let mut entries: Vec<CachedResponse> = Vec::with_capacity(urls.len());
        for url in urls {
            let response = match self.fetcher.fetch(url).await {
                Ok(response) => response,
                Err(e) => return Err(self.abort_install(Some(url.as_str()), e.into()).await),
            };
            if !response.is_success() {
                let error = CacheError::BadStatus {
                    url: url.clone(),
                    status: response.status,
                };
                return Err(self.abort_install(Some(url.as_str()), error).await);
            }
            entries.push(response);
        }

        let count = entries.len();
        if let Err(e) = self.storage.commit(self.cache_name(), entries) {
            return Err(self.abort_install(None, e.into()).await);
        }

        {
            let mut lifecycle = self.lifecycle.write().await;
            lifecycle.state = CacheState::Waiting;
            lifecycle.last_error = None;
        }
        info!("Installed {} ({} entries)", self.cache_name(), count);
        self.event_bus.publish(CacheEvent::Installed {
            cache_name: self.cache_name().to_owned(),
            entries: count,
        });

        if self.skip_waiting {
            self.activate().await?;
        }
        Ok(())
    }

    /// Delete every cache not named for the current version, then claim all
    /// clients. Returns the deleted cache names.
    pub async fn activate(&self) -> Result<Vec<String>> {
        let current = self.cache_name();
        let mut deleted = Vec::new();
        for name in self.storage.cache_names()? {
            if name != current && self.storage.delete(&name)? {
                deleted.push(name);
            }
        }

        {
            let mut lifecycle = self.lifecycle.write().await;
            lifecycle.state = CacheState::Active;
            lifecycle.clients_claimed = true;
        }
        info!("Activated {}; deleted {:?}", current, deleted);
        self.event_bus.publish(CacheEvent::Activated {
            cache_name: current.to_owned(),
            deleted: deleted.clone(),
            clients_claimed: true,
        });
        Ok(deleted)
    }

    /// Serve `url` from any cache (current version first), else the network.
    ///
    /// Storage failures degrade to the network; network failures surface.
    pub async fn respond(&self, url: &str) -> Result<ServedResponse> {
        for cache_name in self.search_order() {
            match self.storage.lookup(&cache_name, url) {
                Ok(Some(response)) => {
                    let source = ResponseSource::Cache { cache_name };
                    return Ok(self.served(response, source));
                }
                Ok(None) => {}
                Err(e) => warn!("Cache lookup for {} in {} failed: {}", url, cache_name, e),
            }
        }

        let response = self.fetcher.fetch(url).await?;
        Ok(self.served(response, ResponseSource::Network))
    }

    pub async fn status(&self) -> Result<CacheStatus> {
        let caches = self.storage.cache_names()?;
        let entries = self.storage.urls(self.cache_name())?.len();
        let lifecycle = self.lifecycle.read().await;
        Ok(CacheStatus {
            cache_name: self.cache_name().to_owned(),
            state: lifecycle.state,
            caches,
            entries,
            clients_claimed: lifecycle.clients_claimed,
            last_error: lifecycle.last_error.clone(),
        })
    }

    fn search_order(&self) -> Vec<String> {
        let current = self.cache_name();
        let mut names = match self.storage.cache_names() {
            Ok(names) => names,
            Err(e) => {
                warn!("Listing caches failed: {}", e);
                return Vec::new();
            }
        };
        if let Some(pos) = names.iter().position(|name| name == current) {
            let name = names.remove(pos);
            names.insert(0, name);
        }
        names
    }

    fn served(&self, response: CachedResponse, source: ResponseSource) -> ServedResponse {
        debug!("Served {} from {:?}", response.url, source);
        self.event_bus.publish(CacheEvent::Served {
            url: response.url.clone(),
            source: source.clone(),
        });
        ServedResponse { response, source }
    }

    /// `url` is the failing request; `None` when the commit itself failed.
    async fn abort_install(&self, url: Option<&str>, error: CacheError) -> CacheError {
        match url {
            Some(url) => warn!(
                "Install of {} aborted at {}: {}",
                self.cache_name(),
                url,
                error
            ),
            None => warn!("Install of {} failed to commit: {}", self.cache_name(), error),
        }
        {
            let mut lifecycle = self.lifecycle.write().await;
            lifecycle.state = CacheState::Redundant;
            lifecycle.last_error = Some(error.to_string());
        }
        self.event_bus.publish(CacheEvent::InstallFailed {
            cache_name: self.cache_name().to_owned(),
            url: url.map(str::to_owned),
            error: error.to_string(),
        });
        error
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;

    use super::*;
    use crate::cache::{FetchError, InMemoryCacheStorage, StorageError};
    use crate::events::{Event, Topic};

    struct MapFetcher {
        responses: HashMap<String, u16>,
    }

    #[async_trait]
    impl Fetcher for MapFetcher {
        async fn fetch(&self, url: &str) -> std::result::Result<CachedResponse, FetchError> {
            match self.responses.get(url) {
                Some(status) => Ok(CachedResponse::new(url, *status, url.to_owned())),
                None => Err(FetchError::Transport {
                    url: url.to_owned(),
                    reason: "offline".into(),
                }),
            }
        }
    }

    fn manager(statuses: &[(&str, u16)]) -> CacheManager {
        let manifest = CacheManifest::new("app-v2", ["./", "./index.html"]).unwrap();
        let fetcher = MapFetcher {
            responses: statuses
                .iter()
                .map(|(url, status)| ((*url).to_owned(), *status))
                .collect(),
        };
        CacheManager::new(
            manifest,
            Arc::new(InMemoryCacheStorage::new()),
            Arc::new(fetcher),
        )
    }

    #[tokio::test]
    async fn bad_status_aborts_install() {
        let manager = manager(&[("./", 200), ("./index.html", 404)]);
        let err = manager.install().await.unwrap_err();
        assert!(matches!(err, CacheError::BadStatus { status: 404, .. }));
        assert_eq!(manager.state().await, CacheState::Redundant);
        assert!(manager.status().await.unwrap().caches.is_empty());
    }

    #[tokio::test]
    async fn without_skip_waiting_install_waits() {
        let manager = manager(&[("./", 200), ("./index.html", 200)]).skip_waiting(false);
        manager.install().await.unwrap();
        assert_eq!(manager.state().await, CacheState::Waiting);

        manager.activate().await.unwrap();
        let status = manager.status().await.unwrap();
        assert_eq!(status.state, CacheState::Active);
        assert!(status.clients_claimed);
        assert_eq!(status.entries, 2);
    }

    /// Reads like an empty store; every commit fails.
    struct ReadOnlyStorage;

    impl CacheStorage for ReadOnlyStorage {
        fn cache_names(&self) -> std::result::Result<Vec<String>, StorageError> {
            Ok(Vec::new())
        }

        fn commit(
            &self,
            _cache_name: &str,
            _entries: Vec<CachedResponse>,
        ) -> std::result::Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }

        fn lookup(
            &self,
            _cache_name: &str,
            _url: &str,
        ) -> std::result::Result<Option<CachedResponse>, StorageError> {
            Ok(None)
        }

        fn urls(&self, _cache_name: &str) -> std::result::Result<Vec<String>, StorageError> {
            Ok(Vec::new())
        }

        fn delete(&self, _cache_name: &str) -> std::result::Result<bool, StorageError> {
            Ok(false)
        }
    }

    async fn install_failure(manager: CacheManager) -> CacheEvent {
        let bus = EventBus::new();
        let mut events = bus.subscribe(Topic::Cache);
        let manager = manager.with_event_bus(bus);
        assert!(manager.install().await.is_err());

        loop {
            match events.try_recv() {
                Ok(Event::Cache(event @ CacheEvent::InstallFailed { .. })) => return event,
                Ok(_) => continue,
                Err(e) => panic!("no InstallFailed event: {e}"),
            }
        }
    }

    #[tokio::test]
    async fn failed_fetch_reports_the_url() {
        let event = install_failure(manager(&[("./", 200)])).await;
        assert!(matches!(
            event,
            CacheEvent::InstallFailed { url: Some(url), .. } if url == "./index.html"
        ));
    }

    #[tokio::test]
    async fn failed_commit_reports_no_url() {
        let manifest = CacheManifest::new("app-v2", ["./"]).unwrap();
        let fetcher = MapFetcher {
            responses: HashMap::from([("./".to_owned(), 200)]),
        };
        let manager = CacheManager::new(manifest, Arc::new(ReadOnlyStorage), Arc::new(fetcher));

        let event = install_failure(manager).await;
        assert!(matches!(event, CacheEvent::InstallFailed { url: None, .. }));
    }
}
