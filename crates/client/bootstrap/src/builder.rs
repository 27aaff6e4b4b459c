//! Builds the arcade, offline cache manager, and config bundle used by front-ends.
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use game_content::{CacheManifest, ContentFactory, Library, ManifestLoader};
use game_core::EngineConfig;
use runtime::{
    Arcade, ArcadeConfig, CacheManager, EventBus, FeedbackEngine, Fetcher, FileCacheStorage,
    SilentFeedback,
};

use crate::config::ClientConfig;
use crate::paths;

/// Builder that assembles the arcade, cache manager, and configuration for clients.
pub struct ClientBuilder {
    config: ClientConfig,
    feedback: Arc<dyn FeedbackEngine>,
    fetcher: Option<Arc<dyn Fetcher>>,
}

impl ClientBuilder {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            feedback: Arc::new(SilentFeedback),
            fetcher: None,
        }
    }

    /// Provide the audio/speech backend (default: silent).
    pub fn feedback(mut self, feedback: Arc<dyn FeedbackEngine>) -> Self {
        self.feedback = feedback;
        self
    }

    /// Provide a custom network fetcher (default: HTTP against the asset base URL).
    pub fn fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Content library, from the content directory when one is configured.
    pub fn load_library(&self) -> Result<Library> {
        match self.content_factory() {
            Some(factory) => factory.load_library().with_context(|| {
                format!(
                    "Failed to load content from {}",
                    factory.data_dir().display()
                )
            }),
            None => Library::builtin().context("Built-in content is invalid"),
        }
    }

    pub fn load_engine_config(&self) -> Result<EngineConfig> {
        match self.content_factory() {
            Some(factory) => factory.load_config(),
            None => Ok(EngineConfig::default()),
        }
    }

    /// Cache manifest: explicit file, then content directory, then built-in.
    pub fn load_manifest(&self) -> Result<CacheManifest> {
        if let Some(path) = &self.config.manifest_path {
            return ManifestLoader::load(path);
        }
        match self.content_factory() {
            Some(factory) => factory.load_manifest(),
            None => Ok(CacheManifest::current()),
        }
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.config
            .cache_dir
            .clone()
            .unwrap_or_else(paths::offline_cache_dir)
    }

    pub fn build_arcade(&self) -> Result<Arcade> {
        let config = ArcadeConfig {
            engine: self.load_engine_config()?,
            event_buffer_size: self.config.channels.event_buffer,
            command_buffer_size: self.config.channels.command_buffer,
            seed: self.config.seed,
        };

        let arcade = Arcade::builder()
            .config(config)
            .library(self.load_library()?)
            .feedback(Arc::clone(&self.feedback))
            .build()?;
        Ok(arcade)
    }

    pub fn build_cache(&self, event_bus: EventBus) -> Result<CacheManager> {
        let manifest = self.load_manifest()?;
        let cache_dir = self.cache_dir();
        let storage = FileCacheStorage::new(&cache_dir).with_context(|| {
            format!("Failed to open offline cache at {}", cache_dir.display())
        })?;
        let fetcher = match &self.fetcher {
            Some(fetcher) => Arc::clone(fetcher),
            None => self.default_fetcher()?,
        };

        tracing::debug!(
            "Offline cache {} at {}",
            manifest.cache_name(),
            cache_dir.display()
        );
        Ok(CacheManager::new(manifest, Arc::new(storage), fetcher).with_event_bus(event_bus))
    }

    /// Build both halves; the cache manager publishes on the arcade's bus.
    pub fn build(self) -> Result<ClientSetup> {
        let arcade = self.build_arcade()?;
        let cache = self.build_cache(arcade.event_bus().clone())?;
        Ok(ClientSetup {
            config: self.config,
            arcade,
            cache,
        })
    }

    fn content_factory(&self) -> Option<ContentFactory> {
        self.config.content_dir.as_ref().map(ContentFactory::new)
    }

    #[cfg(feature = "http")]
    fn default_fetcher(&self) -> Result<Arc<dyn Fetcher>> {
        let fetcher = runtime::HttpFetcher::new(&self.config.asset_base_url)
            .context("Invalid TREEHOUSE_ASSET_BASE_URL")?;
        Ok(Arc::new(fetcher))
    }

    #[cfg(not(feature = "http"))]
    fn default_fetcher(&self) -> Result<Arc<dyn Fetcher>> {
        anyhow::bail!("No fetcher configured and the `http` feature is disabled")
    }
}

pub struct ClientSetup {
    pub config: ClientConfig,
    pub arcade: Arcade,
    pub cache: CacheManager,
}

#[cfg(test)]
mod tests {
    use game_core::GameKind;

    use super::*;

    #[test]
    fn content_dir_overrides_builtin_pools() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("letters.ron"),
            r#"(entries: [(label: "A"), (label: "B"), (label: "C")])"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("config.toml"), "transition_delay_ms = 250\n").unwrap();

        let builder = ClientBuilder::new(ClientConfig {
            content_dir: Some(dir.path().to_path_buf()),
            ..ClientConfig::default()
        });
        let library = builder.load_library().unwrap();
        assert_eq!(library.content(GameKind::Letters).map(|c| c.len()), Some(3));
        assert_eq!(
            builder.load_engine_config().unwrap().transition_delay_ms,
            Some(250)
        );
        assert_eq!(builder.load_manifest().unwrap(), CacheManifest::current());
    }

    #[test]
    fn explicit_cache_dir_wins() {
        let builder = ClientBuilder::new(ClientConfig {
            cache_dir: Some(PathBuf::from("/tmp/treehouse-test-cache")),
            ..ClientConfig::default()
        });
        assert_eq!(builder.cache_dir(), PathBuf::from("/tmp/treehouse-test-cache"));
    }

    #[tokio::test]
    async fn builds_arcade_and_cache_on_one_bus() {
        let dir = tempfile::tempdir().unwrap();
        let setup = ClientBuilder::new(ClientConfig {
            cache_dir: Some(dir.path().to_path_buf()),
            seed: Some(3),
            ..ClientConfig::default()
        })
        .fetcher(Arc::new(NoNetwork))
        .build()
        .unwrap();

        assert_eq!(setup.arcade.config().seed, Some(3));
        let status = setup.cache.status().await.unwrap();
        assert!(status.caches.is_empty());
    }

    struct NoNetwork;

    #[async_trait::async_trait]
    impl Fetcher for NoNetwork {
        async fn fetch(
            &self,
            url: &str,
        ) -> std::result::Result<runtime::CachedResponse, runtime::FetchError> {
            Err(runtime::FetchError::Transport {
                url: url.to_owned(),
                reason: "offline".into(),
            })
        }
    }
}
