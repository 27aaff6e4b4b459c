//! Client configuration structures and loaders.
use std::env;
use std::path::PathBuf;

/// Base URL relative manifest entries resolve against when none is configured.
pub const DEFAULT_ASSET_BASE_URL: &str = "http://localhost:8000/";

/// Configuration required to bootstrap the arcade and offline cache.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub channels: ChannelConfig,
    pub session_id: Option<String>,
    /// Fixed seed for reproducible rounds.
    pub seed: Option<u64>,
    /// Directory with content overrides (`letters.ron`, `config.toml`, ...).
    pub content_dir: Option<PathBuf>,
    /// Root of the offline asset cache (default: platform cache directory).
    pub cache_dir: Option<PathBuf>,
    pub asset_base_url: String,
    /// Cache manifest TOML overriding the built-in asset list.
    pub manifest_path: Option<PathBuf>,
    /// Disable audio and speech output.
    pub mute: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            channels: ChannelConfig::default(),
            session_id: None,
            seed: None,
            content_dir: None,
            cache_dir: None,
            asset_base_url: DEFAULT_ASSET_BASE_URL.to_owned(),
            manifest_path: None,
            mute: false,
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `TREEHOUSE_SESSION_ID` - Session identifier for log files (default: auto-generated)
    /// - `TREEHOUSE_SEED` - Seed for round generation (default: entropy)
    /// - `TREEHOUSE_CONTENT_DIR` - Content override directory (default: built-in content)
    /// - `TREEHOUSE_CACHE_DIR` - Offline cache directory (default: platform-specific)
    /// - `TREEHOUSE_ASSET_BASE_URL` - Base for relative asset URLs (default: `http://localhost:8000/`)
    /// - `TREEHOUSE_MANIFEST` - Cache manifest TOML (default: built-in manifest)
    /// - `TREEHOUSE_MUTE` - Disable audio and speech (default: false)
    /// - `TREEHOUSE_EVENT_BUFFER` - Event bus capacity per topic (default: 100)
    /// - `TREEHOUSE_COMMAND_BUFFER` - Session command queue size (default: 32)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // Channel configuration
        if let Some(capacity) = read_env::<usize>("TREEHOUSE_EVENT_BUFFER") {
            config.channels.event_buffer = capacity.max(1);
        }
        if let Some(capacity) = read_env::<usize>("TREEHOUSE_COMMAND_BUFFER") {
            config.channels.command_buffer = capacity.max(1);
        }

        config.session_id = env::var("TREEHOUSE_SESSION_ID").ok();
        config.seed = read_env::<u64>("TREEHOUSE_SEED");
        config.content_dir = env::var("TREEHOUSE_CONTENT_DIR").ok().map(PathBuf::from);
        config.cache_dir = env::var("TREEHOUSE_CACHE_DIR").ok().map(PathBuf::from);
        config.manifest_path = env::var("TREEHOUSE_MANIFEST").ok().map(PathBuf::from);

        if let Ok(url) = env::var("TREEHOUSE_ASSET_BASE_URL") {
            config.asset_base_url = url;
        }

        // Also accept just setting the variable without value as "true"
        if let Some(mute) = read_env::<bool>("TREEHOUSE_MUTE") {
            config.mute = mute;
        } else if env::var("TREEHOUSE_MUTE").is_ok() {
            config.mute = true;
        }

        config
    }
}

#[derive(Clone, Debug)]
pub struct ChannelConfig {
    pub event_buffer: usize,
    pub command_buffer: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            event_buffer: 100,
            command_buffer: 32,
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
