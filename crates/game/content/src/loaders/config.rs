//! Engine configuration loader.

use std::path::Path;

use game_core::EngineConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for engine configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys fall back to [`EngineConfig::default`].
    pub fn load(path: &Path) -> LoadResult<EngineConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<EngineConfig> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ConfigLoader::parse("transition_delay_ms = 250").unwrap();
        assert_eq!(config.transition_delay_ms, Some(250));
        assert_eq!(
            config.rhythm_interval_ms,
            EngineConfig::DEFAULT_RHYTHM_INTERVAL_MS
        );
    }
}
