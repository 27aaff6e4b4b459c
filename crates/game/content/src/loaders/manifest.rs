//! Cache manifest loader.

use std::path::Path;

use crate::assets::CacheManifest;
use crate::loaders::{LoadResult, read_file};

/// Loader for the offline cache manifest from TOML files.
///
/// ```toml
/// cache_name = "treehouse-games-v17"
/// urls = ["./", "./index.html"]
/// ```
pub struct ManifestLoader;

impl ManifestLoader {
    pub fn load(path: &Path) -> LoadResult<CacheManifest> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<CacheManifest> {
        toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse cache manifest TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_validates() {
        let manifest = ManifestLoader::parse(
            r#"
            cache_name = "treehouse-games-v17"
            urls = ["./", "./index.html"]
            "#,
        )
        .unwrap();
        assert_eq!(manifest.cache_name(), "treehouse-games-v17");
        assert_eq!(manifest.urls().len(), 2);

        let err = ManifestLoader::parse(
            r#"
            cache_name = "x-v1"
            urls = ["./", "./"]
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }
}
