//! Content factory for building the library from data files.

use std::path::{Path, PathBuf};

use game_core::{EngineConfig, GameContent, GameKind};
use strum::IntoEnumIterator;

use crate::assets::CacheManifest;
use crate::library::Library;
use crate::loaders::{ConfigLoader, LoadResult, ManifestLoader, PoolLoader, RhymeLoader};

/// Content factory that loads arcade content from a data directory.
///
/// Every file is optional; a missing file falls back to the built-in content.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── manifest.toml
/// ├── letters.ron
/// ├── rhymes.ron
/// ├── stories.ron
/// ├── dance.ron
/// └── flashcards.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// File holding the content for `kind`.
    pub fn content_path(&self, kind: GameKind) -> PathBuf {
        self.data_dir.join(format!("{kind}.ron"))
    }

    /// Load content for one kind, or the built-in content if no file exists.
    pub fn load_content(&self, kind: GameKind) -> LoadResult<GameContent> {
        let path = self.content_path(kind);
        if !path.exists() {
            return Ok(Library::builtin_for(kind)?);
        }
        match kind {
            GameKind::Rhymes => RhymeLoader::load(&path),
            _ => Ok(PoolLoader::load(&path)?.into()),
        }
    }

    /// Load the full library.
    pub fn load_library(&self) -> LoadResult<Library> {
        let mut library = Library::empty();
        for kind in GameKind::iter() {
            library = library.with_content(kind, self.load_content(kind)?);
        }
        Ok(library)
    }

    /// Load engine configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<EngineConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            return Ok(EngineConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the cache manifest from `manifest.toml`.
    pub fn load_manifest(&self) -> LoadResult<CacheManifest> {
        let path = self.data_dir.join("manifest.toml");
        if !path.exists() {
            return Ok(CacheManifest::current());
        }
        ManifestLoader::load(&path)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
        assert_eq!(
            factory.content_path(GameKind::Flashcards),
            Path::new("/tmp/data/flashcards.ron")
        );
    }

    #[test]
    fn missing_files_fall_back_to_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ContentFactory::new(dir.path());
        assert_eq!(factory.load_library().unwrap(), Library::builtin().unwrap());
        assert_eq!(factory.load_config().unwrap(), EngineConfig::default());
        assert_eq!(factory.load_manifest().unwrap(), CacheManifest::current());
    }

    #[test]
    fn files_override_builtin() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("letters.ron"),
            r#"(entries: [(label: "X"), (label: "Y")])"#,
        )
        .unwrap();
        let factory = ContentFactory::new(dir.path());
        let library = factory.load_library().unwrap();
        assert_eq!(library.content(GameKind::Letters).map(|c| c.len()), Some(2));
        assert_eq!(library.content(GameKind::Stories).map(|c| c.len()), Some(4));
    }
}
