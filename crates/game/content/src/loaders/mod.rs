//! Content loaders for reading arcade data from files.
//!
//! Pools and rhyme rounds are stored as RON, engine settings and the cache
//! manifest as TOML.

pub mod config;
pub mod factory;
pub mod manifest;
pub mod pools;

pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use manifest::ManifestLoader;
pub use pools::{PoolLoader, RhymeLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
