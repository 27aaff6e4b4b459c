//! Static content definitions and loaders.
//!
//! This crate houses the arcade's fixed content and provides loaders for
//! RON/TOML data files:
//! - Content pools per mini-game (letters, rhymes, stories, dance cast, flashcards)
//! - Engine configuration (TOML)
//! - The offline cache manifest (TOML)
//! - Installability metadata rendered as `manifest.json`
//!
//! Content is read-only for the process lifetime and shared between sessions.

pub mod assets;
pub mod builtin;
pub mod library;
pub mod web_manifest;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use assets::{CACHE_NAME, CacheManifest, DEFAULT_CACHE_URLS, ManifestError};
pub use library::Library;
pub use web_manifest::{ManifestIcon, WebAppManifest};

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, ManifestLoader, PoolLoader, RhymeLoader};
