//! The versioned list of assets required for offline play.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Cache identity and generation. Bumping it is the only way to invalidate
/// previously cached assets.
pub const CACHE_NAME: &str = "treehouse-games-v16-superwhy";

/// App shell files plus the pinned third-party scripts and styles.
pub const DEFAULT_CACHE_URLS: &[&str] = &[
    "./",
    "./index.html",
    "./manifest.json",
    "https://cdn.tailwindcss.com",
    "https://unpkg.com/react@18/umd/react.production.min.js",
    "https://unpkg.com/react-dom@18/umd/react-dom.production.min.js",
    "https://unpkg.com/@babel/standalone/babel.min.js",
];

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ManifestError {
    #[error("cache name must not be empty")]
    EmptyName,

    #[error("manifest lists no URLs")]
    NoUrls,

    #[error("manifest lists `{0}` more than once")]
    DuplicateUrl(String),
}

/// Named, versioned set of resources fetched at install time.
///
/// Never partially mutated: a new version replaces it wholesale.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawManifest", into = "RawManifest")]
pub struct CacheManifest {
    cache_name: String,
    urls: Vec<String>,
}

impl CacheManifest {
    pub fn new(
        cache_name: impl Into<String>,
        urls: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, ManifestError> {
        let cache_name = cache_name.into();
        if cache_name.trim().is_empty() {
            return Err(ManifestError::EmptyName);
        }
        let mut seen = Vec::new();
        for url in urls {
            let url = url.into();
            if seen.contains(&url) {
                return Err(ManifestError::DuplicateUrl(url));
            }
            seen.push(url);
        }
        if seen.is_empty() {
            return Err(ManifestError::NoUrls);
        }
        Ok(Self {
            cache_name,
            urls: seen,
        })
    }

    /// The manifest shipped with the current build.
    pub fn current() -> Self {
        Self {
            cache_name: CACHE_NAME.to_owned(),
            urls: DEFAULT_CACHE_URLS.iter().map(|u| (*u).to_owned()).collect(),
        }
    }

    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.iter().any(|u| u == url)
    }

    /// Trailing `-vN…` generation marker of the cache name, if any.
    pub fn version(&self) -> Option<&str> {
        self.cache_name.split('-').find(|part| {
            part.len() > 1 && part.starts_with('v') && part[1..].chars().all(|c| c.is_ascii_digit())
        })
    }
}

impl Default for CacheManifest {
    fn default() -> Self {
        Self::current()
    }
}

#[derive(Serialize, Deserialize)]
struct RawManifest {
    cache_name: String,
    urls: Vec<String>,
}

impl TryFrom<RawManifest> for CacheManifest {
    type Error = ManifestError;

    fn try_from(raw: RawManifest) -> Result<Self, Self::Error> {
        Self::new(raw.cache_name, raw.urls)
    }
}

impl From<CacheManifest> for RawManifest {
    fn from(manifest: CacheManifest) -> Self {
        Self {
            cache_name: manifest.cache_name,
            urls: manifest.urls,
        }
    }
}
