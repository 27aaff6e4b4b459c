//! Value types shared by the cache manager and its backends.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored (or freshly fetched) response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedResponse {
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
    pub stored_at: DateTime<Utc>,
}

impl CachedResponse {
    pub fn new(url: impl Into<String>, status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            url: url.into(),
            status,
            content_type: None,
            body: body.into(),
            stored_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Lifecycle of the manifest's cache version.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CacheState {
    /// Nothing installed for this version yet.
    Uninstalled,
    Installing,
    /// Installed but not yet serving; only seen without skip-waiting.
    Waiting,
    Active,
    /// The last install failed; the next load retries it.
    Redundant,
}

/// Where a served response came from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseSource {
    Cache { cache_name: String },
    Network,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServedResponse {
    pub response: CachedResponse,
    pub source: ResponseSource,
}

impl ServedResponse {
    pub fn is_cached(&self) -> bool {
        matches!(self.source, ResponseSource::Cache { .. })
    }
}
