//! Error types raised by the offline cache.

use game_core::ErrorSeverity;
use thiserror::Error;

/// Errors surfaced by [`super::CacheStorage`] implementations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("cache storage lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid cache name `{name}`")]
    InvalidCacheName { name: String },

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

impl StorageError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidCacheName { .. } => ErrorSeverity::Validation,
            Self::Io(_) => ErrorSeverity::Recoverable,
            Self::LockPoisoned | Self::Json(_) | Self::CorruptedData(_) => ErrorSeverity::Internal,
        }
    }
}

/// Errors raised while fetching from the network.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request for `{url}` failed: {reason}")]
    Transport { url: String, reason: String },
}

impl FetchError {
    pub fn url(&self) -> &str {
        match self {
            Self::InvalidUrl { url, .. } | Self::Transport { url, .. } => url,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidUrl { .. } => ErrorSeverity::Validation,
            Self::Transport { .. } => ErrorSeverity::Recoverable,
        }
    }
}

/// Errors raised by [`super::CacheManager`].
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("an install of `{cache_name}` is already running")]
    InstallInProgress { cache_name: String },

    #[error("`{url}` answered with status {status}")]
    BadStatus { url: String, status: u16 },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl CacheError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InstallInProgress { .. } | Self::BadStatus { .. } => ErrorSeverity::Recoverable,
            Self::Fetch(e) => e.severity(),
            Self::Storage(e) => e.severity(),
        }
    }
}
