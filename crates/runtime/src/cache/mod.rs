//! Offline asset cache.
//!
//! The [`CacheManager`] installs every URL of a versioned
//! [`game_content::CacheManifest`] as one atomic batch, serves cached
//! responses before going to the network, and purges every other cache
//! version on activation.
//!
//! Storage is abstracted by [`CacheStorage`] with in-memory and file-backed
//! implementations; the network by [`Fetcher`].

mod error;
mod fetch;
mod file;
mod manager;
mod memory;
mod storage;
mod types;

pub use error::{CacheError, FetchError, StorageError};
pub use fetch::Fetcher;
pub use file::FileCacheStorage;
pub use manager::{CacheManager, CacheStatus};
pub use memory::InMemoryCacheStorage;
pub use storage::CacheStorage;
pub use types::{CacheState, CachedResponse, ResponseSource, ServedResponse};

#[cfg(feature = "http")]
pub use fetch::HttpFetcher;
