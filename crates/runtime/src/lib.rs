//! Runtime orchestration for the arcade's mini-game sessions and offline cache.
//!
//! This crate wires together the feedback engine abstraction, per-session
//! workers, cancellable timers, and the versioned asset cache into a cohesive
//! API. Presentation layers embed [`Arcade`] to start sessions, then drive
//! each one through its [`SessionHandle`].
//!
//! Modules are organized by responsibility:
//! - [`arcade`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - [`scheduler`] owns cancellable delayed and repeating tasks
//! - [`cache`] installs, serves and purges the offline asset cache
//! - `workers` keeps per-session tasks internal to the crate
pub mod api;
pub mod arcade;
pub mod cache;
pub mod events;
pub mod scheduler;

mod workers;

pub use api::{
    FeedbackCall, FeedbackEngine, RecordingFeedback, Result, RuntimeError, SessionHandle,
    SessionSnapshot, SilentFeedback,
};
pub use arcade::{Arcade, ArcadeBuilder, ArcadeConfig};
pub use cache::{
    CacheError, CacheManager, CacheState, CacheStatus, CacheStorage, CachedResponse, FetchError,
    Fetcher, FileCacheStorage, InMemoryCacheStorage, ResponseSource, ServedResponse, StorageError,
};
pub use events::{CacheEvent, Event, EventBus, SessionEvent, Topic};
pub use scheduler::TaskHandle;

#[cfg(feature = "http")]
pub use cache::HttpFetcher;
