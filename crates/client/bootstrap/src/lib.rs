//! Shared bootstrap utilities for client front-ends.
//!
//! Provides configuration loading, platform paths, and assembly of the arcade
//! and offline cache manager that can be reused by any front-end crate.
pub mod builder;
pub mod config;
pub mod paths;

pub use builder::{ClientBuilder, ClientSetup};
pub use config::{ChannelConfig, ClientConfig};
