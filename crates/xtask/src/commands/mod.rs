//! Command implementations for xtask
//!
//! Each command is a separate module that implements its own CLI args and execution logic.

mod clean;
mod inspect_cache;
mod tail_logs;

pub use clean::Clean;
pub use inspect_cache::InspectCache;
pub use tail_logs::TailLogs;
