//! Subcommand implementations.
//!
//! Each command is a separate module that implements its own CLI args and execution logic.

mod cache;
mod games;
mod play;

pub use cache::{Fetch, Install, Status};
pub use games::{Games, WebManifest};
pub use play::Play;
