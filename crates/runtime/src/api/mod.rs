//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! other layers can stay focused on orchestration, workers, or infrastructure.

pub mod errors;
pub mod feedback;
pub mod handle;

pub use errors::{Result, RuntimeError};
pub use feedback::{FeedbackCall, FeedbackEngine, RecordingFeedback, SilentFeedback};
pub use handle::{SessionHandle, SessionSnapshot};
