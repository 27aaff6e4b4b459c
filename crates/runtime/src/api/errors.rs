//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from session workers, content lookup, and the offline cache
//! so clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use game_core::{ErrorSeverity, GameKind, PoolError, SessionError, SessionId};

use crate::cache::CacheError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("no content loaded for {kind}")]
    MissingContent { kind: GameKind },

    #[error("invalid built-in content")]
    Content(#[source] PoolError),

    #[error("{id} is not running")]
    UnknownSession { id: SessionId },

    #[error("session worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("session worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl RuntimeError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::MissingContent { .. } => ErrorSeverity::Fatal,
            Self::Content(e) => e.severity(),
            Self::UnknownSession { .. } => ErrorSeverity::Validation,
            Self::ReplyChannelClosed(_) | Self::WorkerJoin(_) => ErrorSeverity::Internal,
            Self::Session(e) => e.severity(),
            Self::Cache(e) => e.severity(),
        }
    }
}
