//! Common error infrastructure for game-core.
//!
//! Each stage of the engine has its own error type: pools are validated when
//! content is assembled, generators fail only on malformed content, and
//! sessions reject operations that do not fit their current phase.

use thiserror::Error;

use crate::kind::GameKind;
use crate::session::SessionPhase;

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the caller may retry later (e.g. once the next round is up)
/// - **Validation**: invalid input that should be rejected without retry
/// - **Internal**: unexpected state inconsistency that should be investigated
/// - **Fatal**: the session or content is unusable
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    Recoverable,
    Validation,
    Internal,
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Errors raised while assembling content pools and authored rounds.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("content pool is empty")]
    Empty,

    #[error("duplicate entry `{label}` in content pool")]
    DuplicateEntry { label: String },

    #[error("authored round `{prompt}` does not offer its answer `{answer}`")]
    AnswerNotOffered { prompt: String, answer: String },

    #[error("authored round `{prompt}` offers `{label}` more than once")]
    DuplicateOption { prompt: String, label: String },

    #[error("authored round `{prompt}` offers {count} options, at most {max} allowed")]
    TooManyOptions {
        prompt: String,
        count: usize,
        max: usize,
    },
}

impl PoolError {
    pub const fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }
}

/// Errors raised by a [`crate::RoundGenerator`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RoundError {
    #[error("{kind} has no rounds to play")]
    NotRoundBased { kind: GameKind },

    #[error("card index {index} is out of range for a deck of {len}")]
    CardOutOfRange { index: usize, len: usize },
}

impl RoundError {
    pub const fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotRoundBased { .. } => ErrorSeverity::Validation,
            Self::CardOutOfRange { .. } => ErrorSeverity::Validation,
        }
    }
}

/// Errors raised by [`crate::GameSession`] operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("session has been destroyed")]
    Destroyed,

    #[error("no round is active (phase: {phase:?})")]
    NoActiveRound { phase: SessionPhase },

    #[error("waiting for the next round to be presented")]
    AwaitingNextRound,

    #[error("`{label}` is not one of the offered choices")]
    ChoiceNotOffered { label: String },

    #[error("{kind} does not support {operation}")]
    Unsupported {
        kind: GameKind,
        operation: &'static str,
    },

    #[error(transparent)]
    Round(#[from] RoundError),
}

impl SessionError {
    pub const fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Destroyed => ErrorSeverity::Fatal,
            Self::NoActiveRound { .. } | Self::AwaitingNextRound => ErrorSeverity::Recoverable,
            Self::ChoiceNotOffered { .. } | Self::Unsupported { .. } => ErrorSeverity::Validation,
            Self::Round(e) => e.severity(),
        }
    }
}
