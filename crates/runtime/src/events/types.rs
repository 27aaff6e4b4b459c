//! Event types for different topics.

use game_core::{Evaluation, GameKind, Round, SessionId};
use serde::{Deserialize, Serialize};

use crate::cache::ResponseSource;

/// Events related to mini-game sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    Started {
        id: SessionId,
        kind: GameKind,
    },

    /// A round replaced the previous one (first round, transition, or browsing).
    RoundPresented { id: SessionId, round: Round },

    Evaluated {
        id: SessionId,
        evaluation: Evaluation,
    },

    DanceStarted { id: SessionId },

    /// The rhythm loop halted after `beats` beats.
    DanceFrozen { id: SessionId, beats: u64 },

    Ended { id: SessionId, score: u32 },
}

impl SessionEvent {
    pub fn session_id(&self) -> SessionId {
        match self {
            Self::Started { id, .. }
            | Self::RoundPresented { id, .. }
            | Self::Evaluated { id, .. }
            | Self::DanceStarted { id }
            | Self::DanceFrozen { id, .. }
            | Self::Ended { id, .. } => *id,
        }
    }
}

/// Events related to the offline asset cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CacheEvent {
    InstallStarted { cache_name: String, urls: usize },

    /// Every manifest entry was committed as one batch.
    Installed { cache_name: String, entries: usize },

    /// Install aborted; nothing was written for `cache_name`.
    InstallFailed {
        cache_name: String,
        /// Request that failed; `None` when storing the batch failed.
        url: Option<String>,
        error: String,
    },

    Activated {
        cache_name: String,
        deleted: Vec<String>,
        clients_claimed: bool,
    },

    Served { url: String, source: ResponseSource },
}
