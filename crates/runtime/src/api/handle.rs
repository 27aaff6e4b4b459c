//! Cloneable façade for driving one session.
//!
//! [`SessionHandle`] hides channel plumbing and offers async helpers for
//! answering, browsing cards, dancing, and ending the session.
use tokio::sync::{broadcast, mpsc, oneshot};

use game_core::{Evaluation, GameKind, Round, SessionError, SessionId, SessionPhase};
use serde::{Deserialize, Serialize};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::SessionCommand;

/// Read-only view of a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub id: SessionId,
    pub kind: GameKind,
    pub phase: SessionPhase,
    pub round: Option<Round>,
    pub score: u32,
    pub dancing: bool,
    /// Beats played since dancing last started.
    pub beat: u64,
}

/// Client-facing handle to one running session.
#[derive(Clone)]
pub struct SessionHandle {
    id: SessionId,
    kind: GameKind,
    command_tx: mpsc::Sender<SessionCommand>,
    event_bus: EventBus,
}

impl SessionHandle {
    pub(crate) fn new(
        id: SessionId,
        kind: GameKind,
        command_tx: mpsc::Sender<SessionCommand>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            id,
            kind,
            command_tx,
            event_bus,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn kind(&self) -> GameKind {
        self.kind
    }

    /// Submit the choice labelled `label` for the current round.
    pub async fn submit(&self, label: impl Into<String>) -> Result<Evaluation> {
        let label = label.into();
        self.request(|reply| SessionCommand::Submit { label, reply })
            .await
    }

    /// Query the current session state.
    pub async fn snapshot(&self) -> Result<SessionSnapshot> {
        self.request(|reply| SessionCommand::Snapshot { reply }).await
    }

    /// Speak the current round's prompt.
    pub async fn say_prompt(&self) -> Result<()> {
        self.request(|reply| SessionCommand::SayPrompt { reply })
            .await
    }

    /// Show the next flashcard, wrapping after the last.
    pub async fn next_card(&self) -> Result<Round> {
        self.request(|reply| SessionCommand::Browse { step: 1, reply })
            .await
    }

    /// Show the previous flashcard, wrapping before the first.
    pub async fn previous_card(&self) -> Result<Round> {
        self.request(|reply| SessionCommand::Browse { step: -1, reply })
            .await
    }

    /// Speak the label of the flashcard on display.
    pub async fn say_card(&self) -> Result<()> {
        self.request(|reply| SessionCommand::SayCard { reply }).await
    }

    /// Start the freeze-dance rhythm loop.
    pub async fn start_dancing(&self) -> Result<()> {
        self.request(|reply| SessionCommand::StartDancing { reply })
            .await
    }

    /// Stop the rhythm loop. No beat plays once this returns.
    pub async fn freeze(&self) -> Result<()> {
        self.request(|reply| SessionCommand::Freeze { reply }).await
    }

    /// End the session, cancelling its timers. Returns the final score.
    pub async fn end(&self) -> Result<u32> {
        self.request(|reply| SessionCommand::End { reply }).await
    }

    /// Subscribe to events from a specific topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<Result<T>>) -> SessionCommand,
    ) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        // The worker drops its receiver once the session is destroyed.
        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::Session(SessionError::Destroyed))?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }
}
