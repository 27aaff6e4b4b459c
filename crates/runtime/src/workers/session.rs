//! Session worker that owns one [`GameSession`].
//!
//! Receives commands from [`crate::SessionHandle`], evaluates answers via
//! [`GameSession`], triggers feedback, and schedules the transition to the
//! next round. Commands are processed strictly in order.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use game_core::{Evaluation, GameKind, GameSession, Round, SessionError};

use super::post;
use super::rhythm::Rhythm;
use crate::api::{FeedbackEngine, Result, RuntimeError, SessionSnapshot};
use crate::events::{EventBus, SessionEvent};
use crate::scheduler::TaskHandle;

/// Commands that can be sent to a session worker
pub(crate) enum SessionCommand {
    Submit {
        label: String,
        reply: oneshot::Sender<Result<Evaluation>>,
    },
    Snapshot {
        reply: oneshot::Sender<Result<SessionSnapshot>>,
    },
    SayPrompt {
        reply: oneshot::Sender<Result<()>>,
    },
    /// Move through the flashcard deck by `step` cards.
    Browse {
        step: isize,
        reply: oneshot::Sender<Result<Round>>,
    },
    SayCard {
        reply: oneshot::Sender<Result<()>>,
    },
    StartDancing {
        reply: oneshot::Sender<Result<()>>,
    },
    Freeze {
        reply: oneshot::Sender<Result<()>>,
    },
    End {
        reply: oneshot::Sender<Result<u32>>,
    },
    /// Posted by the transition timer once the feedback pause has elapsed.
    Advance { sequence: u64 },
    /// Posted by the rhythm loop on every beat.
    Beat { generation: u64 },
}

impl SessionCommand {
    /// Answers a command that arrived after the session was destroyed.
    ///
    /// Send failures mean the caller stopped waiting, which is not an error.
    fn reject(self) {
        let destroyed = || RuntimeError::from(SessionError::Destroyed);
        match self {
            Self::Submit { reply, .. } => {
                let _ = reply.send(Err(destroyed()));
            }
            Self::Snapshot { reply } => {
                let _ = reply.send(Err(destroyed()));
            }
            Self::SayPrompt { reply }
            | Self::SayCard { reply }
            | Self::StartDancing { reply }
            | Self::Freeze { reply } => {
                let _ = reply.send(Err(destroyed()));
            }
            Self::Browse { reply, .. } => {
                let _ = reply.send(Err(destroyed()));
            }
            Self::End { reply } => {
                let _ = reply.send(Err(destroyed()));
            }
            Self::Advance { .. } | Self::Beat { .. } => {}
        }
    }
}

/// Background task that processes one session's commands.
pub(crate) struct SessionWorker {
    session: GameSession,
    rng: StdRng,
    feedback: Arc<dyn FeedbackEngine>,
    event_bus: EventBus,
    command_rx: mpsc::Receiver<SessionCommand>,
    /// Handed to timers so they never keep the worker alive.
    commands: mpsc::WeakSender<SessionCommand>,
    transition: Option<TaskHandle>,
    rhythm: Rhythm,
}

impl SessionWorker {
    pub(crate) fn new(
        session: GameSession,
        rng: StdRng,
        feedback: Arc<dyn FeedbackEngine>,
        event_bus: EventBus,
        command_rx: mpsc::Receiver<SessionCommand>,
        commands: mpsc::WeakSender<SessionCommand>,
    ) -> Self {
        let rhythm = Rhythm::new(session.config().rhythm_interval());
        Self {
            session,
            rng,
            feedback,
            event_bus,
            command_rx,
            commands,
            transition: None,
            rhythm,
        }
    }

    /// Main worker loop.
    ///
    /// Runs until the session is ended or every handle has been dropped.
    pub(crate) async fn run(mut self) {
        let id = self.session.id();
        let kind = self.session.kind();
        info!("{} started: {}", id, kind);
        self.event_bus.publish(SessionEvent::Started { id, kind });

        if kind.is_round_based() {
            self.present_first_round();
        }

        while let Some(cmd) = self.command_rx.recv().await {
            if !self.handle_command(cmd) {
                break;
            }
        }

        if self.session.is_active() {
            debug!("{} abandoned by every handle", id);
            self.destroy();
        }

        self.command_rx.close();
        while let Ok(cmd) = self.command_rx.try_recv() {
            cmd.reject();
        }
        info!("{} stopped", id);
    }

    /// Handles one command. Returns `false` once the session has ended.
    fn handle_command(&mut self, cmd: SessionCommand) -> bool {
        match cmd {
            SessionCommand::Submit { label, reply } => {
                let result = self.handle_submit(&label);
                if reply.send(result).is_err() {
                    debug!("Submit reply channel closed (caller dropped)");
                }
            }
            SessionCommand::Snapshot { reply } => {
                if reply.send(Ok(self.snapshot())).is_err() {
                    debug!("Snapshot reply channel closed (caller dropped)");
                }
            }
            SessionCommand::SayPrompt { reply } => {
                let result = self.handle_say_prompt();
                if reply.send(result).is_err() {
                    debug!("SayPrompt reply channel closed (caller dropped)");
                }
            }
            SessionCommand::Browse { step, reply } => {
                let result = self.handle_browse(step);
                if reply.send(result).is_err() {
                    debug!("Browse reply channel closed (caller dropped)");
                }
            }
            SessionCommand::SayCard { reply } => {
                let result = self.handle_say_card();
                if reply.send(result).is_err() {
                    debug!("SayCard reply channel closed (caller dropped)");
                }
            }
            SessionCommand::StartDancing { reply } => {
                let result = self.handle_start_dancing();
                if reply.send(result).is_err() {
                    debug!("StartDancing reply channel closed (caller dropped)");
                }
            }
            SessionCommand::Freeze { reply } => {
                let result = self.handle_freeze();
                if reply.send(result).is_err() {
                    debug!("Freeze reply channel closed (caller dropped)");
                }
            }
            SessionCommand::End { reply } => {
                let score = self.destroy();
                if reply.send(Ok(score)).is_err() {
                    debug!("End reply channel closed (caller dropped)");
                }
                return false;
            }
            SessionCommand::Advance { sequence } => self.handle_advance(sequence),
            SessionCommand::Beat { generation } => {
                if let Some(tones) = self.rhythm.on_beat(generation) {
                    for tone in tones {
                        self.feedback.play_tone(tone);
                    }
                }
            }
        }
        true
    }

    fn handle_submit(&mut self, label: &str) -> Result<Evaluation> {
        let evaluation = self.session.evaluate_label(label)?;
        debug!(
            "{} answered `{}`: {:?} (score {})",
            self.session.id(),
            label,
            evaluation.outcome,
            evaluation.score
        );

        self.feedback.play_all(&evaluation.cues);
        if let Some(delay) = evaluation.transition_delay {
            self.schedule_transition(evaluation.round_sequence, delay);
        }
        self.event_bus.publish(SessionEvent::Evaluated {
            id: self.session.id(),
            evaluation: evaluation.clone(),
        });
        Ok(evaluation)
    }

    fn handle_advance(&mut self, sequence: u64) {
        self.transition = None;
        match self.session.advance(&mut self.rng, sequence) {
            Ok(Some(round)) => {
                let round = round.clone();
                self.publish_round(round);
            }
            Ok(None) => debug!(
                "{} ignored stale transition for round {}",
                self.session.id(),
                sequence
            ),
            Err(e) => debug!("{} transition dropped: {}", self.session.id(), e),
        }
    }

    fn handle_browse(&mut self, step: isize) -> Result<Round> {
        // A pending transition would otherwise replace the card just chosen.
        self.transition = None;
        let round = self.session.browse(&mut self.rng, step)?.clone();
        self.publish_round(round.clone());
        Ok(round)
    }

    fn handle_say_prompt(&mut self) -> Result<()> {
        let cue = self.session.prompt_cue().ok_or_else(|| self.no_prompt("prompts"))?;
        self.feedback.play(&cue);
        Ok(())
    }

    fn handle_say_card(&mut self) -> Result<()> {
        self.require_kind(GameKind::Flashcards, "cards")?;
        self.handle_say_prompt()
    }

    fn handle_start_dancing(&mut self) -> Result<()> {
        self.require_kind(GameKind::Dance, "dancing")?;
        if self.rhythm.start(self.commands.clone()) {
            self.feedback.prime();
            info!("{} started dancing", self.session.id());
            self.event_bus.publish(SessionEvent::DanceStarted {
                id: self.session.id(),
            });
        }
        Ok(())
    }

    fn handle_freeze(&mut self) -> Result<()> {
        self.require_kind(GameKind::Dance, "dancing")?;
        if let Some(beats) = self.rhythm.stop() {
            info!("{} froze after {} beats", self.session.id(), beats);
            self.event_bus.publish(SessionEvent::DanceFrozen {
                id: self.session.id(),
                beats,
            });
        }
        Ok(())
    }

    fn present_first_round(&mut self) {
        match self.session.start_round(&mut self.rng) {
            Ok(round) => {
                let round = round.clone();
                self.publish_round(round);
            }
            Err(e) => debug!("{} could not start a round: {}", self.session.id(), e),
        }
    }

    fn schedule_transition(&mut self, sequence: u64, delay: Duration) {
        let commands = self.commands.clone();
        // Replacing the handle cancels any transition still pending.
        self.transition = Some(TaskHandle::once(delay, async move {
            post(&commands, SessionCommand::Advance { sequence }).await;
        }));
    }

    fn publish_round(&self, round: Round) {
        debug!(
            "{} presents round {}: {}",
            self.session.id(),
            round.sequence,
            round.target.label
        );
        self.event_bus.publish(SessionEvent::RoundPresented {
            id: self.session.id(),
            round,
        });
    }

    /// Cancels every task the session owns and destroys it. Returns the score.
    fn destroy(&mut self) -> u32 {
        self.transition = None;
        self.rhythm.stop();
        self.session.destroy();

        let score = self.session.score();
        info!("{} ended with score {}", self.session.id(), score);
        self.event_bus.publish(SessionEvent::Ended {
            id: self.session.id(),
            score,
        });
        score
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.session.id(),
            kind: self.session.kind(),
            phase: self.session.phase(),
            round: self.session.current_round().cloned(),
            score: self.session.score(),
            dancing: self.rhythm.is_dancing(),
            beat: self.rhythm.beat(),
        }
    }

    fn require_kind(&self, kind: GameKind, operation: &'static str) -> Result<()> {
        if self.session.kind() != kind {
            return Err(SessionError::Unsupported {
                kind: self.session.kind(),
                operation,
            }
            .into());
        }
        Ok(())
    }

    fn no_prompt(&self, operation: &'static str) -> RuntimeError {
        if self.session.kind().is_round_based() {
            SessionError::NoActiveRound {
                phase: self.session.phase(),
            }
            .into()
        } else {
            SessionError::Unsupported {
                kind: self.session.kind(),
                operation,
            }
            .into()
        }
    }
}
