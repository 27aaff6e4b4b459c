//! High-level arcade orchestrator.
//!
//! The arcade owns the content library and the feedback engine, spawns one
//! worker per displayed mini-game, and exposes a builder-based API for the
//! presentation layer.

use std::collections::BTreeMap;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use game_content::Library;
use game_core::{EngineConfig, GameKind, GameSession, SessionId};

use crate::api::{FeedbackEngine, Result, RuntimeError, SessionHandle, SilentFeedback};
use crate::events::{Event, EventBus, Topic};
use crate::workers::SessionWorker;

/// Arcade configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct ArcadeConfig {
    pub engine: EngineConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Seed for round generation; each session derives its own stream.
    /// `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for ArcadeConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
            seed: None,
        }
    }
}

struct RunningSession {
    handle: SessionHandle,
    worker: JoinHandle<()>,
}

/// Main arcade that hosts mini-game sessions
///
/// Owns the session workers; [`SessionHandle`] provides a cloneable façade
/// for each one.
pub struct Arcade {
    config: ArcadeConfig,
    library: Library,
    feedback: Arc<dyn FeedbackEngine>,
    event_bus: EventBus,
    sessions: BTreeMap<SessionId, RunningSession>,
    next_id: u64,
    primed: bool,
}

impl Arcade {
    /// Create a new arcade builder
    pub fn builder() -> ArcadeBuilder {
        ArcadeBuilder::new()
    }

    pub fn config(&self) -> &ArcadeConfig {
        &self.config
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Subscribe to events from a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Start a session for `kind`.
    ///
    /// Round-based games present their first round before any command is
    /// processed. The first session ever started primes the feedback engine.
    pub fn start_session(&mut self, kind: GameKind) -> Result<SessionHandle> {
        self.reap_finished();

        let content = self
            .library
            .content(kind)
            .cloned()
            .ok_or(RuntimeError::MissingContent { kind })?;

        self.next_id += 1;
        let id = SessionId(self.next_id);
        let session = GameSession::new(id, kind, content, self.config.engine.clone())?;
        let rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(id.0)),
            None => StdRng::from_entropy(),
        };

        if !self.primed {
            self.feedback.prime();
            self.primed = true;
        }

        let (command_tx, command_rx) = mpsc::channel(self.config.command_buffer_size.max(1));
        let worker = SessionWorker::new(
            session,
            rng,
            Arc::clone(&self.feedback),
            self.event_bus.clone(),
            command_rx,
            command_tx.downgrade(),
        );
        let worker = tokio::spawn(worker.run());

        let handle = SessionHandle::new(id, kind, command_tx, self.event_bus.clone());
        self.sessions.insert(
            id,
            RunningSession {
                handle: handle.clone(),
                worker,
            },
        );
        info!("Arcade started {} ({})", id, kind);
        Ok(handle)
    }

    /// Handle of a running session.
    pub fn session(&self, id: SessionId) -> Option<SessionHandle> {
        self.sessions.get(&id).map(|s| s.handle.clone())
    }

    pub fn active_sessions(&self) -> impl Iterator<Item = SessionId> + '_ {
        self.sessions.keys().copied()
    }

    /// End a session and wait for its worker to stop. Returns the final score.
    pub async fn end_session(&mut self, id: SessionId) -> Result<u32> {
        let running = self
            .sessions
            .remove(&id)
            .ok_or(RuntimeError::UnknownSession { id })?;

        let score = running.handle.end().await?;
        running.worker.await.map_err(RuntimeError::WorkerJoin)?;
        debug!("Arcade reaped {}", id);
        Ok(score)
    }

    /// Forget sessions whose worker already stopped, e.g. ended through a
    /// cloned [`SessionHandle`].
    fn reap_finished(&mut self) {
        self.sessions.retain(|id, running| {
            let finished = running.worker.is_finished();
            if finished {
                debug!("Arcade reaped {}", id);
            }
            !finished
        });
    }

    /// End every session and shut the arcade down gracefully.
    pub async fn shutdown(mut self) -> Result<()> {
        let ids: Vec<SessionId> = self.sessions.keys().copied().collect();
        for id in ids {
            match self.end_session(id).await {
                // Ended earlier through a cloned handle.
                Err(RuntimeError::Session(game_core::SessionError::Destroyed)) => {}
                other => {
                    other?;
                }
            }
        }
        info!("Arcade shut down");
        Ok(())
    }
}

/// Builder for [`Arcade`] with flexible configuration.
pub struct ArcadeBuilder {
    config: ArcadeConfig,
    library: Option<Library>,
    feedback: Option<Arc<dyn FeedbackEngine>>,
}

impl ArcadeBuilder {
    fn new() -> Self {
        Self {
            config: ArcadeConfig::default(),
            library: None,
            feedback: None,
        }
    }

    /// Override arcade configuration
    pub fn config(mut self, config: ArcadeConfig) -> Self {
        self.config = config;
        self
    }

    /// Provide the content library (defaults to the built-in content)
    pub fn library(mut self, library: Library) -> Self {
        self.library = Some(library);
        self
    }

    /// Set the feedback engine (defaults to [`SilentFeedback`])
    pub fn feedback(mut self, feedback: Arc<dyn FeedbackEngine>) -> Self {
        self.feedback = Some(feedback);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Build the arcade. Workers are spawned lazily, one per started session.
    pub fn build(self) -> Result<Arcade> {
        let library = match self.library {
            Some(library) => library,
            None => Library::builtin().map_err(RuntimeError::Content)?,
        };
        let feedback = self
            .feedback
            .unwrap_or_else(|| Arc::new(SilentFeedback));
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        Ok(Arcade {
            config: self.config,
            library,
            feedback,
            event_bus,
            sessions: BTreeMap::new(),
            next_id: 0,
            primed: false,
        })
    }
}
