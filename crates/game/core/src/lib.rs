//! Deterministic mini-game logic and data types shared across clients.
//!
//! `game-core` defines the canonical rules (content pools, round generation,
//! answer evaluation, feedback cue scripts) and exposes pure APIs that can be
//! reused by the runtime and offline tools. All session state mutation flows
//! through [`session::GameSession`]; randomness is always injected by the caller.
pub mod config;
pub mod content;
pub mod error;
pub mod feedback;
pub mod kind;
pub mod round;
pub mod session;
pub mod synth;

pub use config::EngineConfig;
pub use content::{AuthoredRound, ContentPool, Entry, GameContent};
pub use error::{ErrorSeverity, PoolError, RoundError, SessionError};
pub use feedback::{Cue, FeedbackScript, Tone, Waveform, freeze_dance_beat};
pub use kind::{GameKind, SelectionPolicy};
pub use round::{Round, RoundGenerator};
pub use session::{Evaluation, GameSession, Outcome, SessionId, SessionPhase};
pub use synth::ToneSynth;
