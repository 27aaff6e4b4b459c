//! Worker tasks that back the runtime orchestration.
//!
//! Each session runs in its own worker task that exclusively owns the
//! [`game_core::GameSession`]; timers talk back to it through weak senders.

mod rhythm;
mod session;

pub(crate) use session::{SessionCommand, SessionWorker};

use tokio::sync::mpsc;

/// Posts `command` back to a worker if it is still running.
///
/// Returns `false` once the worker has stopped accepting commands.
async fn post(commands: &mpsc::WeakSender<SessionCommand>, command: SessionCommand) -> bool {
    match commands.upgrade() {
        Some(tx) => tx.send(command).await.is_ok(),
        None => false,
    }
}
