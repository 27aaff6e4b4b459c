//! Freeze-dance rhythm loop state.

use std::time::Duration;

use arrayvec::ArrayVec;
use game_core::{Tone, freeze_dance_beat};
use tokio::sync::mpsc;

use super::{SessionCommand, post};
use crate::scheduler::TaskHandle;

/// Beat counter plus the repeating task that posts beats to the worker.
///
/// Each start bumps `generation`, so beats posted by an earlier loop are
/// dropped even if they were already queued when the loop stopped.
pub(super) struct Rhythm {
    interval: Duration,
    generation: u64,
    beat: u64,
    task: Option<TaskHandle>,
}

impl Rhythm {
    pub(super) fn new(interval: Duration) -> Self {
        Self {
            interval,
            generation: 0,
            beat: 0,
            task: None,
        }
    }

    pub(super) fn is_dancing(&self) -> bool {
        self.task.is_some()
    }

    pub(super) fn beat(&self) -> u64 {
        self.beat
    }

    /// Starts the loop. Returns `false` if it was already running.
    pub(super) fn start(&mut self, commands: mpsc::WeakSender<SessionCommand>) -> bool {
        if self.is_dancing() {
            return false;
        }
        self.generation += 1;
        self.beat = 0;

        let generation = self.generation;
        self.task = Some(TaskHandle::repeating(self.interval, move || {
            let commands = commands.clone();
            async move { post(&commands, SessionCommand::Beat { generation }).await }
        }));
        true
    }

    /// Tones for a posted beat, or `None` if the beat belongs to a stopped loop.
    pub(super) fn on_beat(&mut self, generation: u64) -> Option<ArrayVec<Tone, 3>> {
        if !self.is_dancing() || generation != self.generation {
            return None;
        }
        let tones = freeze_dance_beat(self.beat);
        self.beat += 1;
        Some(tones)
    }

    /// Stops the loop, returning the number of beats played.
    pub(super) fn stop(&mut self) -> Option<u64> {
        self.task.take().map(|task| {
            task.cancel();
            self.beat
        })
    }
}
