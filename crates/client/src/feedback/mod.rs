//! Audio and speech backend for the terminal client.
//!
//! Speech goes through the system `espeak` binary; tones through rodio when
//! the `audio` feature is enabled and are only logged otherwise. Every
//! failure is absorbed and logged.

mod speech;
mod tones;

use game_core::Tone;
use runtime::FeedbackEngine;

pub use speech::Speech;
pub use tones::Tones;

/// Feedback engine combining [`Tones`] and [`Speech`].
#[derive(Default)]
pub struct ClientFeedback {
    tones: Tones,
    speech: Speech,
}

impl ClientFeedback {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FeedbackEngine for ClientFeedback {
    fn play_tone(&self, tone: Tone) {
        self.tones.play(tone);
    }

    fn speak(&self, text: &str) {
        self.speech.speak(text);
    }

    fn prime(&self) {
        self.tones.prime();
        self.speech.prime();
    }
}
