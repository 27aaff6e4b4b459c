//! Feedback engine seam.
//!
//! Sessions compute [`Cue`]s; a [`FeedbackEngine`] turns them into sound. The
//! engine is shared by every session as `Arc<dyn FeedbackEngine>` and is
//! best-effort: implementations absorb and log their own failures.

use std::sync::{Mutex, PoisonError};

use game_core::{Cue, Tone};

/// Speaking rate applied to every utterance.
pub const SPEECH_RATE: f32 = 0.9;
/// Speaking pitch applied to every utterance.
pub const SPEECH_PITCH: f32 = 1.2;

/// Audio and speech output used by every session.
pub trait FeedbackEngine: Send + Sync {
    /// Plays one decaying tone. Tones may overlap.
    fn play_tone(&self, tone: Tone);

    /// Speaks `text`, cancelling any utterance still in progress.
    fn speak(&self, text: &str);

    /// Initializes output ahead of the first cue.
    fn prime(&self) {}

    fn play(&self, cue: &Cue) {
        match cue {
            Cue::Tone(tone) => self.play_tone(*tone),
            Cue::Speak(text) => self.speak(text),
        }
    }

    fn play_all(&self, cues: &[Cue]) {
        for cue in cues {
            self.play(cue);
        }
    }
}

/// Engine that drops every cue.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentFeedback;

impl FeedbackEngine for SilentFeedback {
    fn play_tone(&self, _tone: Tone) {}

    fn speak(&self, _text: &str) {}
}

/// One call observed by [`RecordingFeedback`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeedbackCall {
    Prime,
    Tone(Tone),
    Speak(String),
}

/// Engine that records calls in order, for tests and headless runs.
#[derive(Debug, Default)]
pub struct RecordingFeedback {
    calls: Mutex<Vec<FeedbackCall>>,
}

impl RecordingFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<FeedbackCall> {
        self.lock().clone()
    }

    pub fn tones(&self) -> Vec<Tone> {
        self.lock()
            .iter()
            .filter_map(|call| match call {
                FeedbackCall::Tone(tone) => Some(*tone),
                _ => None,
            })
            .collect()
    }

    pub fn utterances(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|call| match call {
                FeedbackCall::Speak(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// The utterance that would still be audible: the last one spoken.
    pub fn current_utterance(&self) -> Option<String> {
        self.utterances().pop()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    // Recording must keep working after a panicking test thread.
    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<FeedbackCall>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FeedbackEngine for RecordingFeedback {
    fn play_tone(&self, tone: Tone) {
        self.lock().push(FeedbackCall::Tone(tone));
    }

    fn speak(&self, text: &str) {
        self.lock().push(FeedbackCall::Speak(text.to_owned()));
    }

    fn prime(&self) {
        self.lock().push(FeedbackCall::Prime);
    }
}

#[cfg(test)]
mod tests {
    use game_core::Waveform;

    use super::*;

    #[test]
    fn play_all_preserves_order() {
        let feedback = RecordingFeedback::new();
        let tone = Tone::sine(600, 100);
        feedback.play_all(&[Cue::Tone(tone), Cue::Speak("Try again!".into())]);
        assert_eq!(
            feedback.calls(),
            vec![
                FeedbackCall::Tone(tone),
                FeedbackCall::Speak("Try again!".into())
            ]
        );
    }

    #[test]
    fn later_utterance_replaces_earlier() {
        let feedback = RecordingFeedback::new();
        feedback.speak("Find the letter B!");
        feedback.speak("Lickety Letters! That is B!");
        assert_eq!(
            feedback.current_utterance().as_deref(),
            Some("Lickety Letters! That is B!")
        );
        assert_eq!(feedback.utterances().len(), 2);
    }

    #[test]
    fn tones_filters_speech() {
        let feedback = RecordingFeedback::new();
        feedback.prime();
        feedback.play_tone(Tone::new(100, Waveform::Square, 100));
        feedback.speak("hi");
        assert_eq!(feedback.tones().len(), 1);
        assert_eq!(feedback.len(), 3);
        feedback.clear();
        assert!(feedback.is_empty());
    }
}
