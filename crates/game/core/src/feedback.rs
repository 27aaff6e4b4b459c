//! Audio/speech cue scripts for each mini-game.
//!
//! The engine never plays sound itself. Evaluations return an ordered list of
//! [`Cue`]s and the runtime hands them to whatever feedback backend is
//! installed.

use core::time::Duration;

use arrayvec::ArrayVec;

use crate::content::Entry;
use crate::kind::GameKind;
use crate::round::Round;

/// Oscillator shape of a synthesized tone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// A short tone with exponential decay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tone {
    pub frequency_hz: u32,
    pub waveform: Waveform,
    pub duration_ms: u32,
}

impl Tone {
    /// Gain at the start of every tone.
    pub const START_GAIN: f32 = 0.1;
    /// Gain reached at the end of the duration ("near-silence").
    pub const END_GAIN: f32 = 0.001;

    pub const fn new(frequency_hz: u32, waveform: Waveform, duration_ms: u32) -> Self {
        Self {
            frequency_hz,
            waveform,
            duration_ms,
        }
    }

    pub const fn sine(frequency_hz: u32, duration_ms: u32) -> Self {
        Self::new(frequency_hz, Waveform::Sine, duration_ms)
    }

    pub const fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms as u64)
    }
}

/// One feedback side effect, in the order it must be triggered.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Cue {
    Tone(Tone),
    Speak(String),
}

/// Per-game tones, phrases, and pacing.
///
/// Phrase templates substitute `{label}` with the relevant entry's label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackScript {
    pub success_tones: &'static [Tone],
    pub affirmation: &'static str,
    pub retry_tone: Tone,
    pub retry_phrase: &'static str,
    pub prompt: &'static str,
    pub transition_delay: Duration,
}

const DEFAULT_DELAY: Duration = Duration::from_millis(1500);

const LETTERS: FeedbackScript = FeedbackScript {
    success_tones: &[Tone::sine(600, 100), Tone::sine(800, 200)],
    affirmation: "Lickety Letters! That is {label}!",
    retry_tone: Tone::new(200, Waveform::Sawtooth, 200),
    retry_phrase: "Try again!",
    prompt: "Find the letter {label}!",
    transition_delay: DEFAULT_DELAY,
};

const RHYMES: FeedbackScript = FeedbackScript {
    success_tones: &[Tone::sine(500, 100), Tone::sine(700, 300)],
    affirmation: "Wonderiffic! They rhyme!",
    retry_tone: Tone::new(150, Waveform::Sawtooth, 200),
    retry_phrase: "Not quite!",
    prompt: "What rhymes with {label}?",
    transition_delay: Duration::from_millis(2000),
};

const STORIES: FeedbackScript = FeedbackScript {
    // second tone is the long "zap"
    success_tones: &[Tone::sine(600, 100), Tone::sine(800, 500)],
    affirmation: "Super Duper! The {label} jumps!",
    retry_tone: Tone::new(200, Waveform::Sawtooth, 200),
    retry_phrase: "Try again!",
    prompt: "Find the {label}!",
    transition_delay: DEFAULT_DELAY,
};

const FLASHCARDS: FeedbackScript = FeedbackScript {
    success_tones: &[Tone::sine(600, 100), Tone::sine(800, 200)],
    affirmation: "Yes! That is {label}!",
    retry_tone: Tone::new(200, Waveform::Sawtooth, 200),
    retry_phrase: "Try again!",
    prompt: "{label}",
    transition_delay: DEFAULT_DELAY,
};

impl FeedbackScript {
    /// Script for a round-based game; `None` for Dance.
    pub const fn for_kind(kind: GameKind) -> Option<&'static FeedbackScript> {
        match kind {
            GameKind::Letters => Some(&LETTERS),
            GameKind::Rhymes => Some(&RHYMES),
            GameKind::Stories => Some(&STORIES),
            GameKind::Flashcards => Some(&FLASHCARDS),
            GameKind::Dance => None,
        }
    }

    /// Ascending success tones followed by the affirmation for `correct`.
    pub fn success_cues(&self, correct: &Entry) -> Vec<Cue> {
        let mut cues: Vec<Cue> = self.success_tones.iter().copied().map(Cue::Tone).collect();
        cues.push(Cue::Speak(render(self.affirmation, correct)));
        cues
    }

    /// One low dissonant tone and a gentle retry phrase.
    pub fn retry_cues(&self) -> Vec<Cue> {
        vec![
            Cue::Tone(self.retry_tone),
            Cue::Speak(self.retry_phrase.to_owned()),
        ]
    }

    pub fn prompt_cue(&self, round: &Round) -> Cue {
        Cue::Speak(render(self.prompt, &round.target))
    }
}

fn render(template: &str, entry: &Entry) -> String {
    template.replace("{label}", &entry.label)
}

/// Tones for one beat of the freeze-dance loop.
///
/// Kick on every fourth beat, snare two beats later, hi-hat on every beat.
pub fn freeze_dance_beat(beat: u64) -> ArrayVec<Tone, 3> {
    let mut tones = ArrayVec::new();
    match beat % 4 {
        0 => tones.push(Tone::new(100, Waveform::Square, 100)),
        2 => tones.push(Tone::new(200, Waveform::Sawtooth, 100)),
        _ => {}
    }
    tones.push(Tone::new(800, Waveform::Triangle, 50));
    tones
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_tones_ascend() {
        for kind in [
            GameKind::Letters,
            GameKind::Rhymes,
            GameKind::Stories,
            GameKind::Flashcards,
        ] {
            let script = FeedbackScript::for_kind(kind).unwrap();
            let freqs: Vec<u32> = script.success_tones.iter().map(|t| t.frequency_hz).collect();
            assert_eq!(freqs.len(), 2, "{kind}");
            assert!(freqs[0] < freqs[1], "{kind}");
            assert!(script.retry_tone.frequency_hz < freqs[0], "{kind}");
        }
    }

    #[test]
    fn letters_affirmation_names_the_letter() {
        let script = FeedbackScript::for_kind(GameKind::Letters).unwrap();
        let cues = script.success_cues(&Entry::new("B"));
        assert_eq!(cues.len(), 3);
        assert_eq!(cues[2], Cue::Speak("Lickety Letters! That is B!".into()));
    }

    #[test]
    fn rhyme_script_pauses_longer() {
        let rhymes = FeedbackScript::for_kind(GameKind::Rhymes).unwrap();
        let letters = FeedbackScript::for_kind(GameKind::Letters).unwrap();
        assert_eq!(rhymes.transition_delay, Duration::from_millis(2000));
        assert_eq!(letters.transition_delay, Duration::from_millis(1500));
        assert_eq!(
            rhymes.retry_cues(),
            vec![
                Cue::Tone(Tone::new(150, Waveform::Sawtooth, 200)),
                Cue::Speak("Not quite!".into())
            ]
        );
    }

    #[test]
    fn dance_has_no_answer_script() {
        assert!(FeedbackScript::for_kind(GameKind::Dance).is_none());
    }

    #[test]
    fn dance_beat_pattern_repeats_every_four() {
        let counts: Vec<usize> = (0..8).map(|b| freeze_dance_beat(b).len()).collect();
        assert_eq!(counts, vec![2, 1, 2, 1, 2, 1, 2, 1]);
        assert_eq!(freeze_dance_beat(0)[0].waveform, Waveform::Square);
        assert_eq!(freeze_dance_beat(6)[0].waveform, Waveform::Sawtooth);
        assert!(
            (0..8).all(|b| freeze_dance_beat(b).last().map(|t| t.frequency_hz) == Some(800))
        );
    }
}
