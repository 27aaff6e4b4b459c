//! Sample generator for feedback tones.
//!
//! Produces mono `f32` samples for a [`Tone`]: the oscillator shape at the
//! tone's frequency, shaped by an exponential ramp from [`Tone::START_GAIN`]
//! down to [`Tone::END_GAIN`] over the tone's duration. Audio backends wrap
//! this iterator; it has no hardware dependency.

use core::f32::consts::TAU;

use crate::feedback::{Tone, Waveform};

#[derive(Clone, Debug)]
pub struct ToneSynth {
    tone: Tone,
    sample_rate: u32,
    position: u64,
    total: u64,
}

impl ToneSynth {
    pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

    pub fn new(tone: Tone, sample_rate: u32) -> Self {
        let sample_rate = sample_rate.max(1);
        let total = u64::from(sample_rate) * u64::from(tone.duration_ms) / 1000;
        Self {
            tone,
            sample_rate,
            position: 0,
            total,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Total number of samples the tone spans.
    pub fn total_samples(&self) -> u64 {
        self.total
    }

    /// Amplitude envelope at `seconds` from the start of the tone.
    pub fn gain_at(&self, seconds: f32) -> f32 {
        let duration = self.tone.duration_ms as f32 / 1000.0;
        if duration <= 0.0 {
            return Tone::END_GAIN;
        }
        let progress = (seconds / duration).clamp(0.0, 1.0);
        Tone::START_GAIN * (Tone::END_GAIN / Tone::START_GAIN).powf(progress)
    }

    fn oscillator(&self, seconds: f32) -> f32 {
        let phase = (self.tone.frequency_hz as f32 * seconds).fract();
        match self.tone.waveform {
            Waveform::Sine => (TAU * phase).sin(),
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => 2.0 * phase - 1.0,
            Waveform::Triangle => 4.0 * (phase - 0.5).abs() - 1.0,
        }
    }
}

impl Iterator for ToneSynth {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.position >= self.total {
            return None;
        }
        let seconds = self.position as f32 / self.sample_rate as f32;
        self.position += 1;
        Some(self.oscillator(seconds) * self.gain_at(seconds))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.total - self.position) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ToneSynth {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_matches_duration() {
        let synth = ToneSynth::new(Tone::sine(600, 100), 8_000);
        assert_eq!(synth.len(), 800);
        assert_eq!(synth.count(), 800);
    }

    #[test]
    fn envelope_decays_exponentially_to_near_silence() {
        let synth = ToneSynth::new(Tone::sine(440, 200), 8_000);
        assert!((synth.gain_at(0.0) - Tone::START_GAIN).abs() < 1e-6);
        assert!((synth.gain_at(0.2) - Tone::END_GAIN).abs() < 1e-6);
        // halfway through an exponential ramp sits at the geometric mean
        let mid = (Tone::START_GAIN * Tone::END_GAIN).sqrt();
        assert!((synth.gain_at(0.1) - mid).abs() < 1e-5);
    }

    #[test]
    fn samples_stay_within_start_gain() {
        for waveform in [
            Waveform::Sine,
            Waveform::Square,
            Waveform::Sawtooth,
            Waveform::Triangle,
        ] {
            let synth = ToneSynth::new(Tone::new(200, waveform, 50), 8_000);
            assert!(synth.into_iter().all(|s| s.abs() <= Tone::START_GAIN + 1e-6));
        }
    }
}
