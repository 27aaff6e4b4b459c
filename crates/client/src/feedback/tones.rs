//! Tone output.

use game_core::Tone;

#[cfg(feature = "audio")]
pub use device::Tones;

#[cfg(not(feature = "audio"))]
pub use logged::Tones;

#[cfg(not(feature = "audio"))]
mod logged {
    use super::Tone;

    /// Stand-in used when the binary is built without audio output.
    #[derive(Default)]
    pub struct Tones;

    impl Tones {
        pub fn prime(&self) {}

        pub fn play(&self, tone: Tone) {
            tracing::debug!(
                "tone {} Hz {:?} {} ms",
                tone.frequency_hz,
                tone.waveform,
                tone.duration_ms
            );
        }
    }
}

#[cfg(feature = "audio")]
mod device {
    use std::sync::OnceLock;
    use std::sync::mpsc;
    use std::time::Duration;

    use game_core::ToneSynth;
    use rodio::{OutputStream, Source};
    use tracing::{debug, warn};

    use super::Tone;

    /// Tones played on a dedicated audio thread.
    ///
    /// The output stream is opened lazily on first use and lives for the rest
    /// of the process.
    #[derive(Default)]
    pub struct Tones {
        output: OnceLock<mpsc::Sender<Tone>>,
    }

    impl Tones {
        pub fn prime(&self) {
            self.sender();
        }

        pub fn play(&self, tone: Tone) {
            if self.sender().send(tone).is_err() {
                debug!("audio output unavailable, dropping tone");
            }
        }

        fn sender(&self) -> &mpsc::Sender<Tone> {
            self.output.get_or_init(|| {
                let (tx, rx) = mpsc::channel::<Tone>();
                let spawned = std::thread::Builder::new()
                    .name("treehouse-audio".into())
                    .spawn(move || run_output(rx));
                if let Err(e) = spawned {
                    warn!("audio thread failed to start: {}", e);
                }
                tx
            })
        }
    }

    // OutputStream is not Send, so it stays on this thread.
    fn run_output(tones: mpsc::Receiver<Tone>) {
        let (_stream, handle) = match OutputStream::try_default() {
            Ok(output) => output,
            Err(e) => {
                warn!("no audio output device: {}", e);
                return;
            }
        };
        for tone in tones {
            if let Err(e) = handle.play_raw(ToneSource::new(tone)) {
                warn!("tone playback failed: {}", e);
            }
        }
    }

    struct ToneSource {
        synth: ToneSynth,
        duration: Duration,
    }

    impl ToneSource {
        fn new(tone: Tone) -> Self {
            Self {
                synth: ToneSynth::new(tone, ToneSynth::DEFAULT_SAMPLE_RATE),
                duration: tone.duration(),
            }
        }
    }

    impl Iterator for ToneSource {
        type Item = f32;

        fn next(&mut self) -> Option<f32> {
            self.synth.next()
        }
    }

    impl Source for ToneSource {
        fn current_frame_len(&self) -> Option<usize> {
            None
        }

        fn channels(&self) -> u16 {
            1
        }

        fn sample_rate(&self) -> u32 {
            self.synth.sample_rate()
        }

        fn total_duration(&self) -> Option<Duration> {
            Some(self.duration)
        }
    }
}
