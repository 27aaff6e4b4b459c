//! Text-to-speech through an `espeak` subprocess.

use std::process::{Child, Command, Stdio};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use runtime::api::feedback::{SPEECH_PITCH, SPEECH_RATE};
use tracing::{debug, warn};

const PROGRAM: &str = "espeak";
const BASE_WORDS_PER_MINUTE: f32 = 175.0;
const BASE_PITCH: f32 = 50.0;

/// One utterance at a time; a new one kills the previous.
pub struct Speech {
    current: Mutex<Option<Child>>,
    available: AtomicBool,
}

impl Default for Speech {
    fn default() -> Self {
        Self {
            current: Mutex::new(None),
            available: AtomicBool::new(true),
        }
    }
}

impl Speech {
    /// Wake the speech channel with an empty utterance.
    pub fn prime(&self) {
        self.speak("");
    }

    pub fn speak(&self, text: &str) {
        if !self.available.load(Ordering::Relaxed) {
            debug!("speech unavailable, dropping: {}", text);
            return;
        }
        let Ok(mut current) = self.current.lock() else {
            warn!("speech lock poisoned");
            return;
        };
        cancel(current.take());

        let spawned = Command::new(PROGRAM)
            .arg("-s")
            .arg(((BASE_WORDS_PER_MINUTE * SPEECH_RATE) as u32).to_string())
            .arg("-p")
            .arg(((BASE_PITCH * SPEECH_PITCH) as u32).to_string())
            .arg(text)
            // The play loop reads answers from our stdin.
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            Ok(child) => *current = Some(child),
            Err(e) => {
                warn!("{} could not start ({}); speech disabled", PROGRAM, e);
                self.available.store(false, Ordering::Relaxed);
            }
        }
    }
}

impl Drop for Speech {
    fn drop(&mut self) {
        if let Ok(current) = self.current.get_mut() {
            cancel(current.take());
        }
    }
}

fn cancel(child: Option<Child>) {
    if let Some(mut child) = child {
        // Already exited is fine.
        let _ = child.kill();
        let _ = child.wait();
    }
}
