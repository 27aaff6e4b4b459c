use core::time::Duration;

/// Engine configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Interval between beats of the freeze-dance cue loop, in milliseconds.
    pub rhythm_interval_ms: u64,

    /// Overrides every game's post-answer pause when set.
    /// `None` keeps the per-game delay from its feedback script.
    pub transition_delay_ms: Option<u64>,
}

impl EngineConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of choices presented in one round.
    pub const CHOICES_PER_ROUND: usize = 3;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_RHYTHM_INTERVAL_MS: u64 = 400;

    pub fn new() -> Self {
        Self {
            rhythm_interval_ms: Self::DEFAULT_RHYTHM_INTERVAL_MS,
            transition_delay_ms: None,
        }
    }

    pub fn with_transition_delay(mut self, delay: Duration) -> Self {
        self.transition_delay_ms = Some(delay.as_millis() as u64);
        self
    }

    pub fn rhythm_interval(&self) -> Duration {
        Duration::from_millis(self.rhythm_interval_ms.max(1))
    }

    /// Resolves the pause before the next round, honoring the override.
    pub fn transition_delay(&self, script_delay: Duration) -> Duration {
        self.transition_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(script_delay)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
