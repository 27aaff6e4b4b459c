//! Per mini-game session state machine.
//!
//! ```text
//! Idle ──start_round──▶ RoundActive ──evaluate(correct)──▶ Transitioning
//!                         ▲    │                              │
//!                         │    └──evaluate(incorrect)──┐      │
//!                         └────────────────────────────┴──advance
//! any ──destroy──▶ Destroyed
//! ```
//!
//! The session is pure: it computes transitions and the cues to play, while
//! timers and audio are driven by the runtime.

use core::fmt;
use core::time::Duration;

use rand::Rng;

use crate::config::EngineConfig;
use crate::content::{Entry, GameContent};
use crate::error::SessionError;
use crate::feedback::{Cue, FeedbackScript};
use crate::kind::GameKind;
use crate::round::{Round, RoundGenerator};

/// Identifier of one displayed mini-game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SessionPhase {
    Idle,
    RoundActive,
    /// A correct answer was given; the next round is pending.
    Transitioning,
    Destroyed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    Correct,
    Incorrect,
}

/// Result of submitting one choice.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Evaluation {
    pub outcome: Outcome,
    /// Score after this evaluation.
    pub score: u32,
    /// Sequence of the round that was answered.
    pub round_sequence: u64,
    /// Feedback to trigger, in order.
    pub cues: Vec<Cue>,
    /// Pause before the next round; `Some` only for correct answers.
    pub transition_delay: Option<Duration>,
}

impl Evaluation {
    pub fn is_correct(&self) -> bool {
        self.outcome == Outcome::Correct
    }
}

/// State of one mini-game while it is displayed.
#[derive(Clone, Debug)]
pub struct GameSession {
    id: SessionId,
    kind: GameKind,
    phase: SessionPhase,
    round: Option<Round>,
    score: u32,
    generator: Option<RoundGenerator>,
    config: EngineConfig,
}

impl GameSession {
    pub fn new(
        id: SessionId,
        kind: GameKind,
        content: GameContent,
        config: EngineConfig,
    ) -> Result<Self, SessionError> {
        let generator = if kind.is_round_based() {
            Some(RoundGenerator::new(kind, content)?)
        } else {
            None
        };

        Ok(Self {
            id,
            kind,
            phase: SessionPhase::Idle,
            round: None,
            score: 0,
            generator,
            config,
        })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn kind(&self) -> GameKind {
        self.kind
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn current_round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.phase != SessionPhase::Destroyed
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Presents a fresh round, replacing the current one entirely.
    pub fn start_round<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&Round, SessionError> {
        self.ensure_alive()?;
        let generator = self.generator.as_mut().ok_or(SessionError::Unsupported {
            kind: self.kind,
            operation: "rounds",
        })?;

        let round = generator.next_round(rng, self.round.as_ref());
        self.phase = SessionPhase::RoundActive;
        Ok(self.round.insert(round))
    }

    /// Evaluates an offered choice against the current round.
    pub fn evaluate(&mut self, choice: &Entry) -> Result<Evaluation, SessionError> {
        self.ensure_alive()?;
        let script = self.script("answers")?;
        match self.phase {
            SessionPhase::RoundActive => {}
            SessionPhase::Transitioning => return Err(SessionError::AwaitingNextRound),
            phase => return Err(SessionError::NoActiveRound { phase }),
        }
        let round = self
            .round
            .as_ref()
            .ok_or(SessionError::NoActiveRound { phase: self.phase })?;
        if !round.offers(choice) {
            return Err(SessionError::ChoiceNotOffered {
                label: choice.label.clone(),
            });
        }

        let round_sequence = round.sequence;
        if round.is_correct(choice) {
            let cues = script.success_cues(&round.correct);
            self.score += 1;
            self.phase = SessionPhase::Transitioning;
            Ok(Evaluation {
                outcome: Outcome::Correct,
                score: self.score,
                round_sequence,
                cues,
                transition_delay: Some(self.config.transition_delay(script.transition_delay)),
            })
        } else {
            Ok(Evaluation {
                outcome: Outcome::Incorrect,
                score: self.score,
                round_sequence,
                cues: script.retry_cues(),
                transition_delay: None,
            })
        }
    }

    /// Evaluates the offered choice whose label is `label`.
    pub fn evaluate_label(&mut self, label: &str) -> Result<Evaluation, SessionError> {
        let choice = self
            .round
            .as_ref()
            .and_then(|r| r.choice(label))
            .cloned()
            .unwrap_or_else(|| Entry::new(label));
        self.evaluate(&choice)
    }

    /// Completes a pending transition for the round answered at `sequence`.
    ///
    /// Returns `Ok(None)` when the transition is stale (the round was already
    /// replaced, e.g. by browsing).
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        sequence: u64,
    ) -> Result<Option<&Round>, SessionError> {
        self.ensure_alive()?;
        let pending = self.phase == SessionPhase::Transitioning
            && self.round.as_ref().map(|r| r.sequence) == Some(sequence);
        if !pending {
            return Ok(None);
        }
        self.start_round(rng).map(Some)
    }

    /// Steps through the flashcard deck by `step` cards, wrapping at both ends.
    pub fn browse<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        step: isize,
    ) -> Result<&Round, SessionError> {
        self.ensure_alive()?;
        if self.kind != GameKind::Flashcards {
            return Err(SessionError::Unsupported {
                kind: self.kind,
                operation: "browsing",
            });
        }
        let generator = self.generator.as_mut().ok_or(SessionError::Unsupported {
            kind: self.kind,
            operation: "browsing",
        })?;

        let len = generator.len() as isize;
        let current = self.round.as_ref().map_or(0, |r| r.index) as isize;
        let index = (current + step).rem_euclid(len) as usize;
        generator.seek(index)?;
        self.start_round(rng)
    }

    /// Spoken prompt for the current round.
    pub fn prompt_cue(&self) -> Option<Cue> {
        let script = FeedbackScript::for_kind(self.kind)?;
        self.round.as_ref().map(|r| script.prompt_cue(r))
    }

    /// Terminal transition. Idempotent.
    pub fn destroy(&mut self) {
        self.phase = SessionPhase::Destroyed;
        self.round = None;
    }

    fn ensure_alive(&self) -> Result<(), SessionError> {
        if self.phase == SessionPhase::Destroyed {
            return Err(SessionError::Destroyed);
        }
        Ok(())
    }

    fn script(&self, operation: &'static str) -> Result<&'static FeedbackScript, SessionError> {
        FeedbackScript::for_kind(self.kind).ok_or(SessionError::Unsupported {
            kind: self.kind,
            operation,
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::content::{AuthoredRound, ContentPool};

    fn letters() -> GameSession {
        let pool = ContentPool::from_symbols("ABCDEFGHIJKLMNOPQRSTUVWXYZ").unwrap();
        GameSession::new(
            SessionId(1),
            GameKind::Letters,
            pool.into(),
            EngineConfig::default(),
        )
        .unwrap()
    }

    fn wrong_choice(round: &Round) -> Entry {
        round
            .choices
            .iter()
            .find(|c| **c != round.correct)
            .cloned()
            .unwrap()
    }

    #[test]
    fn starts_idle_without_round() {
        let session = letters();
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.current_round().is_none());
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn incorrect_keeps_round_and_score() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut session = letters();
        let round = session.start_round(&mut rng).unwrap().clone();

        let eval = session.evaluate(&wrong_choice(&round)).unwrap();
        assert_eq!(eval.outcome, Outcome::Incorrect);
        assert_eq!(eval.score, 0);
        assert_eq!(eval.transition_delay, None);
        assert_eq!(session.current_round(), Some(&round));
        assert_eq!(session.phase(), SessionPhase::RoundActive);
    }

    #[test]
    fn correct_scores_once_and_waits_for_advance() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut session = letters();
        let round = session.start_round(&mut rng).unwrap().clone();

        let eval = session.evaluate(&round.correct).unwrap();
        assert!(eval.is_correct());
        assert_eq!(eval.score, 1);
        assert_eq!(eval.transition_delay, Some(Duration::from_millis(1500)));
        assert_eq!(session.phase(), SessionPhase::Transitioning);

        // no double scoring while the pause runs
        assert_eq!(
            session.evaluate(&round.correct),
            Err(SessionError::AwaitingNextRound)
        );

        let next = session.advance(&mut rng, round.sequence).unwrap().cloned().unwrap();
        assert_ne!(next.target, round.target);
        assert_eq!(next.sequence, round.sequence + 1);
        assert_eq!(session.phase(), SessionPhase::RoundActive);
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn stale_advance_is_ignored() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut session = letters();
        let round = session.start_round(&mut rng).unwrap().clone();
        assert_eq!(session.advance(&mut rng, round.sequence).unwrap(), None);
        assert_eq!(session.current_round(), Some(&round));
    }

    #[test]
    fn rejects_choices_not_offered() {
        let mut rng = StdRng::seed_from_u64(14);
        let mut session = letters();
        let round = session.start_round(&mut rng).unwrap().clone();
        let outsider = ('A'..='Z')
            .map(|c| Entry::new(c.to_string()))
            .find(|e| !round.offers(e))
            .unwrap();
        let err = session.evaluate(&outsider).unwrap_err();
        assert!(matches!(err, SessionError::ChoiceNotOffered { .. }));
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn destroyed_session_refuses_everything() {
        let mut rng = StdRng::seed_from_u64(15);
        let mut session = letters();
        let round = session.start_round(&mut rng).unwrap().clone();
        session.evaluate(&round.correct).unwrap();
        session.destroy();

        assert_eq!(
            session.advance(&mut rng, round.sequence),
            Err(SessionError::Destroyed)
        );
        assert_eq!(session.evaluate(&round.correct), Err(SessionError::Destroyed));
        assert!(session.current_round().is_none());
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn rhyme_round_zero_then_one_then_wrap() {
        let w = Entry::new;
        let content = GameContent::authored(vec![
            AuthoredRound::new(w("CAT"), w("BAT"), vec![w("BAT"), w("DOG"), w("SUN")]).unwrap(),
            AuthoredRound::new(w("BEE"), w("TREE"), vec![w("TREE"), w("COW"), w("CAR")]).unwrap(),
        ])
        .unwrap();
        let mut rng = StdRng::seed_from_u64(16);
        let mut session =
            GameSession::new(SessionId(2), GameKind::Rhymes, content, EngineConfig::default())
                .unwrap();

        let round = session.start_round(&mut rng).unwrap().clone();
        assert_eq!(round.index, 0);
        assert_eq!(
            session.evaluate_label("DOG").unwrap().outcome,
            Outcome::Incorrect
        );
        let eval = session.evaluate_label("BAT").unwrap();
        assert_eq!(eval.transition_delay, Some(Duration::from_millis(2000)));

        let next = session.advance(&mut rng, round.sequence).unwrap().cloned().unwrap();
        assert_eq!(next.index, 1);
        session.evaluate_label("TREE").unwrap();
        let wrapped = session.advance(&mut rng, next.sequence).unwrap().cloned().unwrap();
        assert_eq!(wrapped.index, 0);
    }

    #[test]
    fn flashcards_browse_wraps_both_ways() {
        let pool = ContentPool::from_symbols("ABC").unwrap();
        let mut rng = StdRng::seed_from_u64(17);
        let mut session = GameSession::new(
            SessionId(3),
            GameKind::Flashcards,
            pool.into(),
            EngineConfig::default(),
        )
        .unwrap();
        assert_eq!(session.start_round(&mut rng).unwrap().index, 0);
        assert_eq!(session.browse(&mut rng, -1).unwrap().target.label, "C");
        assert_eq!(session.browse(&mut rng, 1).unwrap().target.label, "A");
        assert_eq!(
            session.prompt_cue(),
            Some(Cue::Speak("A".into()))
        );
    }

    #[test]
    fn dance_session_has_no_rounds() {
        let cast = ContentPool::from_symbols("MF").unwrap();
        let mut rng = StdRng::seed_from_u64(18);
        let mut session = GameSession::new(
            SessionId(4),
            GameKind::Dance,
            cast.into(),
            EngineConfig::default(),
        )
        .unwrap();
        assert!(matches!(
            session.start_round(&mut rng),
            Err(SessionError::Unsupported { .. })
        ));
        assert!(matches!(
            session.evaluate(&Entry::new("M")),
            Err(SessionError::Unsupported { .. })
        ));
    }

    #[test]
    fn transition_delay_override_applies() {
        let pool = ContentPool::from_symbols("AB").unwrap();
        let config = EngineConfig::default().with_transition_delay(Duration::from_millis(10));
        let mut rng = StdRng::seed_from_u64(19);
        let mut session =
            GameSession::new(SessionId(5), GameKind::Letters, pool.into(), config).unwrap();
        let correct = session.start_round(&mut rng).unwrap().correct.clone();
        let eval = session.evaluate(&correct).unwrap();
        assert_eq!(eval.transition_delay, Some(Duration::from_millis(10)));
    }
}
