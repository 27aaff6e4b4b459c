//! Round generation: one target plus a shuffled set of candidate choices.

use arrayvec::ArrayVec;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::EngineConfig;
use crate::content::{AuthoredRound, ContentPool, Entry, GameContent};
use crate::error::RoundError;
use crate::kind::{GameKind, SelectionPolicy};

/// Choices presented in one round.
pub type Choices = ArrayVec<Entry, { EngineConfig::CHOICES_PER_ROUND }>;

/// One prompt-and-choices unit presented within a mini-game.
///
/// `correct` occurs exactly once in `choices` and no entry repeats.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Round {
    /// Monotonic per generator, starting at 1.
    pub sequence: u64,
    /// Position of the target within the game's content.
    pub index: usize,
    pub target: Entry,
    pub choices: Choices,
    pub correct: Entry,
}

impl Round {
    pub fn offers(&self, entry: &Entry) -> bool {
        self.choices.contains(entry)
    }

    /// Looks up an offered choice by label.
    pub fn choice(&self, label: &str) -> Option<&Entry> {
        self.choices.iter().find(|c| c.label == label)
    }

    pub fn is_correct(&self, entry: &Entry) -> bool {
        *entry == self.correct
    }
}

/// Produces rounds for a single game kind from its fixed content.
#[derive(Clone, Debug)]
pub struct RoundGenerator {
    kind: GameKind,
    content: GameContent,
    policy: SelectionPolicy,
    cursor: usize,
    sequence: u64,
}

impl RoundGenerator {
    pub fn new(kind: GameKind, content: GameContent) -> Result<Self, RoundError> {
        if !kind.is_round_based() {
            return Err(RoundError::NotRoundBased { kind });
        }
        Ok(Self {
            kind,
            content,
            policy: kind.selection_policy(),
            cursor: 0,
            sequence: 0,
        })
    }

    pub fn kind(&self) -> GameKind {
        self.kind
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Index the next cyclic round will target.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Moves the cyclic cursor so the next round targets `index`.
    pub fn seek(&mut self, index: usize) -> Result<(), RoundError> {
        let len = self.len();
        if index >= len {
            return Err(RoundError::CardOutOfRange { index, len });
        }
        self.cursor = index;
        Ok(())
    }

    /// Generates the next round, replacing `previous` entirely.
    pub fn next_round<R: Rng + ?Sized>(&mut self, rng: &mut R, previous: Option<&Round>) -> Round {
        let index = self.pick_index(rng, previous);
        self.sequence += 1;

        let (target, correct, mut choices) = match &self.content {
            GameContent::Pool(pool) => {
                let target = pool.entries()[index].clone();
                let choices = sample_choices(pool, index, rng);
                (target.clone(), target, choices)
            }
            GameContent::Authored(rounds) => authored_choices(&rounds[index]),
        };
        choices.shuffle(rng);

        Round {
            sequence: self.sequence,
            index,
            target,
            choices,
            correct,
        }
    }

    fn pick_index<R: Rng + ?Sized>(&mut self, rng: &mut R, previous: Option<&Round>) -> usize {
        let len = self.len();
        match self.policy {
            SelectionPolicy::Cyclic => {
                let index = self.cursor % len;
                self.cursor = (index + 1) % len;
                index
            }
            SelectionPolicy::Random => match previous {
                // Uniform over every entry except the previous target.
                Some(prev) if len > 1 && prev.index < len => {
                    let drawn = rng.gen_range(0..len - 1);
                    if drawn >= prev.index { drawn + 1 } else { drawn }
                }
                _ => rng.gen_range(0..len),
            },
        }
    }
}

fn sample_choices<R: Rng + ?Sized>(pool: &ContentPool, target: usize, rng: &mut R) -> Choices {
    let others: Vec<&Entry> = pool
        .entries()
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != target)
        .map(|(_, e)| e)
        .collect();
    let wanted = (EngineConfig::CHOICES_PER_ROUND - 1).min(others.len());

    let mut choices = Choices::new();
    choices.push(pool.entries()[target].clone());
    choices.extend(others.choose_multiple(rng, wanted).map(|e| (*e).clone()));
    choices
}

fn authored_choices(round: &AuthoredRound) -> (Entry, Entry, Choices) {
    let choices: Choices = round.options().iter().cloned().collect();
    (round.prompt().clone(), round.answer().clone(), choices)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn alphabet() -> GameContent {
        ContentPool::from_symbols("ABCDEFGHIJKLMNOPQRSTUVWXYZ")
            .unwrap()
            .into()
    }

    fn rhymes() -> GameContent {
        let w = Entry::new;
        GameContent::authored(vec![
            AuthoredRound::new(w("CAT"), w("BAT"), vec![w("BAT"), w("DOG"), w("SUN")]).unwrap(),
            AuthoredRound::new(w("FROG"), w("LOG"), vec![w("CAR"), w("LOG"), w("FISH")]).unwrap(),
        ])
        .unwrap()
    }

    fn assert_well_formed(round: &Round) {
        let labels: HashSet<&str> = round.choices.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels.len(), round.choices.len(), "duplicate choice in {round:?}");
        assert_eq!(
            round.choices.iter().filter(|c| **c == round.correct).count(),
            1,
            "correct choice missing in {round:?}"
        );
    }

    #[test]
    fn random_rounds_are_well_formed_and_never_repeat_target() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut generator = RoundGenerator::new(GameKind::Letters, alphabet()).unwrap();

        let mut previous = generator.next_round(&mut rng, None);
        for _ in 0..500 {
            assert_well_formed(&previous);
            assert_eq!(previous.choices.len(), 3);
            assert_eq!(previous.target, previous.correct);
            let next = generator.next_round(&mut rng, Some(&previous));
            assert_ne!(next.target, previous.target);
            assert_eq!(next.sequence, previous.sequence + 1);
            previous = next;
        }
    }

    #[test]
    fn small_pools_offer_what_they_have() {
        let mut rng = StdRng::seed_from_u64(1);
        let pool = ContentPool::from_symbols("XY").unwrap();
        let mut generator = RoundGenerator::new(GameKind::Stories, pool.into()).unwrap();
        let round = generator.next_round(&mut rng, None);
        assert_eq!(round.choices.len(), 2);
        assert_well_formed(&round);

        let single = ContentPool::from_symbols("Z").unwrap();
        let mut generator = RoundGenerator::new(GameKind::Stories, single.into()).unwrap();
        let first = generator.next_round(&mut rng, None);
        let second = generator.next_round(&mut rng, Some(&first));
        assert_eq!(first.target, second.target);
        assert_eq!(second.choices.len(), 1);
    }

    #[test]
    fn shuffle_reaches_every_position() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut generator = RoundGenerator::new(GameKind::Letters, alphabet()).unwrap();
        let mut positions = HashSet::new();
        for _ in 0..200 {
            let round = generator.next_round(&mut rng, None);
            let pos = round.choices.iter().position(|c| *c == round.correct).unwrap();
            positions.insert(pos);
        }
        assert_eq!(positions.len(), 3);
    }

    #[test]
    fn authored_rounds_cycle_and_wrap() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut generator = RoundGenerator::new(GameKind::Rhymes, rhymes()).unwrap();

        let first = generator.next_round(&mut rng, None);
        assert_eq!(first.index, 0);
        assert_eq!(first.target.label, "CAT");
        assert_eq!(first.correct.label, "BAT");
        assert_well_formed(&first);

        let second = generator.next_round(&mut rng, Some(&first));
        assert_eq!(second.index, 1);
        assert_eq!(second.correct.label, "LOG");

        let third = generator.next_round(&mut rng, Some(&second));
        assert_eq!(third.index, 0);
    }

    #[test]
    fn seek_moves_the_cyclic_cursor() {
        let mut rng = StdRng::seed_from_u64(5);
        let pool = ContentPool::from_symbols("ABCD").unwrap();
        let mut generator = RoundGenerator::new(GameKind::Flashcards, pool.into()).unwrap();

        generator.seek(3).unwrap();
        assert_eq!(generator.next_round(&mut rng, None).target.label, "D");
        assert_eq!(generator.cursor(), 0);
        assert_eq!(
            generator.seek(4),
            Err(RoundError::CardOutOfRange { index: 4, len: 4 })
        );
    }

    #[test]
    fn dance_has_no_generator() {
        let err = RoundGenerator::new(GameKind::Dance, alphabet()).unwrap_err();
        assert_eq!(err, RoundError::NotRoundBased { kind: GameKind::Dance });
    }
}
