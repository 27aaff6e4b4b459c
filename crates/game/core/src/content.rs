//! Content records consumed by the round generators.
//!
//! Content is immutable once assembled and shared read-only between every
//! session of the same game kind; cloning a pool only bumps a reference count.

use std::collections::HashSet;
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::error::PoolError;

/// One item a child can be asked about or pick.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entry {
    /// Symbol or word, e.g. `"B"` or `"CAT"`. Unique within a pool.
    pub label: String,
    /// Display emoji.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub glyph: Option<String>,
    /// Paired rhyme or translation.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub pair: Option<String>,
}

impl Entry {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            glyph: None,
            pair: None,
        }
    }

    #[must_use]
    pub fn with_glyph(mut self, glyph: impl Into<String>) -> Self {
        self.glyph = Some(glyph.into());
        self
    }

    #[must_use]
    pub fn with_pair(mut self, pair: impl Into<String>) -> Self {
        self.pair = Some(pair.into());
        self
    }
}

/// Ordered, non-empty sequence of entries with unique labels.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<Entry>", into = "Vec<Entry>"))]
pub struct ContentPool {
    entries: Arc<[Entry]>,
}

impl ContentPool {
    pub fn new(entries: Vec<Entry>) -> Result<Self, PoolError> {
        if entries.is_empty() {
            return Err(PoolError::Empty);
        }
        ensure_unique(&entries, |label| PoolError::DuplicateEntry {
            label: label.to_owned(),
        })?;
        Ok(Self {
            entries: entries.into(),
        })
    }

    /// Builds a pool of single-character entries, one per `char`.
    pub fn from_symbols(symbols: &str) -> Result<Self, PoolError> {
        Self::new(symbols.chars().map(|c| Entry::new(c.to_string())).collect())
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a constructed pool; kept for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.label == label)
    }
}

impl TryFrom<Vec<Entry>> for ContentPool {
    type Error = PoolError;

    fn try_from(entries: Vec<Entry>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

impl From<ContentPool> for Vec<Entry> {
    fn from(pool: ContentPool) -> Self {
        pool.entries.to_vec()
    }
}

/// A hand-written round whose distractors are fixed rather than sampled.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "RawAuthoredRound", into = "RawAuthoredRound")
)]
pub struct AuthoredRound {
    prompt: Entry,
    answer: Entry,
    options: Vec<Entry>,
}

impl AuthoredRound {
    /// `options` must contain `answer` exactly once and no duplicates.
    pub fn new(prompt: Entry, answer: Entry, options: Vec<Entry>) -> Result<Self, PoolError> {
        if options.len() > EngineConfig::CHOICES_PER_ROUND {
            return Err(PoolError::TooManyOptions {
                prompt: prompt.label,
                count: options.len(),
                max: EngineConfig::CHOICES_PER_ROUND,
            });
        }
        ensure_unique(&options, |label| PoolError::DuplicateOption {
            prompt: prompt.label.clone(),
            label: label.to_owned(),
        })?;
        if !options.contains(&answer) {
            return Err(PoolError::AnswerNotOffered {
                prompt: prompt.label,
                answer: answer.label,
            });
        }
        Ok(Self {
            prompt,
            answer,
            options,
        })
    }

    pub fn prompt(&self) -> &Entry {
        &self.prompt
    }

    pub fn answer(&self) -> &Entry {
        &self.answer
    }

    pub fn options(&self) -> &[Entry] {
        &self.options
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct RawAuthoredRound {
    prompt: Entry,
    answer: Entry,
    options: Vec<Entry>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawAuthoredRound> for AuthoredRound {
    type Error = PoolError;

    fn try_from(raw: RawAuthoredRound) -> Result<Self, Self::Error> {
        Self::new(raw.prompt, raw.answer, raw.options)
    }
}

#[cfg(feature = "serde")]
impl From<AuthoredRound> for RawAuthoredRound {
    fn from(round: AuthoredRound) -> Self {
        Self {
            prompt: round.prompt,
            answer: round.answer,
            options: round.options,
        }
    }
}

/// Content backing one game kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameContent {
    /// Targets and distractors are drawn from the pool.
    Pool(ContentPool),
    /// Pre-authored rounds played in order.
    Authored(Arc<[AuthoredRound]>),
}

impl GameContent {
    pub fn authored(rounds: Vec<AuthoredRound>) -> Result<Self, PoolError> {
        if rounds.is_empty() {
            return Err(PoolError::Empty);
        }
        let prompts: Vec<Entry> = rounds.iter().map(|r| r.prompt.clone()).collect();
        ensure_unique(&prompts, |label| PoolError::DuplicateEntry {
            label: label.to_owned(),
        })?;
        Ok(Self::Authored(rounds.into()))
    }

    /// Number of distinct targets (pool entries or authored rounds).
    pub fn len(&self) -> usize {
        match self {
            GameContent::Pool(pool) => pool.len(),
            GameContent::Authored(rounds) => rounds.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<ContentPool> for GameContent {
    fn from(pool: ContentPool) -> Self {
        GameContent::Pool(pool)
    }
}

fn ensure_unique(entries: &[Entry], err: impl Fn(&str) -> PoolError) -> Result<(), PoolError> {
    let mut seen = HashSet::with_capacity(entries.len());
    for entry in entries {
        if !seen.insert(entry.label.as_str()) {
            return Err(err(&entry.label));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(label: &str) -> Entry {
        Entry::new(label)
    }

    #[test]
    fn rejects_empty_and_duplicate_pools() {
        assert_eq!(ContentPool::new(vec![]), Err(PoolError::Empty));
        assert_eq!(
            ContentPool::new(vec![word("A"), word("B"), word("A")]),
            Err(PoolError::DuplicateEntry { label: "A".into() })
        );
    }

    #[test]
    fn symbols_become_single_letter_entries() {
        let pool = ContentPool::from_symbols("ABC").unwrap();
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.get(1), Some(&word("B")));
        assert_eq!(pool.position("C"), Some(2));
    }

    #[test]
    fn authored_round_must_offer_its_answer() {
        let err = AuthoredRound::new(word("CAT"), word("BAT"), vec![word("DOG"), word("SUN")])
            .unwrap_err();
        assert!(matches!(err, PoolError::AnswerNotOffered { .. }));

        let err = AuthoredRound::new(
            word("CAT"),
            word("BAT"),
            vec![word("BAT"), word("BAT"), word("SUN")],
        )
        .unwrap_err();
        assert!(matches!(err, PoolError::DuplicateOption { .. }));
    }

    #[test]
    fn authored_round_caps_option_count() {
        let err = AuthoredRound::new(
            word("CAT"),
            word("BAT"),
            vec![word("BAT"), word("DOG"), word("SUN"), word("HAT")],
        )
        .unwrap_err();
        assert!(matches!(err, PoolError::TooManyOptions { count: 4, .. }));
    }
}
