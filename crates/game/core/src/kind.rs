//! Mini-game identities and their round selection policies.

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Every mini-game shipped in the arcade.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum GameKind {
    /// Find the spoken letter among three.
    Letters,
    /// Pick the word that rhymes with the prompt.
    Rhymes,
    /// Find the story character.
    Stories,
    /// Freeze dance: a rhythmic cue loop, no rounds.
    Dance,
    /// Picture cards browsed in order, quizzed one card at a time.
    Flashcards,
}

/// How a generator picks the next target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SelectionPolicy {
    /// Uniform draw, never repeating the previous target when avoidable.
    Random,
    /// Fixed cyclical index that wraps after the last entry.
    Cyclic,
}

impl GameKind {
    /// Dance is the only kind without prompt-and-choices rounds.
    pub const fn is_round_based(self) -> bool {
        !matches!(self, GameKind::Dance)
    }

    pub const fn selection_policy(self) -> SelectionPolicy {
        match self {
            GameKind::Letters | GameKind::Stories | GameKind::Dance => SelectionPolicy::Random,
            GameKind::Rhymes | GameKind::Flashcards => SelectionPolicy::Cyclic,
        }
    }

    /// Title shown on the menu card.
    pub const fn title(self) -> &'static str {
        match self {
            GameKind::Letters => "Alpha Pig's Letters",
            GameKind::Rhymes => "Wonder Red's Rhymes",
            GameKind::Stories => "Super Why Story Power",
            GameKind::Dance => "Gabba Freeze Dance",
            GameKind::Flashcards => "Flash Cards",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("letters".parse::<GameKind>(), Ok(GameKind::Letters));
        assert_eq!("RHYMES".parse::<GameKind>(), Ok(GameKind::Rhymes));
        assert!("math".parse::<GameKind>().is_err());
    }

    #[test]
    fn only_dance_is_roundless() {
        let roundless: Vec<_> = GameKind::iter().filter(|k| !k.is_round_based()).collect();
        assert_eq!(roundless, vec![GameKind::Dance]);
    }
}
