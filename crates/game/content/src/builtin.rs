//! Content shipped with the app.

use game_core::{AuthoredRound, ContentPool, Entry, GameContent, PoolError};

pub const ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

fn card(label: &str, glyph: &str) -> Entry {
    Entry::new(label).with_glyph(glyph)
}

/// The 26 capital letters.
pub fn letters() -> Result<ContentPool, PoolError> {
    ContentPool::from_symbols(ALPHABET)
}

/// Story characters the hero can swap into the sentence.
pub fn stories() -> Result<ContentPool, PoolError> {
    ContentPool::new(vec![
        card("DOG", "🐕"),
        card("CAT", "🐈"),
        card("FROG", "🐸"),
        card("PIG", "🐖"),
    ])
}

/// Dancers shown while the rhythm loop plays.
pub fn dance_cast() -> Result<ContentPool, PoolError> {
    ContentPool::new(vec![
        card("Muno", "🔴"),
        card("Foofa", "🌸"),
        card("Brobee", "🥦"),
        card("Plex", "🤖"),
        card("Toodee", "🥶"),
    ])
}

pub fn flashcards() -> Result<ContentPool, PoolError> {
    ContentPool::new(vec![
        card("Isla", "👧"),
        card("Evie", "👶"),
        card("Truck", "🛻"),
        card("Dog", "🐕"),
        card("Cat", "🐈"),
        card("Apple", "🍎"),
    ])
}

/// Rhyme rounds with their pre-authored distractors.
pub fn rhymes() -> Result<GameContent, PoolError> {
    GameContent::authored(vec![
        AuthoredRound::new(
            card("CAT", "🐱").with_pair("BAT"),
            card("BAT", "🦇"),
            vec![card("BAT", "🦇"), card("DOG", "🐶"), card("SUN", "☀️")],
        )?,
        AuthoredRound::new(
            card("FROG", "🐸").with_pair("LOG"),
            card("LOG", "🪵"),
            vec![card("CAR", "🚗"), card("LOG", "🪵"), card("FISH", "🐟")],
        )?,
        AuthoredRound::new(
            card("HOUSE", "🏠").with_pair("MOUSE"),
            card("MOUSE", "🐭"),
            vec![card("TREE", "🌳"), card("MOUSE", "🐭"), card("BALL", "⚽")],
        )?,
        AuthoredRound::new(
            card("BEE", "🐝").with_pair("TREE"),
            card("TREE", "🌳"),
            vec![card("TREE", "🌳"), card("COW", "🐄"), card("CAR", "🚗")],
        )?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_pools_are_valid() {
        assert_eq!(letters().unwrap().len(), 26);
        assert_eq!(stories().unwrap().len(), 4);
        assert_eq!(dance_cast().unwrap().len(), 5);
        assert_eq!(flashcards().unwrap().len(), 6);
        assert_eq!(rhymes().unwrap().len(), 4);
    }

    #[test]
    fn rhyme_prompts_pair_with_their_answers() {
        let GameContent::Authored(rounds) = rhymes().unwrap() else {
            panic!("rhymes are authored");
        };
        for round in rounds.iter() {
            assert_eq!(round.prompt().pair.as_deref(), Some(round.answer().label.as_str()));
        }
    }
}
