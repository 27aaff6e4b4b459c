//! Content for every game kind, keyed by [`GameKind`].

use std::collections::BTreeMap;

use game_core::{GameContent, GameKind, PoolError};
use strum::IntoEnumIterator;

use crate::builtin;

/// Read-only content library handed to the runtime.
///
/// Cloning is cheap: pools are reference counted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Library {
    content: BTreeMap<GameKind, GameContent>,
}

impl Library {
    /// Library with no content; use [`Library::with_content`] to populate.
    pub fn empty() -> Self {
        Self {
            content: BTreeMap::new(),
        }
    }

    /// Content shipped with the app for every game kind.
    pub fn builtin() -> Result<Self, PoolError> {
        let mut library = Self::empty();
        for kind in GameKind::iter() {
            library.content.insert(kind, Self::builtin_for(kind)?);
        }
        Ok(library)
    }

    pub fn builtin_for(kind: GameKind) -> Result<GameContent, PoolError> {
        Ok(match kind {
            GameKind::Letters => builtin::letters()?.into(),
            GameKind::Rhymes => builtin::rhymes()?,
            GameKind::Stories => builtin::stories()?.into(),
            GameKind::Dance => builtin::dance_cast()?.into(),
            GameKind::Flashcards => builtin::flashcards()?.into(),
        })
    }

    #[must_use]
    pub fn with_content(mut self, kind: GameKind, content: GameContent) -> Self {
        self.content.insert(kind, content);
        self
    }

    pub fn content(&self, kind: GameKind) -> Option<&GameContent> {
        self.content.get(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = GameKind> + '_ {
        self.content.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use game_core::ContentPool;

    use super::*;

    #[test]
    fn builtin_covers_every_kind() {
        let library = Library::builtin().unwrap();
        assert_eq!(library.kinds().count(), GameKind::iter().count());
        assert!(matches!(
            library.content(GameKind::Rhymes),
            Some(GameContent::Authored(_))
        ));
    }

    #[test]
    fn with_content_replaces_one_kind() {
        let pool = ContentPool::from_symbols("AB").unwrap();
        let library = Library::builtin()
            .unwrap()
            .with_content(GameKind::Letters, pool.clone().into());
        assert_eq!(
            library.content(GameKind::Letters),
            Some(&GameContent::Pool(pool))
        );
    }
}
