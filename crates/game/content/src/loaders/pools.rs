//! Content pool loaders.

use std::path::Path;

use game_core::{AuthoredRound, ContentPool, GameContent};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Pool file structure for RON files.
///
/// ```ron
/// (entries: [(label: "DOG", glyph: Some("🐕")), (label: "CAT")])
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolFile {
    pub entries: ContentPool,
}

/// Rhyme book structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RhymeBook {
    pub rounds: Vec<AuthoredRound>,
}

/// Loader for sampled content pools.
pub struct PoolLoader;

impl PoolLoader {
    pub fn load(path: &Path) -> LoadResult<ContentPool> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<ContentPool> {
        let file: PoolFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse content pool RON: {}", e))?;
        Ok(file.entries)
    }
}

/// Loader for pre-authored rhyme rounds.
pub struct RhymeLoader;

impl RhymeLoader {
    pub fn load(path: &Path) -> LoadResult<GameContent> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<GameContent> {
        let book: RhymeBook = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse rhyme book RON: {}", e))?;
        Ok(GameContent::authored(book.rounds)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pool_with_optional_fields() {
        let pool = PoolLoader::parse(
            r#"(entries: [(label: "DOG", glyph: Some("🐕")), (label: "CAT")])"#,
        )
        .unwrap();
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.entries()[0].glyph.as_deref(), Some("🐕"));
        assert_eq!(pool.entries()[1].glyph, None);
    }

    #[test]
    fn rejects_duplicate_pool_entries() {
        let err = PoolLoader::parse(r#"(entries: [(label: "A"), (label: "A")])"#).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn parses_rhyme_book() {
        let content = RhymeLoader::parse(
            r#"(rounds: [
                (prompt: (label: "CAT"), answer: (label: "BAT"),
                 options: [(label: "BAT"), (label: "DOG"), (label: "SUN")]),
            ])"#,
        )
        .unwrap();
        assert_eq!(content.len(), 1);
    }

    #[test]
    fn rejects_rhyme_round_missing_answer() {
        let err = RhymeLoader::parse(
            r#"(rounds: [
                (prompt: (label: "CAT"), answer: (label: "BAT"),
                 options: [(label: "DOG"), (label: "SUN")]),
            ])"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("does not offer"));
    }
}
