//! Chapter catalog and the unlock table carried on each chapter.
//!
//! The catalog is static content: an ordered list of chapters, the first of
//! which is narrative-only. Each puzzle chapter names the engine it runs and
//! may grant companions or items when completed.

use std::collections::HashSet;
use std::fmt;

use lantern_core::puzzle::PuzzleKind;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChapterId(pub String);

impl ChapterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChapterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a chapter presents: story text only, or one puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ChapterKind {
    Text,
    Puzzle(PuzzleKind),
}

impl ChapterKind {
    pub fn puzzle(self) -> Option<PuzzleKind> {
        match self {
            ChapterKind::Text => None,
            ChapterKind::Puzzle(kind) => Some(kind),
        }
    }

    pub fn is_text(self) -> bool {
        self == ChapterKind::Text
    }
}

impl TryFrom<String> for ChapterKind {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_str() {
            "text" | "none" => Ok(ChapterKind::Text),
            other => other
                .parse::<PuzzleKind>()
                .map(ChapterKind::Puzzle)
                .map_err(|e| e.to_string()),
        }
    }
}

impl From<ChapterKind> for String {
    fn from(kind: ChapterKind) -> Self {
        match kind {
            ChapterKind::Text => "text".to_owned(),
            ChapterKind::Puzzle(p) => p.as_str().to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// Companions and items
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Companion {
    Dog,
    Robo,
    Bear,
}

/// The kind of help a companion offers. The wording lives with the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillHint {
    /// A nudge toward the next move.
    Hint,
    /// A walk-through of the method.
    Guide,
    /// The arithmetic behind the optimal answer.
    Math,
}

impl Companion {
    pub fn skill(self) -> SkillHint {
        match self {
            Companion::Dog => SkillHint::Hint,
            Companion::Bear => SkillHint::Guide,
            Companion::Robo => SkillHint::Math,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Item {
    /// Magnifying glass: clears four racers from contention.
    Glass,
    /// Magnet: finds the odd ball.
    Magnet,
}

impl Item {
    /// The only puzzle this item works in.
    pub fn target(self) -> PuzzleKind {
        match self {
            Item::Glass => PuzzleKind::Horses,
            Item::Magnet => PuzzleKind::Balls,
        }
    }
}

/// Granted once when a chapter is completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unlock {
    Companion(Companion),
    Item(Item),
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterRecord {
    pub id: ChapterId,
    pub kind: ChapterKind,
    #[serde(default)]
    pub unlocks: Vec<Unlock>,
}

impl ChapterRecord {
    pub fn text(id: &str) -> Self {
        Self {
            id: ChapterId::new(id),
            kind: ChapterKind::Text,
            unlocks: Vec::new(),
        }
    }

    pub fn puzzle(id: &str, kind: PuzzleKind, unlocks: Vec<Unlock>) -> Self {
        Self {
            id: ChapterId::new(id),
            kind: ChapterKind::Puzzle(kind),
            unlocks,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog has no chapters")]
    Empty,
    #[error("first chapter {0} must be a text chapter")]
    IntroNotText(ChapterId),
    #[error("duplicate chapter id {0}")]
    DuplicateId(ChapterId),
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Ordered, immutable list of chapters. Index `len()` is the ending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    chapters: Vec<ChapterRecord>,
}

impl Catalog {
    pub fn new(chapters: Vec<ChapterRecord>) -> Result<Self, CatalogError> {
        let first = chapters.first().ok_or(CatalogError::Empty)?;
        if !first.kind.is_text() {
            return Err(CatalogError::IntroNotText(first.id.clone()));
        }
        let mut seen = HashSet::new();
        for chapter in &chapters {
            if !seen.insert(&chapter.id) {
                return Err(CatalogError::DuplicateId(chapter.id.clone()));
            }
        }
        Ok(Self { chapters })
    }

    /// The shipped journey: an intro followed by eight puzzle chapters.
    pub fn standard() -> Self {
        use Companion::*;
        use PuzzleKind::*;
        Self {
            chapters: vec![
                ChapterRecord::text("intro"),
                ChapterRecord::puzzle("c1", Switches, vec![Unlock::Companion(Dog)]),
                ChapterRecord::puzzle("c2", Jugs, vec![Unlock::Companion(Robo)]),
                ChapterRecord::puzzle(
                    "c3",
                    Graph,
                    vec![Unlock::Companion(Bear), Unlock::Item(Item::Glass)],
                ),
                ChapterRecord::puzzle("c4", River, Vec::new()),
                ChapterRecord::puzzle("c5", Cat, Vec::new()),
                ChapterRecord::puzzle("c6", Spider, vec![Unlock::Item(Item::Magnet)]),
                ChapterRecord::puzzle("c7", Horses, Vec::new()),
                ChapterRecord::puzzle("c8", Balls, Vec::new()),
            ],
        }
    }

    pub fn chapters(&self) -> &[ChapterRecord] {
        &self.chapters
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ChapterRecord> {
        self.chapters.get(index)
    }

    pub fn index_of(&self, id: &ChapterId) -> Option<usize> {
        self.chapters.iter().position(|c| &c.id == id)
    }

    /// The index past the last chapter.
    pub fn ending_index(&self) -> usize {
        self.chapters.len()
    }

    pub fn last_puzzle_index(&self) -> Option<usize> {
        self.chapters.iter().rposition(|c| !c.kind.is_text())
    }

    pub fn puzzle_count(&self) -> usize {
        self.chapters.iter().filter(|c| !c.kind.is_text()).count()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_shape() {
        let c = Catalog::standard();
        assert_eq!(c.len(), 9);
        assert_eq!(c.ending_index(), 9);
        assert_eq!(c.puzzle_count(), 8);
        assert_eq!(c.last_puzzle_index(), Some(8));
        assert!(c.get(0).unwrap().kind.is_text());
        assert_eq!(c.get(5).unwrap().kind.puzzle(), Some(PuzzleKind::Cat));
        assert_eq!(c.index_of(&ChapterId::new("c6")), Some(6));
        assert_eq!(
            c.get(3).unwrap().unlocks,
            vec![Unlock::Companion(Companion::Bear), Unlock::Item(Item::Glass)]
        );
    }

    #[test]
    fn validation() {
        assert_eq!(Catalog::new(Vec::new()), Err(CatalogError::Empty));
        assert_eq!(
            Catalog::new(vec![ChapterRecord::puzzle("c1", PuzzleKind::Jugs, Vec::new())]),
            Err(CatalogError::IntroNotText(ChapterId::new("c1")))
        );
        assert_eq!(
            Catalog::new(vec![ChapterRecord::text("a"), ChapterRecord::text("a")]),
            Err(CatalogError::DuplicateId(ChapterId::new("a")))
        );
    }

    #[test]
    fn records_deserialize_from_json() {
        let json = r#"[
            {"id": "intro", "kind": "none"},
            {"id": "c1", "kind": "switches", "unlocks": [{"companion": "dog"}]},
            {"id": "c2", "kind": "balls", "unlocks": [{"item": "magnet"}]}
        ]"#;
        let records: Vec<ChapterRecord> = serde_json::from_str(json).unwrap();
        let catalog = Catalog::new(records).unwrap();
        assert_eq!(
            catalog.get(1).unwrap().unlocks,
            vec![Unlock::Companion(Companion::Dog)]
        );
        assert_eq!(catalog.get(2).unwrap().kind, ChapterKind::Puzzle(PuzzleKind::Balls));
        let bad = r#"{"id": "x", "kind": "chess"}"#;
        assert!(serde_json::from_str::<ChapterRecord>(bad).is_err());
    }

    #[test]
    fn skills_and_item_targets() {
        assert_eq!(Companion::Dog.skill(), SkillHint::Hint);
        assert_eq!(Companion::Bear.skill(), SkillHint::Guide);
        assert_eq!(Companion::Robo.skill(), SkillHint::Math);
        assert_eq!(Item::Glass.target(), PuzzleKind::Horses);
        assert_eq!(Item::Magnet.target(), PuzzleKind::Balls);
    }
}
