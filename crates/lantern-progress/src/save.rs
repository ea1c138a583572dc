//! The persisted save record and its versioned envelope.
//!
//! The record is written as JSON: `{"version": 2, "state": {...}}`. Older
//! records are upgraded through the [`MigrationRegistry`]; missing fields
//! take their defaults. Anything unreadable is replaced by a fresh
//! [`SaveState`], because a lost save must never stop the game.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::{ChapterId, Companion, Item};
use crate::migration::{MigrationError, MigrationRegistry};
use crate::store::{SaveStore, StoreError};

/// Current save format version.
pub const FORMAT_VERSION: u32 = 2;

/// Key the save record is stored under.
pub const SAVE_KEY: &str = "lantern.save";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("save from future version {0} (this build supports up to {FORMAT_VERSION})")]
    FutureVersion(u32),
    #[error("migration failed: {0}")]
    Migration(#[from] MigrationError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterProgress {
    pub done: bool,
    pub opt: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveState {
    pub current_index: usize,
    /// Always equal to the number of optimized entries in `progress`.
    pub gear_count: u32,
    pub progress: BTreeMap<ChapterId, ChapterProgress>,
    /// Chapters the player has opened at least once.
    pub visited: BTreeSet<ChapterId>,
    pub unlocked_companions: BTreeSet<Companion>,
    pub inventory: BTreeSet<Item>,
    /// Companions whose skill was used, per chapter index.
    pub used_skills: BTreeMap<usize, BTreeSet<Companion>>,
    /// Items used, per chapter index.
    pub used_items: BTreeMap<usize, BTreeSet<Item>>,
}

impl SaveState {
    pub fn optimized_count(&self) -> u32 {
        self.progress.values().filter(|p| p.opt).count() as u32
    }

    pub fn recompute_gears(&mut self) {
        self.gear_count = self.optimized_count();
    }

    pub fn is_done(&self, id: &ChapterId) -> bool {
        self.progress.get(id).is_some_and(|p| p.done)
    }

    pub fn skill_used(&self, index: usize, companion: Companion) -> bool {
        self.used_skills
            .get(&index)
            .is_some_and(|s| s.contains(&companion))
    }

    pub fn item_used(&self, index: usize, item: Item) -> bool {
        self.used_items.get(&index).is_some_and(|s| s.contains(&item))
    }

    /// Repair a loaded record: `opt` implies `done`, and the gear count is
    /// derived from the progress map. Returns `true` if anything changed.
    pub fn normalize(&mut self) -> bool {
        let mut changed = false;
        for p in self.progress.values_mut() {
            if p.opt && !p.done {
                p.done = true;
                changed = true;
            }
        }
        let gears = self.optimized_count();
        if gears != self.gear_count {
            log::warn!(
                "save gear count {} disagrees with progress ({gears}); recomputed",
                self.gear_count
            );
            self.gear_count = gears;
            changed = true;
        }
        changed
    }
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveEnvelope {
    pub version: u32,
    pub state: SaveState,
}

pub fn encode(state: &SaveState) -> Result<String, SaveError> {
    let envelope = SaveEnvelope {
        version: FORMAT_VERSION,
        state: state.clone(),
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Parse a stored record of any known version.
///
/// A record without a `version` field is a version 1 record.
pub fn decode(text: &str) -> Result<SaveState, SaveError> {
    let raw: Value = serde_json::from_str(text)?;
    let version = raw
        .get("version")
        .and_then(Value::as_u64)
        .map_or(1, |v| u32::try_from(v).unwrap_or(u32::MAX));
    if version > FORMAT_VERSION {
        return Err(SaveError::FutureVersion(version));
    }
    let current = MigrationRegistry::standard().migrate(raw, version, FORMAT_VERSION)?;
    let envelope: SaveEnvelope = serde_json::from_value(current)?;
    let mut state = envelope.state;
    state.normalize();
    Ok(state)
}

/// Read the save record, falling back to a fresh state on any failure.
pub fn load_or_default(store: &dyn SaveStore) -> SaveState {
    let text = match store.read(SAVE_KEY) {
        Ok(Some(text)) => text,
        Ok(None) => return SaveState::default(),
        Err(e) => {
            log::warn!("could not read save: {e}; starting fresh");
            return SaveState::default();
        }
    };
    match decode(&text) {
        Ok(state) => state,
        Err(e) => {
            log::warn!("discarding unreadable save: {e}");
            SaveState::default()
        }
    }
}

/// Write the whole record.
pub fn persist(store: &mut dyn SaveStore, state: &SaveState) -> Result<(), SaveError> {
    let text = encode(state)?;
    store.write(SAVE_KEY, &text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn sample() -> SaveState {
        let mut s = SaveState {
            current_index: 3,
            ..Default::default()
        };
        s.progress.insert(
            ChapterId::new("c1"),
            ChapterProgress { done: true, opt: true },
        );
        s.progress.insert(
            ChapterId::new("c2"),
            ChapterProgress { done: true, opt: false },
        );
        s.recompute_gears();
        s.unlocked_companions.insert(Companion::Dog);
        s.used_items.insert(3, BTreeSet::from([Item::Glass]));
        s
    }

    #[test]
    fn envelope_round_trip() {
        let s = sample();
        let text = encode(&s).unwrap();
        assert!(text.starts_with(r#"{"version":2,"#));
        assert_eq!(decode(&text).unwrap(), s);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let s = decode(r#"{"version": 2, "state": {"current_index": 4}}"#).unwrap();
        assert_eq!(s.current_index, 4);
        assert!(s.progress.is_empty());
        assert_eq!(s.gear_count, 0);
    }

    #[test]
    fn legacy_flat_record_migrates() {
        let v1 = r#"{"idx": 2, "gears": 1, "progress": {"c1": {"done": true, "opt": true}},
                     "visited": {"intro": true, "c1": true},
                     "unlockedCompanions": ["dog"], "inventory": [],
                     "usedSkills": {"1": ["dog"]}, "usedItems": {}}"#;
        let s = decode(v1).unwrap();
        assert_eq!(s.current_index, 2);
        assert_eq!(s.gear_count, 1);
        assert!(s.unlocked_companions.contains(&Companion::Dog));
        assert!(s.skill_used(1, Companion::Dog));
        assert!(s.visited.contains(&ChapterId::new("intro")));
        assert!(s.visited.contains(&ChapterId::new("c1")));
    }

    #[test]
    fn normalize_repairs_drift() {
        let text = r#"{"version": 2, "state": {"gear_count": 7,
            "progress": {"c1": {"done": false, "opt": true}}}}"#;
        let s = decode(text).unwrap();
        assert_eq!(s.gear_count, 1);
        assert!(s.is_done(&ChapterId::new("c1")));
    }

    #[test]
    fn future_and_corrupt_records_are_errors() {
        assert!(matches!(
            decode(r#"{"version": 9, "state": {}}"#),
            Err(SaveError::FutureVersion(9))
        ));
        assert!(matches!(
            decode(r#"{"version": 4294967298, "state": {}}"#),
            Err(SaveError::FutureVersion(u32::MAX))
        ));
        assert!(matches!(decode("{not json"), Err(SaveError::Json(_))));
        assert!(decode(r#"{"version": 2, "state": {"inventory": ["sword"]}}"#).is_err());
    }

    #[test]
    fn load_falls_back_to_default() {
        let store = MemoryStore::new();
        assert_eq!(load_or_default(&store), SaveState::default());
        store.insert(SAVE_KEY, "garbage");
        assert_eq!(load_or_default(&store), SaveState::default());

        let mut store = MemoryStore::new();
        persist(&mut store, &sample()).unwrap();
        assert_eq!(load_or_default(&store), sample());
    }
}
