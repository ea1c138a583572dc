//! Progression controller: chapter navigation, completion, rewards.
//!
//! [`Progression`] is the single writer of the [`SaveState`]. Every mutating
//! call re-persists the whole record through the [`SaveStore`]; a failed
//! write is logged and play continues from memory.
//!
//! Completion is recorded against the *current* chapter. The gear count is
//! recomputed from the full progress map on every completion, and unlocks
//! are applied at most once. Notable changes are buffered as
//! [`ProgressEvent`]s for the host to drain.

use lantern_core::puzzle::PuzzleKind;

use crate::catalog::{Catalog, ChapterKind, ChapterRecord, Companion, Item, SkillHint, Unlock};
use crate::rank::Rank;
use crate::save::{self, ChapterProgress, SAVE_KEY, SaveState};
use crate::store::SaveStore;

// ---------------------------------------------------------------------------
// Events and refusals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    ChapterCompleted { index: usize, optimized: bool },
    CompanionJoined(Companion),
    ItemFound(Item),
    EndingReached { rank: Rank },
    JourneyReset,
}

/// Why an item or skill could not be used right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    /// The current chapter has no puzzle.
    NotAPuzzle,
    NotOwned,
    AlreadyUsed,
    /// The item does nothing in this puzzle.
    WrongPuzzle,
}

// ---------------------------------------------------------------------------
// Progression
// ---------------------------------------------------------------------------

pub struct Progression {
    catalog: Catalog,
    state: SaveState,
    store: Box<dyn SaveStore>,
    events: Vec<ProgressEvent>,
}

impl Progression {
    /// Load the saved journey from `store`, or start a fresh one.
    pub fn load(catalog: Catalog, store: Box<dyn SaveStore>) -> Self {
        let mut state = save::load_or_default(store.as_ref());
        if state.current_index > catalog.ending_index() {
            log::warn!(
                "saved chapter index {} is past the ending; clamping",
                state.current_index
            );
            state.current_index = catalog.ending_index();
        }
        Self {
            catalog,
            state,
            store,
            events: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn state(&self) -> &SaveState {
        &self.state
    }

    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    pub fn gear_count(&self) -> u32 {
        self.state.gear_count
    }

    /// `None` once the ending has been reached.
    pub fn current_chapter(&self) -> Option<&ChapterRecord> {
        self.catalog.get(self.state.current_index)
    }

    pub fn current_puzzle(&self) -> Option<PuzzleKind> {
        self.current_chapter().and_then(|c| c.kind.puzzle())
    }

    pub fn is_ending(&self) -> bool {
        self.state.current_index >= self.catalog.ending_index()
    }

    pub fn rank(&self) -> Rank {
        Rank::from_gears(self.state.gear_count)
    }

    pub fn drain_events(&mut self) -> Vec<ProgressEvent> {
        std::mem::take(&mut self.events)
    }

    fn persist(&mut self) {
        if let Err(e) = save::persist(self.store.as_mut(), &self.state) {
            log::error!("failed to persist save: {e}");
        }
    }

    /// Whether `target` may be opened without forcing.
    ///
    /// Index 0 and anything at or before the current index are always open;
    /// otherwise the chapter before `target` must be done or be text-only.
    pub fn can_enter(&self, target: usize) -> bool {
        if target > self.catalog.ending_index() {
            return false;
        }
        if target == 0 || target <= self.state.current_index {
            return true;
        }
        match self.catalog.get(target - 1) {
            Some(prev) => prev.kind.is_text() || self.state.is_done(&prev.id),
            None => false,
        }
    }

    /// Navigate to `target`. Returns `false`, changing nothing, when the
    /// chapter is locked and `force` is not set.
    pub fn go_to_chapter(&mut self, target: usize, force: bool) -> bool {
        if target > self.catalog.ending_index() {
            return false;
        }
        if !force && !self.can_enter(target) {
            log::debug!("chapter {target} is locked");
            return false;
        }
        self.state.current_index = target;
        if let Some(chapter) = self.catalog.get(target) {
            self.state.visited.insert(chapter.id.clone());
        }
        self.persist();
        if self.is_ending() {
            let rank = self.rank();
            log::info!(
                "journey complete with {} gears, rank {}",
                self.state.gear_count,
                rank.label()
            );
            self.events.push(ProgressEvent::EndingReached { rank });
        } else {
            log::debug!("entered chapter {target}");
        }
        true
    }

    pub fn next_chapter(&mut self) -> bool {
        self.go_to_chapter(self.state.current_index + 1, false)
    }

    /// Record the current chapter as completed.
    ///
    /// Text chapters and the ending are ignored. Completing the last puzzle
    /// chapter moves straight to the ending.
    pub fn complete_level(&mut self, optimized: bool) -> bool {
        let index = self.state.current_index;
        let Some(chapter) = self.catalog.get(index) else {
            return false;
        };
        if chapter.kind == ChapterKind::Text {
            return false;
        }
        let id = chapter.id.clone();
        let unlocks = chapter.unlocks.clone();

        self.state.progress.insert(
            id.clone(),
            ChapterProgress {
                done: true,
                opt: optimized,
            },
        );
        self.state.recompute_gears();
        log::debug!(
            "completed {id} (optimized={optimized}), gears now {}",
            self.state.gear_count
        );
        self.events.push(ProgressEvent::ChapterCompleted { index, optimized });

        for unlock in unlocks {
            match unlock {
                Unlock::Companion(c) => {
                    if self.state.unlocked_companions.insert(c) {
                        log::debug!("{c:?} joined");
                        self.events.push(ProgressEvent::CompanionJoined(c));
                    }
                }
                Unlock::Item(item) => {
                    if self.state.inventory.insert(item) {
                        log::debug!("found {item:?}");
                        self.events.push(ProgressEvent::ItemFound(item));
                    }
                }
            }
        }
        self.persist();

        if self.catalog.last_puzzle_index() == Some(index) {
            self.go_to_chapter(self.catalog.ending_index(), true);
        }
        true
    }

    /// Check and mark a one-shot item use in the current chapter.
    pub fn use_item(&mut self, item: Item) -> Result<(), Refusal> {
        let index = self.state.current_index;
        let kind = self.current_puzzle().ok_or(Refusal::NotAPuzzle)?;
        if !self.state.inventory.contains(&item) {
            return Err(Refusal::NotOwned);
        }
        if item.target() != kind {
            return Err(Refusal::WrongPuzzle);
        }
        if self.state.item_used(index, item) {
            return Err(Refusal::AlreadyUsed);
        }
        self.state.used_items.entry(index).or_default().insert(item);
        self.persist();
        Ok(())
    }

    /// Check and mark a one-shot companion skill in the current chapter.
    pub fn use_skill(&mut self, companion: Companion) -> Result<SkillHint, Refusal> {
        let index = self.state.current_index;
        self.current_puzzle().ok_or(Refusal::NotAPuzzle)?;
        if !self.state.unlocked_companions.contains(&companion) {
            return Err(Refusal::NotOwned);
        }
        if self.state.skill_used(index, companion) {
            return Err(Refusal::AlreadyUsed);
        }
        self.state
            .used_skills
            .entry(index)
            .or_default()
            .insert(companion);
        self.persist();
        Ok(companion.skill())
    }

    /// Forget which items were used in chapter `index`. Skill flags stay.
    pub fn reset_level_items(&mut self, index: usize) {
        if self.state.used_items.remove(&index).is_some() {
            log::debug!("item flags for chapter {index} cleared");
        }
        self.persist();
    }

    /// Wipe all progress and return to the first chapter.
    ///
    /// Unless `skip_confirm` is set, `confirm` is asked first and a `false`
    /// answer cancels the reset.
    pub fn reset_journey(&mut self, skip_confirm: bool, confirm: impl FnOnce() -> bool) -> bool {
        if !skip_confirm && !confirm() {
            return false;
        }
        if let Err(e) = self.store.remove(SAVE_KEY) {
            log::error!("failed to clear save: {e}");
        }
        self.state = SaveState::default();
        self.events.push(ProgressEvent::JourneyReset);
        log::info!("journey reset");
        self.go_to_chapter(0, true)
    }
}
