//! Campaign host: one [`Progression`] plus the [`Session`] for the chapter
//! the player is standing in.
//!
//! The campaign owns the glue the engines and the controller do not know
//! about: opening a fresh session whenever the chapter changes, recording a
//! delivered win, regenerating after a delivered failure, and turning item
//! uses into reveals from the live instance.

use lantern_core::event::SessionEvent;
use lantern_core::fixed::Millis;
use lantern_core::id::{BallId, RacerId};
use lantern_core::instance::{Action, PuzzleInstance};
use lantern_core::puzzle::Step;
use lantern_core::rng::SimRng;
use lantern_core::session::{Session, SessionError, Timings};

use crate::catalog::{Catalog, Companion, Item, SkillHint};
use crate::progression::{ProgressEvent, Progression, Refusal};
use crate::store::SaveStore;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CampaignError {
    #[error("the current chapter has no puzzle")]
    NoPuzzle,
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// What an item showed the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemEffect {
    /// Racers that are certainly not in the top three.
    RevealedRacers(Vec<RacerId>),
    /// The odd ball.
    RevealedBall(BallId),
}

pub struct Campaign {
    progression: Progression,
    session: Option<Session>,
    timings: Timings,
    rng: SimRng,
}

impl Campaign {
    pub fn new(catalog: Catalog, store: Box<dyn SaveStore>, timings: Timings, seed: u64) -> Self {
        let mut campaign = Self {
            progression: Progression::load(catalog, store),
            session: None,
            timings,
            rng: SimRng::new(seed),
        };
        campaign.open_session();
        campaign
    }

    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    /// `None` on text chapters and at the ending.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn drain_events(&mut self) -> Vec<ProgressEvent> {
        self.progression.drain_events()
    }

    fn open_session(&mut self) {
        self.session = self
            .progression
            .current_puzzle()
            .map(|kind| Session::new(kind, self.rng.next_u64(), self.timings));
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// Navigate and open a fresh instance. Anything the old session still
    /// had scheduled is dropped with it.
    pub fn go_to_chapter(&mut self, target: usize, force: bool) -> bool {
        if !self.progression.go_to_chapter(target, force) {
            return false;
        }
        self.open_session();
        true
    }

    pub fn next_chapter(&mut self) -> bool {
        self.go_to_chapter(self.progression.current_index() + 1, false)
    }

    /// Leave a text chapter. Does nothing on a puzzle chapter.
    pub fn continue_story(&mut self) -> bool {
        match self.progression.current_chapter() {
            Some(chapter) if chapter.kind.is_text() => self.next_chapter(),
            _ => false,
        }
    }

    // -----------------------------------------------------------------------
    // Play
    // -----------------------------------------------------------------------

    pub fn act(&mut self, action: Action) -> Result<Step, CampaignError> {
        let session = self.session.as_mut().ok_or(CampaignError::NoPuzzle)?;
        Ok(session.act(action)?)
    }

    /// Run the session clock and apply every delivered outcome.
    pub fn advance(&mut self, ms: Millis) -> Vec<SessionEvent> {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        let events = session.advance(ms);
        for event in &events {
            match *event {
                SessionEvent::Won { optimized, .. } => self.record_win(optimized),
                SessionEvent::Failed { .. } => self.restart_level(),
                SessionEvent::Resolved { .. } => {}
            }
        }
        events
    }

    /// Advance until the current session has nothing pending.
    pub fn settle(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while let Some(session) = self.session.as_ref() {
            let Some(due) = session.next_due() else {
                break;
            };
            let wait = due.saturating_sub(session.now());
            events.extend(self.advance(wait));
        }
        events
    }

    fn record_win(&mut self, optimized: bool) {
        let index = self.progression.current_index();
        self.progression.complete_level(optimized);
        if self.progression.current_index() != index {
            self.open_session();
        }
    }

    /// Give up on the current instance: clear this chapter's item flags and
    /// generate a new hidden configuration.
    pub fn restart_level(&mut self) {
        if let Some(session) = self.session.as_mut() {
            self.progression
                .reset_level_items(self.progression.current_index());
            session.reset();
        }
    }

    /// Count the current puzzle as solved without a gear.
    pub fn skip_level(&mut self) -> bool {
        let index = self.progression.current_index();
        if !self.progression.complete_level(false) {
            return false;
        }
        if self.progression.current_index() != index {
            self.open_session();
        } else if let Some(session) = self.session.as_mut() {
            // A win already on its way would overwrite the skip.
            session.reset();
        }
        true
    }

    // -----------------------------------------------------------------------
    // Help
    // -----------------------------------------------------------------------

    pub fn use_item(&mut self, item: Item) -> Result<ItemEffect, Refusal> {
        if self.session.is_none() {
            return Err(Refusal::NotAPuzzle);
        }
        self.progression.use_item(item)?;
        let Some(session) = self.session.as_mut() else {
            return Err(Refusal::NotAPuzzle);
        };
        match session.puzzle_mut() {
            PuzzleInstance::Horses(p) => Ok(ItemEffect::RevealedRacers(p.magnifier_reveal())),
            PuzzleInstance::Balls(p) => Ok(ItemEffect::RevealedBall(p.magnet_reveal())),
            _ => Err(Refusal::WrongPuzzle),
        }
    }

    pub fn use_skill(&mut self, companion: Companion) -> Result<SkillHint, Refusal> {
        self.progression.use_skill(companion)
    }

    pub fn reset_journey(&mut self, skip_confirm: bool, confirm: impl FnOnce() -> bool) -> bool {
        if !self.progression.reset_journey(skip_confirm, confirm) {
            return false;
        }
        self.open_session();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ChapterId;
    use crate::rank::Rank;
    use crate::store::MemoryStore;
    use lantern_core::puzzle::{Advisory, PuzzleKind};
    use lantern_core::puzzles::{JugAction, SwitchAction};

    fn campaign() -> Campaign {
        Campaign::new(
            Catalog::standard(),
            Box::new(MemoryStore::new()),
            Timings::default(),
            7,
        )
    }

    fn pour(from: usize, to: usize) -> Action {
        Action::Jugs(JugAction::Pour { from, to })
    }

    #[test]
    fn intro_has_no_session() {
        let mut c = campaign();
        assert!(c.session().is_none());
        assert_eq!(
            c.act(Action::Jugs(JugAction::Undo)),
            Err(CampaignError::NoPuzzle)
        );
        assert!(c.continue_story());
        assert_eq!(c.session().map(Session::kind), Some(PuzzleKind::Switches));
        assert!(!c.continue_story());
    }

    #[test]
    fn wrong_kind_surfaces_session_error() {
        let mut c = campaign();
        c.continue_story();
        assert!(matches!(
            c.act(Action::Jugs(JugAction::Undo)),
            Err(CampaignError::Session(SessionError::KindMismatch { .. }))
        ));
    }

    #[test]
    fn delivered_win_completes_the_chapter() {
        let mut c = campaign();
        c.go_to_chapter(2, true);
        for (from, to) in [(0, 1), (1, 2), (2, 0), (1, 2), (0, 1), (1, 2)] {
            c.act(pour(from, to)).unwrap();
        }
        // Nothing is recorded until the outcome delay has elapsed.
        assert!(!c.progression().state().is_done(&ChapterId::new("c2")));
        c.advance(499);
        assert!(!c.progression().state().is_done(&ChapterId::new("c2")));
        c.advance(1);
        assert_eq!(c.progression().gear_count(), 1);
        assert!(c.drain_events().contains(&ProgressEvent::CompanionJoined(Companion::Robo)));
        assert!(c.next_chapter());
        assert_eq!(c.session().map(Session::kind), Some(PuzzleKind::Graph));
    }

    #[test]
    fn leaving_cancels_a_pending_win() {
        let mut c = campaign();
        c.go_to_chapter(2, true);
        for (from, to) in [(0, 1), (1, 2), (2, 0), (1, 2), (0, 1), (1, 2)] {
            c.act(pour(from, to)).unwrap();
        }
        c.go_to_chapter(1, true);
        c.settle();
        assert_eq!(c.progression().gear_count(), 0);
        assert!(!c.progression().state().is_done(&ChapterId::new("c2")));
    }

    #[test]
    fn delivered_failure_regenerates() {
        let mut c = campaign();
        c.continue_story();
        let before = c.session().unwrap().instance_id();
        c.act(Action::Switches(SwitchAction::EnterRoom)).unwrap();
        // The wiring is a permutation, so a repeated switch is always wrong.
        use lantern_core::puzzles::switches::Switch;
        let guess = [Some(Switch::A), Some(Switch::A), Some(Switch::A), Some(Switch::A)];
        let step = c.act(Action::Switches(SwitchAction::Submit(guess))).unwrap();
        assert!(step.outcome().is_some_and(|o| !o.solved));
        c.settle();
        let after = c.session().unwrap().instance_id();
        assert_ne!(before, after);
        assert!(!c.progression().state().is_done(&ChapterId::new("c1")));
    }

    #[test]
    fn skip_awards_no_gear() {
        let mut c = campaign();
        assert!(!c.skip_level());
        c.continue_story();
        assert!(c.skip_level());
        assert!(c.progression().state().is_done(&ChapterId::new("c1")));
        assert_eq!(c.progression().gear_count(), 0);
        assert!(c.progression().state().unlocked_companions.contains(&Companion::Dog));
    }

    #[test]
    fn skipping_the_last_puzzle_ends_the_journey() {
        let mut c = campaign();
        c.go_to_chapter(8, true);
        assert!(c.skip_level());
        assert!(c.progression().is_ending());
        assert!(c.session().is_none());
        assert!(
            c.drain_events()
                .contains(&ProgressEvent::EndingReached { rank: Rank::B })
        );
    }

    #[test]
    fn glass_reveals_four_outsiders() {
        let mut c = campaign();
        c.go_to_chapter(3, true);
        c.skip_level();
        c.go_to_chapter(7, true);
        let Ok(ItemEffect::RevealedRacers(ids)) = c.use_item(Item::Glass) else {
            panic!("glass should work in the horses chapter");
        };
        assert_eq!(ids.len(), 4);
        let PuzzleInstance::Horses(p) = c.session().unwrap().puzzle() else {
            panic!("expected horses");
        };
        let podium = p.podium();
        assert!(ids.iter().all(|id| !podium.contains(id)));
        assert_eq!(c.use_item(Item::Glass), Err(Refusal::AlreadyUsed));
        c.restart_level();
        assert!(c.use_item(Item::Glass).is_ok());
    }

    #[test]
    fn magnet_finds_the_odd_ball() {
        let mut c = campaign();
        c.go_to_chapter(6, true);
        c.skip_level();
        c.go_to_chapter(8, true);
        let effect = c.use_item(Item::Magnet).unwrap();
        let PuzzleInstance::Balls(p) = c.session().unwrap().puzzle() else {
            panic!("expected balls");
        };
        assert_eq!(effect, ItemEffect::RevealedBall(p.magnet_reveal()));
        assert_eq!(c.use_item(Item::Glass), Err(Refusal::NotOwned));
    }

    #[test]
    fn items_refused_outside_puzzles() {
        let mut c = campaign();
        assert_eq!(c.use_item(Item::Glass), Err(Refusal::NotAPuzzle));
        assert_eq!(c.use_skill(Companion::Dog), Err(Refusal::NotAPuzzle));
    }

    #[test]
    fn busy_session_rejects_input() {
        let mut c = campaign();
        c.go_to_chapter(4, true);
        use lantern_core::puzzles::{BridgeAction, Traveller};
        c.act(Action::River(BridgeAction::Select(Traveller::Dog))).unwrap();
        let step = c.act(Action::River(BridgeAction::Cross)).unwrap();
        assert!(matches!(step, Step::Pending(_)));
        assert_eq!(
            c.act(Action::River(BridgeAction::Select(Traveller::An))).unwrap(),
            Step::Rejected(Advisory::Busy)
        );
        c.settle();
        assert!(!c.session().unwrap().is_busy());
    }

    #[test]
    fn journey_reset_returns_to_intro() {
        let mut c = campaign();
        c.go_to_chapter(5, true);
        assert!(c.reset_journey(true, || false));
        assert_eq!(c.progression().current_index(), 0);
        assert!(c.session().is_none());
    }
}
