//! Campaign-level helpers for tests and the headless example.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`.

use lantern_core::instance::{Action, PuzzleInstance};
use lantern_core::puzzle::Step;
use lantern_core::test_utils::{PuzzleDriver, solve};

use crate::campaign::Campaign;

impl PuzzleDriver for Campaign {
    fn puzzle(&self) -> &PuzzleInstance {
        self.session()
            .expect("driver used on a chapter without a puzzle")
            .puzzle()
    }

    fn act(&mut self, action: Action) -> Step {
        Campaign::act(self, action).expect("solver sent an action for the current chapter")
    }

    fn settle(&mut self) {
        Campaign::settle(self);
    }
}

/// Solve every remaining chapter optimally until the ending.
pub fn play_to_ending(campaign: &mut Campaign) {
    while !campaign.progression().is_ending() {
        if campaign.session().is_none() {
            assert!(campaign.continue_story(), "text chapter should lead on");
            continue;
        }
        let index = campaign.progression().current_index();
        let step = solve(campaign);
        assert!(
            step.outcome().is_some_and(|o| o.solved && o.optimized),
            "chapter {index} not solved optimally: {step:?}"
        );
        campaign.settle();
        if !campaign.progression().is_ending() {
            assert!(campaign.next_chapter(), "chapter {index} should unlock the next");
        }
    }
}
