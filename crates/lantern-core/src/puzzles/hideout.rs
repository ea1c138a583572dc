//! Hideout: a cat hides in one of five boxes in a row and, every night,
//! moves to a neighbouring box. Each day the player may open one box.
//!
//! The engine tracks every history of cat positions that is still consistent
//! with the boxes opened so far. One of those histories is the committed
//! truth; whenever an inspection would expose it early, the cat slips to
//! another consistent history, so only a forced sweep catches it.

use std::collections::BTreeSet;

use crate::puzzle::{Advisory, Meter, MeterKind, Puzzle, PuzzleKind, PuzzleOutcome, Step};
use crate::rng::SimRng;

pub const BOXES: u8 = 5;
pub const TURN_BUDGET: u32 = 10;
pub const OPTIMAL_TURNS: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HideoutAction {
    /// Open box 1..=5.
    Inspect(u8),
}

#[derive(Debug, Clone)]
pub struct HideoutPuzzle {
    candidates: Vec<Vec<u8>>,
    truth: Vec<u8>,
    inspected: Vec<u8>,
    turn: u32,
    rng: SimRng,
    outcome: Option<PuzzleOutcome>,
}

impl HideoutPuzzle {
    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn inspected(&self) -> &[u8] {
        &self.inspected
    }

    pub fn candidates(&self) -> &[Vec<u8>] {
        &self.candidates
    }

    /// Boxes the cat could be in right now.
    pub fn candidate_positions(&self) -> BTreeSet<u8> {
        self.candidates.iter().filter_map(|p| p.last().copied()).collect()
    }

    /// The cat's route, once the attempt is over.
    pub fn reveal(&self) -> Option<&[u8]> {
        self.outcome.map(|_| self.truth.as_slice())
    }

    fn steps_from(pos: u8) -> impl Iterator<Item = u8> {
        [pos.wrapping_sub(1), pos + 1]
            .into_iter()
            .filter(|p| (1..=BOXES).contains(p))
    }

    fn inspect(&mut self, target: u8) -> Step {
        if !(1..=BOXES).contains(&target) {
            return Step::Rejected(Advisory::OutOfRange);
        }
        self.turn += 1;
        self.inspected.push(target);

        let survivors: Vec<Vec<u8>> = self
            .candidates
            .drain(..)
            .filter(|p| p.last() != Some(&target))
            .collect();

        if survivors.is_empty() {
            let outcome = PuzzleOutcome::win(self.turn <= OPTIMAL_TURNS);
            self.outcome = Some(outcome);
            return Step::Finished(outcome);
        }

        if self.truth.last() == Some(&target) {
            let pick = self.rng.below(survivors.len() as u64) as usize;
            self.truth = survivors[pick].clone();
        }

        if self.turn >= TURN_BUDGET {
            self.candidates = survivors;
            let outcome = PuzzleOutcome::fail();
            self.outcome = Some(outcome);
            return Step::Finished(outcome);
        }

        let mut next = Vec::with_capacity(survivors.len() * 2);
        for path in survivors {
            let Some(&pos) = path.last() else { continue };
            for step in Self::steps_from(pos) {
                let mut branch = path.clone();
                branch.push(step);
                next.push(branch);
            }
        }
        self.candidates = next;

        if let Some(&pos) = self.truth.last() {
            let options: Vec<u8> = Self::steps_from(pos).collect();
            if let Some(&step) = self.rng.choose(&options) {
                self.truth.push(step);
            }
        }
        Step::Applied
    }
}

impl Puzzle for HideoutPuzzle {
    type Action = HideoutAction;

    const KIND: PuzzleKind = PuzzleKind::Cat;

    fn generate(rng: &mut SimRng) -> Self {
        let mut own = rng.fork();
        let start = own.range_inclusive(1, BOXES as u32) as u8;
        Self {
            candidates: (1..=BOXES).map(|b| vec![b]).collect(),
            truth: vec![start],
            inspected: Vec::new(),
            turn: 0,
            rng: own,
            outcome: None,
        }
    }

    fn apply(&mut self, action: HideoutAction) -> Step {
        if self.outcome.is_some() {
            return Step::Rejected(Advisory::Finished);
        }
        match action {
            HideoutAction::Inspect(b) => self.inspect(b),
        }
    }

    fn outcome(&self) -> Option<PuzzleOutcome> {
        self.outcome
    }

    fn meter(&self) -> Meter {
        Meter::new(
            MeterKind::InspectionsLeft,
            TURN_BUDGET.saturating_sub(self.turn),
            Some(TURN_BUDGET),
        )
    }
}
