//! Night bridge: five travellers, one lantern, at most two on the planks.
//!
//! A group walks at the pace of its slowest member and the lantern must go
//! with it. Everyone has to be across within 30 seconds; the only schedule
//! that fits takes 29.

use serde::{Deserialize, Serialize};

use crate::puzzle::{
    Advisory, FollowUp, Meter, MeterKind, Puzzle, PuzzleKind, PuzzleOutcome, Step,
};
use crate::rng::SimRng;

pub const TIME_BUDGET: u32 = 30;
pub const GROUP_LIMIT: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Traveller {
    Dog,
    An,
    Guest,
    Bear,
    Robo,
}

impl Traveller {
    pub const ALL: [Traveller; 5] = [
        Traveller::Dog,
        Traveller::An,
        Traveller::Guest,
        Traveller::Bear,
        Traveller::Robo,
    ];

    /// Seconds this traveller needs to cross.
    pub fn pace(self) -> u32 {
        match self {
            Traveller::Dog => 1,
            Traveller::An => 3,
            Traveller::Guest => 6,
            Traveller::Bear => 8,
            Traveller::Robo => 12,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bank {
    Near,
    Far,
}

impl Bank {
    fn opposite(self) -> Bank {
        match self {
            Bank::Near => Bank::Far,
            Bank::Far => Bank::Near,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeAction {
    /// Add to or remove from the group waiting at the lantern.
    Select(Traveller),
    Cross,
}

#[derive(Debug, Clone)]
pub struct BridgePuzzle {
    sides: [Bank; 5],
    lamp: Bank,
    elapsed: u32,
    selected: Vec<Traveller>,
    in_transit: bool,
    outcome: Option<PuzzleOutcome>,
}

impl Default for BridgePuzzle {
    fn default() -> Self {
        Self::new()
    }
}

impl BridgePuzzle {
    pub fn new() -> Self {
        Self {
            sides: [Bank::Near; 5],
            lamp: Bank::Near,
            elapsed: 0,
            selected: Vec::with_capacity(GROUP_LIMIT),
            in_transit: false,
            outcome: None,
        }
    }

    pub fn side(&self, t: Traveller) -> Bank {
        self.sides[t.index()]
    }

    pub fn on_bank(&self, bank: Bank) -> Vec<Traveller> {
        Traveller::ALL
            .into_iter()
            .filter(|t| self.side(*t) == bank)
            .collect()
    }

    pub fn lamp(&self) -> Bank {
        self.lamp
    }

    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    pub fn selected(&self) -> &[Traveller] {
        &self.selected
    }

    pub fn in_transit(&self) -> bool {
        self.in_transit
    }

    fn select(&mut self, t: Traveller) -> Step {
        if self.side(t) != self.lamp {
            return Step::Rejected(Advisory::NoLamp);
        }
        if let Some(pos) = self.selected.iter().position(|s| *s == t) {
            self.selected.remove(pos);
            return Step::Applied;
        }
        if self.selected.len() >= GROUP_LIMIT {
            return Step::Rejected(Advisory::GroupFull);
        }
        self.selected.push(t);
        Step::Applied
    }

    fn land(&mut self) -> Step {
        let cost = self.selected.iter().map(|t| t.pace()).max().unwrap_or(0);
        let to = self.lamp.opposite();
        for t in self.selected.drain(..) {
            self.sides[t.index()] = to;
        }
        self.lamp = to;
        self.elapsed += cost;
        self.in_transit = false;

        let everyone_across = self.sides.iter().all(|s| *s == Bank::Far);
        let outcome = if everyone_across && self.elapsed <= TIME_BUDGET {
            // Only the 29 s schedule fits the budget, so any win is optimal.
            PuzzleOutcome::win(true)
        } else if self.elapsed > TIME_BUDGET {
            PuzzleOutcome::fail()
        } else {
            return Step::Applied;
        };
        self.outcome = Some(outcome);
        Step::Finished(outcome)
    }
}

impl Puzzle for BridgePuzzle {
    type Action = BridgeAction;

    const KIND: PuzzleKind = PuzzleKind::River;

    fn generate(_rng: &mut SimRng) -> Self {
        Self::new()
    }

    fn apply(&mut self, action: BridgeAction) -> Step {
        if self.outcome.is_some() {
            return Step::Rejected(Advisory::Finished);
        }
        if self.in_transit {
            return Step::Rejected(Advisory::Busy);
        }
        match action {
            BridgeAction::Select(t) => self.select(t),
            BridgeAction::Cross if self.selected.is_empty() => {
                Step::Rejected(Advisory::NobodySelected)
            }
            BridgeAction::Cross => {
                self.in_transit = true;
                Step::Pending(FollowUp::LandCrossing)
            }
        }
    }

    fn resolve(&mut self, follow_up: FollowUp) -> Step {
        match follow_up {
            FollowUp::LandCrossing if self.in_transit => self.land(),
            _ => Step::NoEffect(Advisory::Finished),
        }
    }

    fn outcome(&self) -> Option<PuzzleOutcome> {
        self.outcome
    }

    fn meter(&self) -> Meter {
        Meter::new(MeterKind::SecondsElapsed, self.elapsed, Some(TIME_BUDGET))
    }
}
