//! Jug pouring: split eight litres into a measured four using jugs of
//! 8, 5 and 3. Every pour is recorded so it can be undone.

use crate::puzzle::{Advisory, Meter, MeterKind, Puzzle, PuzzleKind, PuzzleOutcome, Step};
use crate::rng::SimRng;

pub const CAPACITIES: [u32; 3] = [8, 5, 3];
pub const INITIAL: [u32; 3] = [8, 0, 0];
pub const TARGET: u32 = 4;
pub const OPTIMAL_POURS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JugAction {
    Pour { from: usize, to: usize },
    Undo,
}

#[derive(Debug, Clone)]
pub struct JugPuzzle {
    /// Snapshots, starting with [`INITIAL`]. Never empty.
    history: Vec<[u32; 3]>,
    outcome: Option<PuzzleOutcome>,
}

impl Default for JugPuzzle {
    fn default() -> Self {
        Self::new()
    }
}

impl JugPuzzle {
    pub fn new() -> Self {
        Self {
            history: vec![INITIAL],
            outcome: None,
        }
    }

    pub fn volumes(&self) -> [u32; 3] {
        self.history.last().copied().unwrap_or(INITIAL)
    }

    pub fn pours(&self) -> usize {
        self.history.len() - 1
    }

    pub fn history(&self) -> &[[u32; 3]] {
        &self.history
    }

    fn pour(&mut self, from: usize, to: usize) -> Step {
        if from >= CAPACITIES.len() || to >= CAPACITIES.len() {
            return Step::Rejected(Advisory::OutOfRange);
        }
        if from == to {
            return Step::Rejected(Advisory::SameVessel);
        }
        let mut v = self.volumes();
        if v[from] == 0 {
            return Step::Rejected(Advisory::EmptyVessel);
        }
        let amount = v[from].min(CAPACITIES[to] - v[to]);
        if amount == 0 {
            return Step::NoEffect(Advisory::VesselFull);
        }
        v[from] -= amount;
        v[to] += amount;
        self.history.push(v);

        if v.contains(&TARGET) {
            let outcome = PuzzleOutcome::win(self.pours() <= OPTIMAL_POURS);
            self.outcome = Some(outcome);
            return Step::Finished(outcome);
        }
        Step::Applied
    }
}

impl Puzzle for JugPuzzle {
    type Action = JugAction;

    const KIND: PuzzleKind = PuzzleKind::Jugs;

    /// Jugs have no hidden configuration; the RNG is unused.
    fn generate(_rng: &mut SimRng) -> Self {
        Self::new()
    }

    fn apply(&mut self, action: JugAction) -> Step {
        if self.outcome.is_some() {
            return Step::Rejected(Advisory::Finished);
        }
        match action {
            JugAction::Pour { from, to } => self.pour(from, to),
            JugAction::Undo if self.history.len() > 1 => {
                self.history.pop();
                Step::Applied
            }
            JugAction::Undo => Step::NoEffect(Advisory::NothingToUndo),
        }
    }

    fn outcome(&self) -> Option<PuzzleOutcome> {
        self.outcome
    }

    fn meter(&self) -> Meter {
        Meter::new(
            MeterKind::PoursUsed,
            self.pours() as u32,
            Some(OPTIMAL_POURS as u32),
        )
    }
}
