//! Tagged dispatch over the eight engines, keyed by [`PuzzleKind`].

use crate::puzzle::{FollowUp, Meter, Puzzle, PuzzleKind, PuzzleOutcome, Step};
use crate::puzzles::*;
use crate::rng::SimRng;

/// A player action for any puzzle kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Switches(SwitchAction),
    Jugs(JugAction),
    Graph(TrailAction),
    River(BridgeAction),
    Cat(HideoutAction),
    Spider(PursuitAction),
    Horses(TournamentAction),
    Balls(WeighingAction),
}

impl Action {
    pub fn kind(&self) -> PuzzleKind {
        match self {
            Action::Switches(_) => PuzzleKind::Switches,
            Action::Jugs(_) => PuzzleKind::Jugs,
            Action::Graph(_) => PuzzleKind::Graph,
            Action::River(_) => PuzzleKind::River,
            Action::Cat(_) => PuzzleKind::Cat,
            Action::Spider(_) => PuzzleKind::Spider,
            Action::Horses(_) => PuzzleKind::Horses,
            Action::Balls(_) => PuzzleKind::Balls,
        }
    }
}

/// One live puzzle of any kind.
#[derive(Debug, Clone)]
pub enum PuzzleInstance {
    Switches(SwitchRoom),
    Jugs(JugPuzzle),
    Graph(TrailPuzzle),
    River(BridgePuzzle),
    Cat(HideoutPuzzle),
    Spider(PursuitPuzzle),
    Horses(TournamentPuzzle),
    Balls(WeighingPuzzle),
}

impl PuzzleInstance {
    pub fn generate(kind: PuzzleKind, rng: &mut SimRng) -> Self {
        match kind {
            PuzzleKind::Switches => Self::Switches(SwitchRoom::generate(rng)),
            PuzzleKind::Jugs => Self::Jugs(JugPuzzle::generate(rng)),
            PuzzleKind::Graph => Self::Graph(TrailPuzzle::generate(rng)),
            PuzzleKind::River => Self::River(BridgePuzzle::generate(rng)),
            PuzzleKind::Cat => Self::Cat(HideoutPuzzle::generate(rng)),
            PuzzleKind::Spider => Self::Spider(PursuitPuzzle::generate(rng)),
            PuzzleKind::Horses => Self::Horses(TournamentPuzzle::generate(rng)),
            PuzzleKind::Balls => Self::Balls(WeighingPuzzle::generate(rng)),
        }
    }

    pub fn kind(&self) -> PuzzleKind {
        match self {
            Self::Switches(_) => SwitchRoom::KIND,
            Self::Jugs(_) => JugPuzzle::KIND,
            Self::Graph(_) => TrailPuzzle::KIND,
            Self::River(_) => BridgePuzzle::KIND,
            Self::Cat(_) => HideoutPuzzle::KIND,
            Self::Spider(_) => PursuitPuzzle::KIND,
            Self::Horses(_) => TournamentPuzzle::KIND,
            Self::Balls(_) => WeighingPuzzle::KIND,
        }
    }

    /// Apply `action`, or return it unchanged if it targets another kind.
    pub fn apply(&mut self, action: Action) -> Result<Step, Action> {
        let step = match (self, action) {
            (Self::Switches(p), Action::Switches(a)) => p.apply(a),
            (Self::Jugs(p), Action::Jugs(a)) => p.apply(a),
            (Self::Graph(p), Action::Graph(a)) => p.apply(a),
            (Self::River(p), Action::River(a)) => p.apply(a),
            (Self::Cat(p), Action::Cat(a)) => p.apply(a),
            (Self::Spider(p), Action::Spider(a)) => p.apply(a),
            (Self::Horses(p), Action::Horses(a)) => p.apply(a),
            (Self::Balls(p), Action::Balls(a)) => p.apply(a),
            (_, other) => return Err(other),
        };
        Ok(step)
    }

    pub fn resolve(&mut self, follow_up: FollowUp) -> Step {
        match self {
            Self::Switches(p) => p.resolve(follow_up),
            Self::Jugs(p) => p.resolve(follow_up),
            Self::Graph(p) => p.resolve(follow_up),
            Self::River(p) => p.resolve(follow_up),
            Self::Cat(p) => p.resolve(follow_up),
            Self::Spider(p) => p.resolve(follow_up),
            Self::Horses(p) => p.resolve(follow_up),
            Self::Balls(p) => p.resolve(follow_up),
        }
    }

    pub fn outcome(&self) -> Option<PuzzleOutcome> {
        match self {
            Self::Switches(p) => p.outcome(),
            Self::Jugs(p) => p.outcome(),
            Self::Graph(p) => p.outcome(),
            Self::River(p) => p.outcome(),
            Self::Cat(p) => p.outcome(),
            Self::Spider(p) => p.outcome(),
            Self::Horses(p) => p.outcome(),
            Self::Balls(p) => p.outcome(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome().is_some()
    }

    pub fn meter(&self) -> Meter {
        match self {
            Self::Switches(p) => p.meter(),
            Self::Jugs(p) => p.meter(),
            Self::Graph(p) => p.meter(),
            Self::River(p) => p.meter(),
            Self::Cat(p) => p.meter(),
            Self::Spider(p) => p.meter(),
            Self::Horses(p) => p.meter(),
            Self::Balls(p) => p.meter(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::Advisory;

    #[test]
    fn generate_matches_requested_kind() {
        let mut rng = SimRng::new(3);
        for kind in PuzzleKind::ALL {
            let p = PuzzleInstance::generate(kind, &mut rng);
            assert_eq!(p.kind(), kind);
            assert!(!p.is_terminal());
        }
    }

    #[test]
    fn mismatched_action_is_handed_back() {
        let mut p = PuzzleInstance::generate(PuzzleKind::Jugs, &mut SimRng::new(1));
        let wrong = Action::Cat(HideoutAction::Inspect(2));
        assert_eq!(p.apply(wrong), Err(wrong));
        assert_eq!(wrong.kind(), PuzzleKind::Cat);
    }

    #[test]
    fn dispatch_reaches_the_engine() {
        let mut p = PuzzleInstance::generate(PuzzleKind::Jugs, &mut SimRng::new(1));
        let step = p.apply(Action::Jugs(JugAction::Pour { from: 1, to: 2 }));
        assert_eq!(step, Ok(Step::Rejected(Advisory::EmptyVessel)));
        assert_eq!(p.meter().value, 0);
    }
}
