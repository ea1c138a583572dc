//! Spider web pursuit: chase a moth across a web of 21 junctions.
//!
//! The player moves one strand at a time; after a short pause the moth
//! answers by fleeing to the neighbouring junction farthest (by hop count)
//! from the player. The web has a triangle at its hub, which is what lets a
//! patient player corner it.

use crate::graph::Graph;
use crate::id::NodeId;
use crate::puzzle::{
    Advisory, FollowUp, Meter, MeterKind, Puzzle, PuzzleKind, PuzzleOutcome, Step,
};
use crate::rng::SimRng;

pub const PLAYER_START: NodeId = NodeId(18);
pub const ADVERSARY_START: NodeId = NodeId(20);
pub const MOVE_BUDGET: u32 = 15;
pub const OPTIMAL_MOVES: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PursuitAction {
    Move(NodeId),
}

/// Neighbours of `adversary` it would consider fleeing to from `player`:
/// those at maximal distance from the player, never the player's own node.
/// Empty when the adversary has nowhere to go.
pub fn flee_options(graph: &Graph, player: NodeId, adversary: NodeId) -> Vec<NodeId> {
    let dist = graph.distances_from(player);
    let mut best = Vec::new();
    let mut best_d = 0;
    for &n in graph.neighbors(adversary) {
        if n == player {
            continue;
        }
        let d = dist.get(&n).copied().unwrap_or(u32::MAX);
        if best.is_empty() || d > best_d {
            best.clear();
            best.push(n);
            best_d = d;
        } else if d == best_d {
            best.push(n);
        }
    }
    best
}

#[derive(Debug, Clone)]
pub struct PursuitPuzzle {
    graph: Graph,
    player: NodeId,
    adversary: NodeId,
    moves: u32,
    awaiting_adversary: bool,
    rng: SimRng,
    outcome: Option<PuzzleOutcome>,
}

impl PursuitPuzzle {
    pub fn with_positions(player: NodeId, adversary: NodeId, rng: SimRng) -> Self {
        Self {
            graph: Graph::spider_web(),
            player,
            adversary,
            moves: 0,
            awaiting_adversary: false,
            rng,
            outcome: None,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn player(&self) -> NodeId {
        self.player
    }

    pub fn adversary(&self) -> NodeId {
        self.adversary
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn awaiting_adversary(&self) -> bool {
        self.awaiting_adversary
    }

    fn finish(&mut self, outcome: PuzzleOutcome) -> Step {
        self.awaiting_adversary = false;
        self.outcome = Some(outcome);
        Step::Finished(outcome)
    }

    fn caught(&mut self) -> Step {
        let optimized = self.moves <= OPTIMAL_MOVES;
        self.finish(PuzzleOutcome::win(optimized))
    }

    fn step_to(&mut self, to: NodeId) -> Step {
        if self.awaiting_adversary {
            return Step::Rejected(Advisory::AdversaryTurn);
        }
        if !self.graph.contains_node(to) {
            return Step::Rejected(Advisory::OutOfRange);
        }
        if !self.graph.has_edge(self.player, to) {
            return Step::Rejected(Advisory::NotAdjacent);
        }
        self.player = to;
        self.moves += 1;

        if self.player == self.adversary {
            return self.caught();
        }
        // Out of moves: the board freezes here rather than playing on.
        if self.moves >= MOVE_BUDGET {
            return self.finish(PuzzleOutcome::fail());
        }
        self.awaiting_adversary = true;
        Step::Pending(FollowUp::AdversaryTurn)
    }

    fn adversary_turn(&mut self) -> Step {
        self.awaiting_adversary = false;
        let options = flee_options(&self.graph, self.player, self.adversary);
        if let Some(&to) = self.rng.choose(&options) {
            log::trace!("adversary {:?} -> {:?}", self.adversary, to);
            self.adversary = to;
        }
        if self.adversary == self.player {
            return self.caught();
        }
        Step::Applied
    }
}

impl Puzzle for PursuitPuzzle {
    type Action = PursuitAction;

    const KIND: PuzzleKind = PuzzleKind::Spider;

    fn generate(rng: &mut SimRng) -> Self {
        Self::with_positions(PLAYER_START, ADVERSARY_START, rng.fork())
    }

    fn apply(&mut self, action: PursuitAction) -> Step {
        if self.outcome.is_some() {
            return Step::Rejected(Advisory::Finished);
        }
        match action {
            PursuitAction::Move(to) => self.step_to(to),
        }
    }

    fn resolve(&mut self, follow_up: FollowUp) -> Step {
        match follow_up {
            FollowUp::AdversaryTurn if self.awaiting_adversary && self.outcome.is_none() => {
                self.adversary_turn()
            }
            _ => Step::NoEffect(Advisory::Finished),
        }
    }

    fn outcome(&self) -> Option<PuzzleOutcome> {
        self.outcome
    }

    fn meter(&self) -> Meter {
        Meter::new(
            MeterKind::MovesLeft,
            MOVE_BUDGET.saturating_sub(self.moves),
            Some(MOVE_BUDGET),
        )
    }
}
