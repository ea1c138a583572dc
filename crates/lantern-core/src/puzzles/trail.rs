//! Stone-gate trail: trace every groove of the carved star in one stroke.
//!
//! Stepping back onto the previous stone erases the last groove. That undo
//! still costs an action, so only a clean single stroke is optimal.

use crate::graph::{EdgeKey, Graph};
use crate::id::NodeId;
use crate::puzzle::{Advisory, Meter, MeterKind, Puzzle, PuzzleKind, PuzzleOutcome, Step};
use crate::rng::SimRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailAction {
    Select(NodeId),
}

#[derive(Debug, Clone)]
pub struct TrailPuzzle {
    graph: Graph,
    current: Option<NodeId>,
    /// Drawn edges in drawing order.
    drawn: Vec<EdgeKey>,
    path: Vec<NodeId>,
    actions: u32,
    outcome: Option<PuzzleOutcome>,
}

impl Default for TrailPuzzle {
    fn default() -> Self {
        Self::new()
    }
}

impl TrailPuzzle {
    pub fn new() -> Self {
        Self::on(Graph::stone_gate())
    }

    /// A trail puzzle over an arbitrary graph.
    pub fn on(graph: Graph) -> Self {
        Self {
            graph,
            current: None,
            drawn: Vec::new(),
            path: Vec::new(),
            actions: 0,
            outcome: None,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn current(&self) -> Option<NodeId> {
        self.current
    }

    pub fn path(&self) -> &[NodeId] {
        &self.path
    }

    pub fn drawn(&self) -> &[EdgeKey] {
        &self.drawn
    }

    pub fn is_drawn(&self, a: NodeId, b: NodeId) -> bool {
        self.drawn.contains(&EdgeKey::new(a, b))
    }

    pub fn actions(&self) -> u32 {
        self.actions
    }

    fn select(&mut self, node: NodeId) -> Step {
        if !self.graph.contains_node(node) {
            return Step::Rejected(Advisory::OutOfRange);
        }
        let Some(current) = self.current else {
            self.current = Some(node);
            self.path = vec![node];
            return Step::Applied;
        };

        if node == current {
            return Step::NoEffect(Advisory::AlreadyHere);
        }

        let len = self.path.len();
        if len >= 2 && self.path[len - 2] == node {
            let last = self.drawn.pop();
            debug_assert_eq!(last, Some(EdgeKey::new(current, node)));
            self.path.pop();
            self.current = Some(node);
            self.actions += 1;
            return Step::Applied;
        }

        if !self.graph.has_edge(current, node) {
            return Step::Rejected(Advisory::NotConnected);
        }
        let edge = EdgeKey::new(current, node);
        if self.drawn.contains(&edge) {
            return Step::Rejected(Advisory::AlreadyDrawn);
        }

        self.drawn.push(edge);
        self.path.push(node);
        self.current = Some(node);
        self.actions += 1;

        let total = self.graph.edge_count();
        if self.drawn.len() == total {
            let outcome = PuzzleOutcome::win(self.actions as usize == total);
            self.outcome = Some(outcome);
            return Step::Finished(outcome);
        }
        Step::Applied
    }
}

impl Puzzle for TrailPuzzle {
    type Action = TrailAction;

    const KIND: PuzzleKind = PuzzleKind::Graph;

    fn generate(_rng: &mut SimRng) -> Self {
        Self::new()
    }

    fn apply(&mut self, action: TrailAction) -> Step {
        if self.outcome.is_some() {
            return Step::Rejected(Advisory::Finished);
        }
        match action {
            TrailAction::Select(node) => self.select(node),
        }
    }

    fn outcome(&self) -> Option<PuzzleOutcome> {
        self.outcome
    }

    fn meter(&self) -> Meter {
        Meter::new(
            MeterKind::EdgesDrawn,
            self.drawn.len() as u32,
            Some(self.graph.edge_count() as u32),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EULER: [u8; 16] = [4, 2, 1, 3, 2, 5, 3, 4, 5, 6, 4, 7, 6, 8, 7, 5];

    fn select(p: &mut TrailPuzzle, n: u8) -> Step {
        p.apply(TrailAction::Select(NodeId(n)))
    }

    #[test]
    fn first_selection_is_free() {
        let mut p = TrailPuzzle::new();
        assert_eq!(select(&mut p, 4), Step::Applied);
        assert_eq!(p.actions(), 0);
        assert_eq!(p.path(), &[NodeId(4)]);
    }

    #[test]
    fn unknown_and_unconnected_nodes_are_rejected() {
        let mut p = TrailPuzzle::new();
        assert_eq!(select(&mut p, 9), Step::Rejected(Advisory::OutOfRange));
        select(&mut p, 1);
        assert_eq!(select(&mut p, 8), Step::Rejected(Advisory::NotConnected));
        assert_eq!(p.actions(), 0);
    }

    #[test]
    fn reselecting_current_node_is_ignored() {
        let mut p = TrailPuzzle::new();
        select(&mut p, 4);
        assert_eq!(select(&mut p, 4), Step::NoEffect(Advisory::AlreadyHere));
        select(&mut p, 2);
        assert_eq!(select(&mut p, 2), Step::NoEffect(Advisory::AlreadyHere));
        assert_eq!(p.actions(), 1);
        assert_eq!(p.path(), &[NodeId(4), NodeId(2)]);
        assert_eq!(p.drawn().len(), 1);
    }

    #[test]
    fn redrawing_an_edge_is_rejected() {
        let mut p = TrailPuzzle::new();
        for n in [1, 2, 3] {
            select(&mut p, n);
        }
        // 3 -> 1 is new, 1 -> 2 is already drawn.
        select(&mut p, 1);
        assert_eq!(select(&mut p, 2), Step::Rejected(Advisory::AlreadyDrawn));
        assert_eq!(p.drawn().len(), 3);
    }

    #[test]
    fn stepping_back_erases_and_counts() {
        let mut p = TrailPuzzle::new();
        for n in [4, 2, 1] {
            select(&mut p, n);
        }
        assert_eq!(select(&mut p, 2), Step::Applied);
        assert_eq!(p.drawn().len(), 1);
        assert_eq!(p.path(), &[NodeId(4), NodeId(2)]);
        assert_eq!(p.actions(), 3);
        assert!(!p.is_drawn(NodeId(1), NodeId(2)));
    }

    #[test]
    fn clean_stroke_is_optimal() {
        let mut p = TrailPuzzle::new();
        let mut last = Step::Applied;
        for n in EULER {
            last = select(&mut p, n);
        }
        assert_eq!(last, Step::Finished(PuzzleOutcome::win(true)));
        assert_eq!(p.meter().value, 15);
    }

    #[test]
    fn one_backtrack_solves_without_optimizing() {
        let mut p = TrailPuzzle::new();
        for n in [4, 2, 1] {
            select(&mut p, n);
        }
        select(&mut p, 2);
        let mut last = Step::Applied;
        for n in &EULER[2..] {
            last = select(&mut p, *n);
        }
        assert_eq!(last, Step::Finished(PuzzleOutcome::win(false)));
        assert_eq!(p.actions(), 17);
    }
}
