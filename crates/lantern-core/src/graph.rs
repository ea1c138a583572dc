//! Small undirected graphs for the stone-gate and spider-web puzzles.
//!
//! Both puzzles use fixed layouts, so a graph is built once from an edge
//! list and never mutated afterwards. The only search the puzzles need is
//! breadth-first distance, provided here once and shared.

use std::collections::{BTreeMap, HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::id::NodeId;

/// An undirected edge with its endpoints stored in ascending order, so
/// `EdgeKey::new(a, b) == EdgeKey::new(b, a)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeKey(pub NodeId, pub NodeId);

impl EdgeKey {
    pub fn new(a: NodeId, b: NodeId) -> Self {
        if a <= b { Self(a, b) } else { Self(b, a) }
    }
}

/// Undirected simple graph with adjacency lists in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    adjacency: BTreeMap<NodeId, Vec<NodeId>>,
    edges: Vec<EdgeKey>,
}

impl Graph {
    /// Build a graph from `(a, b)` pairs. Nodes are implied by the edges.
    /// Repeated edges and self-loops are ignored.
    pub fn from_edges(pairs: &[(u8, u8)]) -> Self {
        let mut graph = Self {
            adjacency: BTreeMap::new(),
            edges: Vec::with_capacity(pairs.len()),
        };
        for &(a, b) in pairs {
            graph.connect(NodeId(a), NodeId(b));
        }
        graph
    }

    fn connect(&mut self, a: NodeId, b: NodeId) {
        debug_assert_ne!(a, b, "self-loop in fixed layout");
        if a == b || self.has_edge(a, b) {
            return;
        }
        self.adjacency.entry(a).or_default().push(b);
        self.adjacency.entry(b).or_default().push(a);
        self.edges.push(EdgeKey::new(a, b));
    }

    /// The eight-node star carved on the stone gate: 15 edges, exactly two
    /// odd-degree vertices (4 and 5), so an Eulerian trail exists.
    pub fn stone_gate() -> Self {
        Self::from_edges(&[
            (1, 2), (1, 3),
            (2, 3), (2, 4), (2, 5),
            (3, 4), (3, 5),
            (4, 5), (4, 6), (4, 7),
            (5, 6), (5, 7),
            (6, 7), (6, 8), (7, 8),
        ])
    }

    /// The spider web: hub 0, four rings of five (1-5, 6-10, 11-15, 16-20).
    /// Radial spokes join each ring node to the same slot one ring out; each
    /// ring is an open chain along its five slots.
    pub fn spider_web() -> Self {
        let mut pairs = Vec::with_capacity(36);
        for slot in 1..=5u8 {
            pairs.push((0, slot));
        }
        for ring in 0..3u8 {
            for slot in 1..=5u8 {
                let inner = ring * 5 + slot;
                pairs.push((inner, inner + 5));
            }
        }
        for ring in 0..4u8 {
            let base = ring * 5;
            for slot in 1..5u8 {
                pairs.push((base + slot, base + slot + 1));
            }
        }
        Self::from_edges(&pairs)
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        self.adjacency.contains_key(&node)
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency.keys().copied()
    }

    pub fn edges(&self) -> &[EdgeKey] {
        &self.edges
    }

    /// Neighbours of `node`, empty for unknown nodes.
    pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
        self.adjacency.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.neighbors(a).contains(&b)
    }

    pub fn degree(&self, node: NodeId) -> usize {
        self.neighbors(node).len()
    }

    pub fn odd_degree_nodes(&self) -> Vec<NodeId> {
        self.nodes().filter(|n| self.degree(*n) % 2 == 1).collect()
    }

    /// An Eulerian trail exists in a connected graph iff it has zero or two
    /// odd-degree vertices.
    pub fn admits_euler_trail(&self) -> bool {
        matches!(self.odd_degree_nodes().len(), 0 | 2) && self.is_connected()
    }

    pub fn is_connected(&self) -> bool {
        match self.nodes().next() {
            Some(start) => self.distances_from(start).len() == self.node_count(),
            None => true,
        }
    }

    /// Breadth-first hop counts from `start` to every reachable node.
    pub fn distances_from(&self, start: NodeId) -> HashMap<NodeId, u32> {
        let mut dist = HashMap::with_capacity(self.node_count());
        if !self.contains_node(start) {
            return dist;
        }
        let mut queue = VecDeque::new();
        dist.insert(start, 0);
        queue.push_back(start);
        while let Some(node) = queue.pop_front() {
            let d = dist[&node];
            for &next in self.neighbors(node) {
                if let std::collections::hash_map::Entry::Vacant(slot) = dist.entry(next) {
                    slot.insert(d + 1);
                    queue.push_back(next);
                }
            }
        }
        dist
    }

    /// Shortest hop count between two nodes, `None` if unreachable.
    pub fn distance(&self, from: NodeId, to: NodeId) -> Option<u32> {
        if from == to {
            return self.contains_node(from).then_some(0);
        }
        let mut seen = HashMap::new();
        let mut queue = VecDeque::new();
        seen.insert(from, 0u32);
        queue.push_back(from);
        while let Some(node) = queue.pop_front() {
            let d = seen[&node];
            for &next in self.neighbors(node) {
                if next == to {
                    return Some(d + 1);
                }
                if !seen.contains_key(&next) {
                    seen.insert(next, d + 1);
                    queue.push_back(next);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(v: u8) -> NodeId {
        NodeId(v)
    }

    #[test]
    fn stone_gate_shape() {
        let g = Graph::stone_gate();
        assert_eq!(g.node_count(), 8);
        assert_eq!(g.edge_count(), 15);
        assert_eq!(g.odd_degree_nodes(), vec![n(4), n(5)]);
        assert!(g.admits_euler_trail());
    }

    #[test]
    fn spider_web_shape() {
        let g = Graph::spider_web();
        assert_eq!(g.node_count(), 21);
        // 5 hub spokes + 15 radial + 16 lateral.
        assert_eq!(g.edge_count(), 36);
        assert_eq!(g.degree(n(0)), 5);
        assert!(g.has_edge(n(3), n(8)));
        assert!(g.has_edge(n(18), n(19)));
        assert!(!g.has_edge(n(5), n(6)), "rings are chains, not cycles");
        assert!(!g.has_edge(n(16), n(0)));
        assert!(g.is_connected());
    }

    #[test]
    fn edge_keys_are_unordered() {
        assert_eq!(EdgeKey::new(n(7), n(2)), EdgeKey::new(n(2), n(7)));
    }

    #[test]
    fn duplicate_edges_ignored() {
        let g = Graph::from_edges(&[(1, 2), (2, 1), (1, 2)]);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.degree(n(1)), 1);
    }

    #[test]
    fn bfs_distances_on_web() {
        let g = Graph::spider_web();
        assert_eq!(g.distance(n(0), n(20)), Some(4));
        assert_eq!(g.distance(n(18), n(20)), Some(2));
        assert_eq!(g.distance(n(16), n(20)), Some(4));
        assert_eq!(g.distance(n(9), n(9)), Some(0));
        assert_eq!(g.distance(n(9), n(99)), None);

        let all = g.distances_from(n(0));
        assert_eq!(all.len(), 21);
        assert_eq!(all[&n(13)], 3);
    }
}
