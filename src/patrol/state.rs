//! Mutable patrol runtime state.
//!
//! Tracks per-node visit counts, per-edge traversal counts, the node the
//! agent currently occupies, and which free nodes have never been visited.

use std::collections::HashMap;

use crate::error::{PatrolError, Result};
use crate::grid::GridGraph;

/// Whether an arrival was the first visit to a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// Node had never been visited before this arrival.
    FirstVisit,
    /// Node had been visited before.
    Revisit,
}

impl NodeKind {
    /// True for [`NodeKind::FirstVisit`].
    #[inline]
    pub fn is_first_visit(self) -> bool {
        self == NodeKind::FirstVisit
    }
}

/// Visit and traversal history of one agent.
#[derive(Clone, Debug)]
pub struct PatrolState {
    current: usize,
    visit_counts: Vec<u32>,
    edge_counts: HashMap<(usize, usize), u32>,
    unvisited: Vec<bool>,
    unvisited_remaining: usize,
    visited_path: Vec<usize>,
    last_arrival: NodeKind,
    revisit_streak: usize,
}

impl PatrolState {
    /// Create state for an agent placed on `start`.
    ///
    /// The start node counts as the first arrival: its visit count is 1 and
    /// it is no longer unvisited.
    pub fn new(graph: &GridGraph, start: usize) -> Result<Self> {
        if start >= graph.len() {
            return Err(PatrolError::InvalidStartNode {
                node: start,
                reason: "index outside the grid",
            });
        }
        if !graph.is_free(start) {
            return Err(PatrolError::InvalidStartNode {
                node: start,
                reason: "cell is blocked",
            });
        }

        let unvisited: Vec<bool> = graph.nodes().iter().map(|n| !n.occupied).collect();
        let unvisited_remaining = unvisited.iter().filter(|&&u| u).count();

        let mut state = Self {
            current: start,
            visit_counts: vec![0; graph.len()],
            edge_counts: HashMap::new(),
            unvisited,
            unvisited_remaining,
            visited_path: Vec::new(),
            last_arrival: NodeKind::FirstVisit,
            revisit_streak: 0,
        };
        state.arrive(start);
        Ok(state)
    }

    /// Move the agent from the current node to `to`.
    ///
    /// Bumps the visit count of `to` and the traversal count of the directed
    /// edge, and clears `to`'s unvisited flag on its first arrival.
    pub(crate) fn apply_move(&mut self, to: usize) -> NodeKind {
        let from = self.current;
        *self.edge_counts.entry((from, to)).or_insert(0) += 1;
        self.arrive(to)
    }

    fn arrive(&mut self, node: usize) -> NodeKind {
        let kind = if self.visit_counts[node] == 0 {
            NodeKind::FirstVisit
        } else {
            NodeKind::Revisit
        };

        self.revisit_streak = match kind {
            NodeKind::FirstVisit => 0,
            NodeKind::Revisit => self.revisit_streak + 1,
        };
        self.visit_counts[node] += 1;
        if std::mem::take(&mut self.unvisited[node]) {
            self.unvisited_remaining -= 1;
        }

        self.current = node;
        self.visited_path.push(node);
        self.last_arrival = kind;
        kind
    }

    /// Node the agent currently occupies.
    #[inline]
    pub fn current(&self) -> usize {
        self.current
    }

    /// Times the agent has arrived at `node` (0 for blocked nodes).
    #[inline]
    pub fn visit_count(&self, node: usize) -> u32 {
        self.visit_counts.get(node).copied().unwrap_or(0)
    }

    /// All visit counts, row-major.
    #[inline]
    pub fn visit_counts(&self) -> &[u32] {
        &self.visit_counts
    }

    /// Times the agent has moved from `from` to `to`.
    #[inline]
    pub fn edge_count(&self, from: usize, to: usize) -> u32 {
        self.edge_counts.get(&(from, to)).copied().unwrap_or(0)
    }

    /// Whether `node` is a free node that has never been visited.
    #[inline]
    pub fn is_unvisited(&self, node: usize) -> bool {
        self.unvisited.get(node).copied().unwrap_or(false)
    }

    /// Free nodes not yet visited.
    #[inline]
    pub fn unvisited_remaining(&self) -> usize {
        self.unvisited_remaining
    }

    /// Every node occupied so far, starting with the start node.
    #[inline]
    pub fn visited_path(&self) -> &[usize] {
        &self.visited_path
    }

    /// Kind of the most recent arrival.
    #[inline]
    pub fn last_arrival(&self) -> NodeKind {
        self.last_arrival
    }

    /// Consecutive revisits since the last first visit.
    #[inline]
    pub fn revisit_streak(&self) -> usize {
        self.revisit_streak
    }

    /// Number of moves made (path length minus the start node).
    #[inline]
    pub fn steps(&self) -> usize {
        self.visited_path.len().saturating_sub(1)
    }

    /// True once every free node has been visited.
    #[inline]
    pub fn is_completed(&self) -> bool {
        self.unvisited_remaining == 0
    }

    /// Summary of how evenly the free nodes have been visited.
    pub fn coverage_stats(&self, graph: &GridGraph) -> CoverageStats {
        let counts: Vec<u32> = graph.free_nodes().map(|i| self.visit_counts[i]).collect();
        if counts.is_empty() {
            return CoverageStats::default();
        }

        let visited = counts.iter().filter(|&&c| c > 0).count();
        let total: u64 = counts.iter().map(|&c| c as u64).sum();

        CoverageStats {
            free_nodes: counts.len(),
            visited_nodes: visited,
            min_visits: counts.iter().copied().min().unwrap_or(0),
            max_visits: counts.iter().copied().max().unwrap_or(0),
            mean_visits: total as f64 / counts.len() as f64,
        }
    }

    /// Render visit counts as a text grid, one row per line.
    ///
    /// Blocked cells print as `#`.
    pub fn visit_map(&self, graph: &GridGraph) -> String {
        let grid = graph.grid();
        let width = self
            .visit_counts
            .iter()
            .max()
            .map_or(1, |m| m.to_string().len());

        let mut out = String::new();
        for row in 0..grid.rows() {
            for col in 0..grid.cols() {
                let i = row * grid.cols() + col;
                if col > 0 {
                    out.push(' ');
                }
                let cell = if grid.is_blocked(i) {
                    format!("{:>width$}", "#")
                } else {
                    format!("{:>width$}", self.visit_counts[i])
                };
                out.push_str(&cell);
            }
            out.push('\n');
        }
        out
    }
}

/// Visit-count statistics over free nodes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CoverageStats {
    /// Number of free nodes in the grid
    pub free_nodes: usize,
    /// Free nodes visited at least once
    pub visited_nodes: usize,
    /// Fewest visits to any free node
    pub min_visits: u32,
    /// Most visits to any free node
    pub max_visits: u32,
    /// Mean visits per free node
    pub mean_visits: f64,
}

impl CoverageStats {
    /// Fraction of free nodes visited, in [0, 1].
    pub fn coverage(&self) -> f64 {
        if self.free_nodes == 0 {
            return 0.0;
        }
        self.visited_nodes as f64 / self.free_nodes as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn open_3x3() -> GridGraph {
        GridGraph::from_text("0 0 0\n0 0 0\n0 0 0\n").unwrap()
    }

    #[test]
    fn test_new_counts_start_as_visited() {
        let graph = open_3x3();
        let state = PatrolState::new(&graph, 4).unwrap();

        assert_eq!(state.current(), 4);
        assert_eq!(state.visit_count(4), 1);
        assert!(!state.is_unvisited(4));
        assert_eq!(state.unvisited_remaining(), 8);
        assert_eq!(state.visited_path(), &[4]);
        assert_eq!(state.last_arrival(), NodeKind::FirstVisit);
        assert_eq!(state.steps(), 0);
    }

    #[test]
    fn test_new_rejects_bad_start() {
        let graph = GridGraph::from_text("0 0 0\n0 1 0\n0 0 0\n").unwrap();

        let err = PatrolState::new(&graph, 4).unwrap_err();
        assert!(matches!(err, PatrolError::InvalidStartNode { node: 4, .. }));

        let err = PatrolState::new(&graph, 9).unwrap_err();
        assert!(matches!(err, PatrolError::InvalidStartNode { node: 9, .. }));
    }

    #[test]
    fn test_apply_move_updates_counters() {
        let graph = open_3x3();
        let mut state = PatrolState::new(&graph, 4).unwrap();

        assert_eq!(state.apply_move(1), NodeKind::FirstVisit);
        assert_eq!(state.visit_count(1), 1);
        assert_eq!(state.edge_count(4, 1), 1);
        assert_eq!(state.edge_count(1, 4), 0);
        assert_eq!(state.unvisited_remaining(), 7);

        assert_eq!(state.apply_move(4), NodeKind::Revisit);
        assert_eq!(state.visit_count(4), 2);
        assert_eq!(state.edge_count(1, 4), 1);
        assert_eq!(state.unvisited_remaining(), 7);
        assert_eq!(state.last_arrival(), NodeKind::Revisit);

        assert_eq!(state.visited_path(), &[4, 1, 4]);
        assert_eq!(state.steps(), 2);
    }

    #[test]
    fn test_blocked_nodes_never_unvisited() {
        let graph = GridGraph::from_text("0 1\n0 0\n").unwrap();
        let state = PatrolState::new(&graph, 0).unwrap();
        assert!(!state.is_unvisited(1));
        assert_eq!(state.visit_count(1), 0);
        assert_eq!(state.unvisited_remaining(), 2);
    }

    #[test]
    fn test_single_free_cell_is_complete() {
        let graph = GridGraph::from_text("1 0 1\n").unwrap();
        let state = PatrolState::new(&graph, 1).unwrap();
        assert!(state.is_completed());
    }

    #[test]
    fn test_coverage_stats() {
        let graph = GridGraph::from_text("0 0\n0 1\n").unwrap();
        let mut state = PatrolState::new(&graph, 0).unwrap();
        state.apply_move(1);
        state.apply_move(0);

        let stats = state.coverage_stats(&graph);
        assert_eq!(stats.free_nodes, 3);
        assert_eq!(stats.visited_nodes, 2);
        assert_eq!(stats.min_visits, 0);
        assert_eq!(stats.max_visits, 2);
        assert_relative_eq!(stats.mean_visits, 1.0);
        assert_relative_eq!(stats.coverage(), 2.0 / 3.0);
    }

    #[test]
    fn test_visit_map() {
        let graph = GridGraph::from_text("0 0\n0 1\n").unwrap();
        let mut state = PatrolState::new(&graph, 0).unwrap();
        state.apply_move(1);

        assert_eq!(state.visit_map(&graph), "1 1\n0 #\n");
    }

    #[test]
    fn test_visit_map_pads_to_widest_count() {
        let graph = GridGraph::from_text("0 0 1\n").unwrap();
        let mut state = PatrolState::new(&graph, 0).unwrap();
        for _ in 0..10 {
            state.apply_move(1);
            state.apply_move(0);
        }

        assert_eq!(state.visit_map(&graph), "11 10  #\n");
    }

    #[test]
    fn test_revisit_streak() {
        let graph = GridGraph::from_text("0 0 0\n").unwrap();
        let mut state = PatrolState::new(&graph, 0).unwrap();
        assert_eq!(state.revisit_streak(), 0);

        state.apply_move(1);
        state.apply_move(0);
        state.apply_move(1);
        assert_eq!(state.revisit_streak(), 2);

        state.apply_move(2);
        assert_eq!(state.revisit_streak(), 0);
    }
}
