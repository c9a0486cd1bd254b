//! Navigable graph over the free cells of an occupancy grid.
//!
//! Every free cell is a node connected to each of its free 8-connected
//! neighbors. Blocked cells stay in the node array so indices remain
//! row-major, but they never receive or originate an edge.

use std::collections::VecDeque;

use super::{GridCoord, OccupancyGrid};

/// One grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Node {
    /// Cell position as (row, column)
    pub position: GridCoord,
    /// Blocked cells are never traversable
    pub occupied: bool,
}

/// Undirected 8-connected adjacency over free cells.
#[derive(Clone, Debug)]
pub struct GridGraph {
    grid: OccupancyGrid,
    nodes: Vec<Node>,
    /// Sorted neighbor lists, one per node (empty for blocked nodes)
    adjacency: Vec<Vec<usize>>,
    edge_count: usize,
}

impl GridGraph {
    /// Build the node array and adjacency from an occupancy grid.
    pub fn build(grid: OccupancyGrid) -> Self {
        let n = grid.len();
        let nodes: Vec<Node> = (0..n)
            .map(|i| Node {
                position: grid.coord_of(i),
                occupied: grid.is_blocked(i),
            })
            .collect();

        let mut adjacency = vec![Vec::new(); n];
        for i in 0..n {
            if nodes[i].occupied {
                continue;
            }
            for neighbor in nodes[i].position.neighbors_8() {
                let Some(j) = grid.index_of(neighbor) else {
                    continue;
                };
                if !nodes[j].occupied {
                    adjacency[i].push(j);
                }
            }
            adjacency[i].sort_unstable();
        }

        let edge_count = adjacency.iter().map(Vec::len).sum::<usize>() / 2;

        tracing::info!(
            "Built patrol graph: {}x{} grid, {} free nodes, {} edges",
            grid.rows(),
            grid.cols(),
            grid.free_count(),
            edge_count
        );

        Self {
            grid,
            nodes,
            adjacency,
            edge_count,
        }
    }

    /// Parse grid text and build its graph in one go.
    pub fn from_text(text: &str) -> crate::Result<Self> {
        Ok(Self::build(OccupancyGrid::parse(text)?))
    }

    /// The occupancy grid this graph was built from.
    #[inline]
    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    /// All nodes, row-major.
    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Node at `index`.
    #[inline]
    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    /// Number of nodes (free and blocked).
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the graph has no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of undirected edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Whether `index` names a free cell.
    #[inline]
    pub fn is_free(&self, index: usize) -> bool {
        self.nodes.get(index).is_some_and(|n| !n.occupied)
    }

    /// Neighbors of `index` in ascending order.
    #[inline]
    pub fn neighbors(&self, index: usize) -> &[usize] {
        self.adjacency.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of free neighbors of `index`.
    #[inline]
    pub fn degree(&self, index: usize) -> usize {
        self.neighbors(index).len()
    }

    /// Whether an edge joins `u` and `v`.
    #[inline]
    pub fn is_adjacent(&self, u: usize, v: usize) -> bool {
        self.neighbors(u).binary_search(&v).is_ok()
    }

    /// Indices of all free nodes, ascending.
    pub fn free_nodes(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| !n.occupied)
            .map(|(i, _)| i)
    }

    /// Free cells reachable from `index` by a single orthogonal step.
    ///
    /// Diagonal edges are part of the graph but never used for movement.
    pub fn orthogonal_moves(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        let position = self
            .nodes
            .get(index)
            .map(|n| n.position)
            .unwrap_or_default();
        let valid = self.is_free(index);
        position
            .neighbors_4()
            .into_iter()
            .filter(move |_| valid)
            .filter_map(move |c| self.grid.index_of(c))
            .filter(move |&j| self.is_free(j))
    }

    /// First orthogonal step of a shortest route from `start` to the nearest
    /// node satisfying `goal`.
    ///
    /// Breadth-first over orthogonal moves in up, left, right, down order.
    /// Returns `None` if `start` itself is a goal or no goal is reachable.
    pub fn first_step_toward(&self, start: usize, goal: impl Fn(usize) -> bool) -> Option<usize> {
        if !self.is_free(start) || goal(start) {
            return None;
        }

        let mut parent = vec![usize::MAX; self.len()];
        parent[start] = start;
        let mut queue = VecDeque::from([start]);

        while let Some(node) = queue.pop_front() {
            for next in self.orthogonal_moves(node) {
                if parent[next] != usize::MAX {
                    continue;
                }
                parent[next] = node;
                if goal(next) {
                    let mut step = next;
                    while parent[step] != start {
                        step = parent[step];
                    }
                    return Some(step);
                }
                queue.push_back(next);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(text: &str) -> GridGraph {
        GridGraph::from_text(text).unwrap()
    }

    #[test]
    fn test_open_3x3_degrees() {
        let g = graph("0 0 0\n0 0 0\n0 0 0\n");
        assert_eq!(g.len(), 9);
        assert_eq!(g.degree(4), 8);
        assert_eq!(g.degree(0), 3);
        assert_eq!(g.degree(1), 5);
        // 4 corners * 3 + 4 edges * 5 + 8 = 40 directed = 20 undirected
        assert_eq!(g.edge_count(), 20);
    }

    #[test]
    fn test_adjacency_is_symmetric() {
        let g = graph("0 0 1 0\n0 1 0 0\n0 0 0 1\n");
        for u in 0..g.len() {
            for v in 0..g.len() {
                assert_eq!(g.is_adjacent(u, v), g.is_adjacent(v, u), "({u}, {v})");
            }
        }
    }

    #[test]
    fn test_blocked_center_has_no_edges() {
        let g = graph("0 0 0\n0 1 0\n0 0 0\n");
        assert!(!g.is_free(4));
        assert_eq!(g.degree(4), 0);
        for u in g.free_nodes() {
            assert!(!g.is_adjacent(u, 4));
        }
        assert_eq!(g.neighbors(0), &[1, 3]);
        assert_eq!(g.neighbors(1), &[0, 2, 3, 5]);
    }

    #[test]
    fn test_diagonal_edges_present() {
        let g = graph("0 1\n1 0\n");
        assert!(g.is_adjacent(0, 3));
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.orthogonal_moves(0).count(), 0);
    }

    #[test]
    fn test_node_positions_row_major() {
        let g = graph("0 0 0\n0 0 0\n");
        assert_eq!(g.node(4).unwrap().position, GridCoord::new(1, 1));
        assert_eq!(g.node(2).unwrap().position, GridCoord::new(0, 2));
        assert!(g.node(6).is_none());
    }

    #[test]
    fn test_orthogonal_moves() {
        let g = graph("0 0 0\n0 0 1\n0 0 0\n");
        let moves: Vec<usize> = g.orthogonal_moves(4).collect();
        assert_eq!(moves, vec![1, 3, 7]);

        let corner: Vec<usize> = g.orthogonal_moves(0).collect();
        assert_eq!(corner, vec![1, 3]);

        // Blocked and out-of-range nodes have no moves
        assert_eq!(g.orthogonal_moves(5).count(), 0);
        assert_eq!(g.orthogonal_moves(99).count(), 0);
    }

    #[test]
    fn test_first_step_toward_nearest_goal() {
        // 0 0 0
        // 0 1 0
        // 0 0 0
        let g = graph("0 0 0\n0 1 0\n0 0 0\n");
        assert_eq!(g.first_step_toward(0, |i| i == 2), Some(1));
        assert_eq!(g.first_step_toward(0, |i| i == 6), Some(3));
        // 8 is equally far both ways; up/left before right/down
        assert_eq!(g.first_step_toward(0, |i| i == 8), Some(1));
        assert_eq!(g.first_step_toward(0, |i| i == 1), Some(1));
    }

    #[test]
    fn test_first_step_toward_unreachable() {
        let g = graph("0 1\n1 0\n");
        assert_eq!(g.first_step_toward(0, |i| i == 3), None);
        assert_eq!(g.first_step_toward(0, |i| i == 0), None);
        assert_eq!(g.first_step_toward(1, |i| i == 0), None);
    }

    #[test]
    fn test_free_nodes() {
        let g = graph("0 1\n0 0\n");
        assert_eq!(g.free_nodes().collect::<Vec<_>>(), vec![0, 2, 3]);
    }
}
