//! Target transition probabilities for uniform visitation.
//!
//! For every node `u` with `deg(u)` free neighbors, each edge `(u, v)` gets
//! probability `1 / deg(u)` and every non-edge gets 0. This is the random
//! walk whose long-run visit frequency the patrol selector steers toward.
//!
//! Nodes without edges keep an all-zero row. They are unreachable by
//! construction, so no renormalisation is attempted.

use crate::grid::GridGraph;

/// Per-node target distribution over neighbors.
#[derive(Clone, Debug)]
pub struct TransitionModel {
    /// Sparse rows: (neighbor, probability), ascending by neighbor
    rows: Vec<Vec<(usize, f64)>>,
}

impl TransitionModel {
    /// Derive the model from a graph's adjacency.
    pub fn from_graph(graph: &GridGraph) -> Self {
        let rows = (0..graph.len())
            .map(|u| {
                let neighbors = graph.neighbors(u);
                if neighbors.is_empty() {
                    return Vec::new();
                }
                let p = 1.0 / neighbors.len() as f64;
                neighbors.iter().map(|&v| (v, p)).collect()
            })
            .collect();

        Self { rows }
    }

    /// Number of rows (one per node).
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if the model has no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Target probability of stepping from `u` to `v`.
    pub fn probability(&self, u: usize, v: usize) -> f64 {
        self.rows
            .get(u)
            .and_then(|row| {
                row.binary_search_by_key(&v, |&(n, _)| n)
                    .ok()
                    .map(|i| row[i].1)
            })
            .unwrap_or(0.0)
    }

    /// Non-zero entries of `u`'s row.
    pub fn row(&self, u: usize) -> &[(usize, f64)] {
        self.rows.get(u).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Sum of `u`'s row: 1.0 for nodes with edges, 0.0 otherwise.
    pub fn row_sum(&self, u: usize) -> f64 {
        self.row(u).iter().map(|&(_, p)| p).sum()
    }

    /// Dense copy of `u`'s row, one entry per node.
    pub fn dense_row(&self, u: usize) -> Vec<f64> {
        let mut dense = vec![0.0; self.rows.len()];
        for &(v, p) in self.row(u) {
            dense[v] = p;
        }
        dense
    }
}
