//! Test utilities for DhruvaPatrol integration tests.
//!
//! Grid builders and patroller helpers shared across test files.

#![allow(dead_code)]

use dhruva_patrol::{GridGraph, OccupancyGrid, Patroller};

/// 3x3 grid with every cell free.
pub const OPEN_3X3: &str = "0 0 0\n0 0 0\n0 0 0\n";

/// 3x3 grid with the center blocked.
pub const RING_3X3: &str = "0 0 0\n0 1 0\n0 0 0\n";

/// Two rooms joined by a one-cell doorway, surrounded by walls.
pub const TWO_ROOMS: &str = "\
1 1 1 1 1 1 1 1 1
1 0 0 0 1 0 0 0 1
1 0 0 0 1 0 0 0 1
1 0 0 0 0 0 0 0 1
1 0 0 0 1 0 0 0 1
1 1 1 1 1 1 1 1 1
";

/// First free cell of [`TWO_ROOMS`].
pub const TWO_ROOMS_START: usize = 10;

/// Connected 5x3 grid on which the plain deltaP rule can cycle among
/// visited cells without ever finishing.
pub const TRAP_5X3: &str = "\
1 0 1
0 0 0
0 1 0
0 0 0
0 0 0
";

/// Start node and seed that lock [`TRAP_5X3`] into a cycle.
pub const TRAP_START: usize = 1;
pub const TRAP_SEED: u64 = 2;

/// Build a graph from grid text.
pub fn graph(text: &str) -> GridGraph {
    GridGraph::from_text(text).expect("valid grid")
}

/// All-free graph of the given size.
pub fn open_graph(rows: usize, cols: usize) -> GridGraph {
    GridGraph::build(OccupancyGrid::open(rows, cols))
}

/// Seeded patroller over grid text.
pub fn patroller(text: &str, start: usize, seed: u64) -> Patroller {
    Patroller::with_seed(graph(text), start, seed).expect("valid start node")
}

/// Advance until complete or `max_steps`, returning the visited path.
pub fn run_path(text: &str, start: usize, seed: u64, max_steps: usize) -> Vec<usize> {
    let mut p = patroller(text, start, seed);
    p.run(max_steps).expect("patrol runs");
    p.state().visited_path().to_vec()
}
