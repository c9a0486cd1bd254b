//! Occupancy grid and the navigable graph built from it.
//!
//! - [`OccupancyGrid`]: free/blocked cells parsed from text
//! - [`GridGraph`]: 8-connected adjacency over free cells
//! - [`GridCoord`]: (row, column) cell coordinates

mod coord;
mod graph;
mod occupancy;

pub use coord::GridCoord;
pub use graph::{GridGraph, Node};
pub use occupancy::OccupancyGrid;
