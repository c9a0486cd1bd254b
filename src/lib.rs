//! # DhruvaPatrol
//!
//! Uniform-visitation patrol planning over a static occupancy grid.
//!
//! ## Overview
//!
//! The free cells of an occupancy grid become the nodes of an 8-connected
//! graph. The uniform random walk on that graph (each neighbor of `u` with
//! probability `1/deg(u)`) is the target: over time every free cell should
//! be visited about as often as that walk would visit it. Each patrol step
//! picks the orthogonal neighbor whose observed edge share is closest to
//! the target, so the route self-corrects using only local counts.
//!
//! ## Quick Start
//!
//! ```rust
//! use dhruva_patrol::{Axis, GridGraph, Patroller};
//!
//! let graph = GridGraph::from_text("0 0 0\n0 1 0\n0 0 0\n")?;
//! let mut patroller = Patroller::with_seed(graph, 0, 42)?;
//!
//! while !patroller.is_completed() {
//!     patroller.advance()?;
//!     let (x, y) = (
//!         patroller.current_coordinate(Axis::X),
//!         patroller.current_coordinate(Axis::Y),
//!     );
//!     // command the robot toward (x, y)
//!     # let _ = (x, y);
//! }
//! # Ok::<(), dhruva_patrol::PatrolError>(())
//! ```
//!
//! ## Movement
//!
//! The graph and transition model include diagonal edges, but the agent
//! only ever moves orthogonally. A free cell that touches the rest of the
//! free space only at a corner can never be reached.
//!
//! Even on a grid whose free cells are all orthogonally connected, the
//! local rule can settle into a cycle among visited cells and never finish.
//! [`Patroller::run`] always takes a step cap for that reason. Setting a
//! stall limit ([`Patroller::with_stall_limit`], `[patrol] stall_limit`)
//! sends the agent toward the nearest unvisited cell after that many
//! consecutive revisits, which guarantees completion on such grids.
//!
//! ## Modules
//!
//! - [`grid`]: occupancy grid parsing and graph construction
//! - [`transition`]: target transition probabilities
//! - [`patrol`]: runtime state, decision rule, and [`Patroller`]
//! - [`config`]: TOML configuration
//! - [`io`]: visited-path persistence

pub mod config;
pub mod error;
pub mod grid;
pub mod io;
pub mod patrol;
pub mod transition;

pub use config::{DEFAULT_START_NODE, OutputConfig, PatrolConfig, PatrolSettings};
pub use error::{PatrolError, Result};
pub use grid::{GridCoord, GridGraph, Node, OccupancyGrid};
pub use patrol::{
    Axis, Candidate, CoverageStats, Move, NextNodeSelector, NodeKind, PatrolState, PatrolSummary,
    Patroller, StepOutcome,
};
pub use transition::TransitionModel;
