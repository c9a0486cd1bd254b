//! Patrol runtime: state, decision rule, and the agent-facing facade.
//!
//! [`Patroller`] owns the immutable graph and transition model together
//! with the mutable [`PatrolState`] and the [`NextNodeSelector`]. An outer
//! control loop calls [`Patroller::advance`] once per tick and reads
//! [`Patroller::current_coordinate`] to command physical motion.

mod selector;
mod state;

pub use selector::{Candidate, Move, NextNodeSelector, StepOutcome};
pub use state::{CoverageStats, NodeKind, PatrolState};

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::PatrolSettings;
use crate::error::Result;
use crate::grid::{GridCoord, GridGraph};
use crate::transition::TransitionModel;

/// Coordinate axis of a grid position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Row
    X,
    /// Column
    Y,
}

/// Result of [`Patroller::run`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PatrolSummary {
    /// Moves made during this run
    pub steps: usize,
    /// Whether coverage completed
    pub completed: bool,
    /// Arrivals at never-visited nodes
    pub first_visits: usize,
    /// Arrivals at already-visited nodes
    pub revisits: usize,
}

/// Single-agent patrol over a grid graph.
#[derive(Clone, Debug)]
pub struct Patroller<R = StdRng> {
    graph: GridGraph,
    model: TransitionModel,
    state: PatrolState,
    selector: NextNodeSelector<R>,
}

impl Patroller<StdRng> {
    /// Patroller whose tie-breaks are seeded from OS entropy.
    pub fn from_entropy(graph: GridGraph, start: usize) -> Result<Self> {
        Self::with_rng(graph, start, StdRng::from_os_rng())
    }

    /// Patroller with a fixed tie-break seed.
    pub fn with_seed(graph: GridGraph, start: usize, seed: u64) -> Result<Self> {
        Self::with_rng(graph, start, StdRng::seed_from_u64(seed))
    }

    /// Patroller configured from `[patrol]` settings.
    pub fn from_settings(graph: GridGraph, settings: &PatrolSettings) -> Result<Self> {
        let patroller = match settings.seed {
            Some(seed) => Self::with_seed(graph, settings.start_node, seed)?,
            None => Self::from_entropy(graph, settings.start_node)?,
        };
        Ok(patroller
            .with_tie_tolerance(settings.tie_tolerance)
            .with_stall_limit(settings.stall_limit))
    }
}

impl<R: Rng> Patroller<R> {
    /// Patroller that breaks ties with `rng`.
    ///
    /// Fails if `start` is outside the grid or blocked.
    pub fn with_rng(graph: GridGraph, start: usize, rng: R) -> Result<Self> {
        let model = TransitionModel::from_graph(&graph);
        let state = PatrolState::new(&graph, start)?;

        let unreachable = unreachable_count(&graph, start);
        if unreachable > 0 {
            tracing::warn!(
                "{} free nodes cannot be reached from node {} by orthogonal moves; coverage will not complete",
                unreachable,
                start
            );
        }

        Ok(Self {
            graph,
            model,
            state,
            selector: NextNodeSelector::new(rng),
        })
    }

    /// Treat deltaP values within `tolerance` as ties.
    pub fn with_tie_tolerance(mut self, tolerance: f64) -> Self {
        self.selector = self.selector.with_tie_tolerance(tolerance);
        self
    }

    /// Escape toward the nearest unvisited cell after `limit` consecutive
    /// revisits.
    pub fn with_stall_limit(mut self, limit: Option<usize>) -> Self {
        self.selector = self.selector.with_stall_limit(limit);
        self
    }

    /// Make one decision and move. No-op once coverage is complete.
    pub fn advance(&mut self) -> Result<StepOutcome> {
        let was_completed = self.state.is_completed();
        let outcome = self
            .selector
            .step(&mut self.state, &self.graph, &self.model)?;

        if !was_completed && self.state.is_completed() {
            tracing::info!(
                "Coverage complete after {} steps ({} free nodes)",
                self.state.steps(),
                self.graph.grid().free_count()
            );
        }
        Ok(outcome)
    }

    /// Advance until coverage completes or `max_steps` moves have been made.
    pub fn run(&mut self, max_steps: usize) -> Result<PatrolSummary> {
        let mut summary = PatrolSummary::default();

        while summary.steps < max_steps {
            match self.advance()? {
                StepOutcome::Moved(m) => {
                    summary.steps += 1;
                    match m.kind {
                        NodeKind::FirstVisit => summary.first_visits += 1,
                        NodeKind::Revisit => summary.revisits += 1,
                    }
                }
                StepOutcome::Completed => break,
            }
        }

        summary.completed = self.state.is_completed();
        if !summary.completed {
            tracing::warn!(
                "Step limit {} reached with {} free nodes still unvisited",
                max_steps,
                self.state.unvisited_remaining()
            );
        }
        Ok(summary)
    }

    /// Index of the node the agent occupies.
    #[inline]
    pub fn current_node(&self) -> usize {
        self.state.current()
    }

    /// Grid position of the node the agent occupies.
    pub fn current_position(&self) -> GridCoord {
        self.graph
            .node(self.state.current())
            .map(|n| n.position)
            .unwrap_or_default()
    }

    /// One coordinate of the current position, for motion commands.
    pub fn current_coordinate(&self, axis: Axis) -> f32 {
        let position = self.current_position();
        match axis {
            Axis::X => position.x as f32,
            Axis::Y => position.y as f32,
        }
    }

    /// Whether the agent just arrived somewhere new or is revisiting.
    #[inline]
    pub fn current_node_kind(&self) -> NodeKind {
        self.state.last_arrival()
    }

    /// True once every free node has been visited.
    #[inline]
    pub fn is_completed(&self) -> bool {
        self.state.is_completed()
    }

    /// The navigable graph.
    #[inline]
    pub fn graph(&self) -> &GridGraph {
        &self.graph
    }

    /// The target transition model.
    #[inline]
    pub fn model(&self) -> &TransitionModel {
        &self.model
    }

    /// The runtime state.
    #[inline]
    pub fn state(&self) -> &PatrolState {
        &self.state
    }

    /// Visit-count statistics.
    pub fn coverage_stats(&self) -> CoverageStats {
        self.state.coverage_stats(&self.graph)
    }
}

/// Free nodes that no sequence of orthogonal moves from `start` reaches.
fn unreachable_count(graph: &GridGraph, start: usize) -> usize {
    let mut seen = vec![false; graph.len()];
    let mut queue = VecDeque::from([start]);
    seen[start] = true;
    let mut reached = 1;

    while let Some(node) = queue.pop_front() {
        for next in graph.orthogonal_moves(node) {
            if !seen[next] {
                seen[next] = true;
                reached += 1;
                queue.push_back(next);
            }
        }
    }

    graph.grid().free_count() - reached
}
