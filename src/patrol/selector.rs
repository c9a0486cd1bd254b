//! Per-step next-node decision rule.
//!
//! From the current node the agent may step to any free orthogonal
//! neighbor. Each candidate `t` is scored by
//!
//! ```text
//! deltaP = | edge_count(current, t) / visit_count(t) - P(current, t) |
//! ```
//!
//! the gap between how often arrivals at `t` came over this edge and how
//! often the uniform random walk says they should. The candidate with the
//! smallest gap wins; ties are broken uniformly at random.
//!
//! A candidate that has never been visited has no ratio to compare. It
//! scores `-inf`, so unvisited neighbors always win over visited ones.
//!
//! The graph and transition model include diagonal edges, but only
//! orthogonal moves are ever candidates.
//!
//! The rule is purely local. Once every orthogonal neighbor of the agent
//! has been visited, nothing pulls it toward the unvisited part of the
//! grid, and on some connected grids it settles into a cycle among
//! visited cells forever. [`NextNodeSelector::with_stall_limit`] opts into
//! an escape: after that many consecutive revisits the agent takes the
//! first step of a shortest orthogonal route to the nearest unvisited cell
//! instead.

use rand::Rng;
use rand::rngs::StdRng;

use super::state::{NodeKind, PatrolState};
use crate::error::{PatrolError, Result};
use crate::grid::GridGraph;
use crate::transition::TransitionModel;

/// A scored move candidate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    /// Target node index
    pub node: usize,
    /// Deviation from the target distribution (`-inf` if never visited)
    pub delta_p: f64,
}

/// One move made by the selector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Move {
    /// Node departed
    pub from: usize,
    /// Node arrived at
    pub to: usize,
    /// Whether `to` was being visited for the first time
    pub kind: NodeKind,
    /// Winning deltaP
    pub delta_p: f64,
    /// Size of the best-set the move was drawn from (1 for escape moves)
    pub ties: usize,
    /// Whether the move was an escape toward an unvisited cell
    pub escape: bool,
}

/// Result of one selector step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StepOutcome {
    /// The agent moved.
    Moved(Move),
    /// Coverage was already complete; nothing changed.
    Completed,
}

impl StepOutcome {
    /// The move, if one was made.
    pub fn as_move(&self) -> Option<&Move> {
        match self {
            StepOutcome::Moved(m) => Some(m),
            StepOutcome::Completed => None,
        }
    }
}

/// Picks the next node and applies the move to [`PatrolState`].
///
/// Owns the only source of randomness in the patrol. Inject a seeded RNG
/// for reproducible paths.
#[derive(Clone, Debug)]
pub struct NextNodeSelector<R = StdRng> {
    rng: R,
    tie_tolerance: f64,
    stall_limit: Option<usize>,
}

impl<R: Rng> NextNodeSelector<R> {
    /// Create a selector that breaks ties with `rng`.
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            tie_tolerance: 0.0,
            stall_limit: None,
        }
    }

    /// Treat deltaP values within `tolerance` of the best as ties.
    pub fn with_tie_tolerance(mut self, tolerance: f64) -> Self {
        self.tie_tolerance = tolerance.max(0.0);
        self
    }

    /// Escape toward the nearest unvisited cell after `limit` consecutive
    /// revisits. `None` keeps the pure deltaP rule.
    pub fn with_stall_limit(mut self, limit: Option<usize>) -> Self {
        self.stall_limit = limit;
        self
    }

    /// Score every legal move from the current node.
    pub fn candidates(
        &self,
        state: &PatrolState,
        graph: &GridGraph,
        model: &TransitionModel,
    ) -> Vec<Candidate> {
        let current = state.current();
        graph
            .orthogonal_moves(current)
            .map(|node| Candidate {
                node,
                delta_p: delta_p(state, model, current, node),
            })
            .collect()
    }

    /// Candidates sharing the smallest deltaP.
    ///
    /// Fails with [`PatrolError::UnreachableTopology`] if the current node
    /// has no free orthogonal neighbor.
    pub fn best_set(
        &self,
        state: &PatrolState,
        graph: &GridGraph,
        model: &TransitionModel,
    ) -> Result<(Vec<usize>, f64)> {
        let candidates = self.candidates(state, graph, model);
        tied_best(&candidates, self.tie_tolerance).ok_or(PatrolError::UnreachableTopology {
            node: state.current(),
        })
    }

    /// Choose the next node and move the agent there.
    ///
    /// Does nothing once coverage is complete.
    pub fn step(
        &mut self,
        state: &mut PatrolState,
        graph: &GridGraph,
        model: &TransitionModel,
    ) -> Result<StepOutcome> {
        if state.is_completed() {
            return Ok(StepOutcome::Completed);
        }

        let from = state.current();
        let escape_to = self
            .stall_limit
            .filter(|&limit| state.revisit_streak() >= limit)
            .and_then(|_| graph.first_step_toward(from, |i| state.is_unvisited(i)));

        let (to, delta_p, ties) = match escape_to {
            Some(to) => (to, delta_p(state, model, from, to), 1),
            None => {
                let (best, delta_p) = self.best_set(state, graph, model)?;
                let to = if best.len() > 1 {
                    best[self.rng.random_range(0..best.len())]
                } else {
                    best[0]
                };
                (to, delta_p, best.len())
            }
        };

        let kind = state.apply_move(to);

        tracing::debug!(
            "Patrol step {}: {} -> {} (deltaP {:.4}, {} tied, escape {}, {} unvisited left)",
            state.steps(),
            from,
            to,
            delta_p,
            ties,
            escape_to.is_some(),
            state.unvisited_remaining()
        );

        Ok(StepOutcome::Moved(Move {
            from,
            to,
            kind,
            delta_p,
            ties,
            escape: escape_to.is_some(),
        }))
    }
}

/// Nodes whose deltaP is within `tolerance` of the minimum, with that minimum.
///
/// `None` if there are no candidates. Every candidate is measured against
/// the true minimum, so a run of near-equal scores cannot widen the set.
fn tied_best(candidates: &[Candidate], tolerance: f64) -> Option<(Vec<usize>, f64)> {
    let min = candidates
        .iter()
        .map(|c| c.delta_p)
        .min_by(f64::total_cmp)?;
    let best = candidates
        .iter()
        .filter(|c| c.delta_p == min || c.delta_p - min <= tolerance)
        .map(|c| c.node)
        .collect();
    Some((best, min))
}

/// Deviation of the observed edge share from the model for `from -> to`.
fn delta_p(state: &PatrolState, model: &TransitionModel, from: usize, to: usize) -> f64 {
    let visits = state.visit_count(to);
    if visits == 0 {
        return f64::NEG_INFINITY;
    }
    let observed = state.edge_count(from, to) as f64 / visits as f64;
    (observed - model.probability(from, to)).abs()
}
