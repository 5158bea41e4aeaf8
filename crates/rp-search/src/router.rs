//! Routing trait and best-first search implementations.
//!
//! # Pluggability
//!
//! Callers go through the [`Router`] trait so the traffic-guided
//! [`AStarRouter`] and the reference [`DijkstraRouter`] are interchangeable.
//!
//! # Search loop
//!
//! 1. Validate: the graph is non-empty and contains `start` and `goal`.
//! 2. `start == goal` returns `[start]` at cost 0 without touching the
//!    frontier.
//! 3. Open `start` with `g = 0`, `f = h(start)`.
//! 4. Pop the lowest `(f, NodeId)`.  If it is `goal`, rebuild the path.
//!    Otherwise relax every out-edge: a strictly cheaper `g` records the
//!    predecessor, rescores the neighbour and (re)opens it.
//! 5. An exhausted frontier is `NoPathFound`.
//!
//! Cancellation, the deadline and the expansion cap are checked once per
//! iteration, after the goal test and before the popped node is expanded.
//! Reaching the goal is not an expansion, so a cap of `n` admits every
//! search that needs at most `n` expansions.

use std::ops::Range;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, trace, warn};

use rp_core::NodeId;
use rp_graph::{CoordinateLookup, RouteGraph};

use crate::config::SearchConfig;
use crate::context::SearchContext;
use crate::heuristic::{Heuristic, TrafficHeuristic, ZeroHeuristic};
use crate::{SearchError, SearchResult};

// ── SearchOutcome ─────────────────────────────────────────────────────────────

/// Counters collected during one search.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Nodes taken off the frontier and expanded.
    pub expanded: usize,
    /// Frontier insertions, including re-openings.
    pub pushed:   usize,
}

/// A successful search: the node path from start to goal and its cost.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub path:       Vec<NodeId>,
    /// Sum of edge weights along `path` (seconds).
    pub total_cost: f64,
    pub stats:      SearchStats,
}

impl SearchOutcome {
    /// `true` if start and goal were the same node.
    pub fn is_trivial(&self) -> bool {
        self.path.len() <= 1
    }

    /// Steps covered by the path on a graph from `rp_graph::build_graph`,
    /// where node `i` is the boundary before step `i`.
    pub fn step_range(&self) -> Range<usize> {
        match (self.path.first(), self.path.last()) {
            (Some(first), Some(last)) => first.index()..last.index(),
            _ => 0..0,
        }
    }
}

// ── Cancellation ──────────────────────────────────────────────────────────────

/// Shared flag that stops a running search at its next iteration.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
///
/// Implementations are `Send + Sync`; each call builds its own
/// [`SearchContext`], so one router may serve many threads at once.
pub trait Router: Send + Sync {
    /// Find a path from `start` to `goal`.
    fn route(
        &self,
        graph:  &RouteGraph,
        coords: &dyn CoordinateLookup,
        start:  NodeId,
        goal:   NodeId,
    ) -> SearchResult<SearchOutcome>;
}

// ── AStarRouter ───────────────────────────────────────────────────────────────

/// Best-first search ordered by `g + traffic heuristic`.
#[derive(Clone, Debug, Default)]
pub struct AStarRouter {
    config: SearchConfig,
    cancel: Option<CancelToken>,
}

impl AStarRouter {
    pub fn new(config: SearchConfig) -> Self {
        Self { config, cancel: None }
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
}

impl Router for AStarRouter {
    fn route(
        &self,
        graph:  &RouteGraph,
        coords: &dyn CoordinateLookup,
        start:  NodeId,
        goal:   NodeId,
    ) -> SearchResult<SearchOutcome> {
        self.config.validate()?;
        let heuristic = TrafficHeuristic::new(self.config.heuristic);
        let limits = Limits::new(&self.config, self.cancel.as_ref());
        best_first(graph, coords, start, goal, &heuristic, &limits)
    }
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// The same loop with a zero heuristic.  Returns optimal costs and needs no
/// coordinates; useful as a reference for [`AStarRouter`].
#[derive(Clone, Debug, Default)]
pub struct DijkstraRouter {
    config: SearchConfig,
    cancel: Option<CancelToken>,
}

impl DijkstraRouter {
    /// Only `max_expansions` and `timeout_ms` of `config` apply.
    pub fn new(config: SearchConfig) -> Self {
        Self { config, cancel: None }
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

impl Router for DijkstraRouter {
    fn route(
        &self,
        graph:  &RouteGraph,
        coords: &dyn CoordinateLookup,
        start:  NodeId,
        goal:   NodeId,
    ) -> SearchResult<SearchOutcome> {
        let limits = Limits::new(&self.config, self.cancel.as_ref());
        best_first(graph, coords, start, goal, &ZeroHeuristic, &limits)
    }
}

// ── Search internals ──────────────────────────────────────────────────────────

struct Limits<'a> {
    deadline:       Option<Instant>,
    max_expansions: Option<usize>,
    cancel:         Option<&'a CancelToken>,
}

impl<'a> Limits<'a> {
    fn new(config: &SearchConfig, cancel: Option<&'a CancelToken>) -> Self {
        Self {
            deadline: config.timeout().map(|t| Instant::now() + t),
            max_expansions: config.max_expansions,
            cancel,
        }
    }

    fn check(&self, expanded: usize) -> SearchResult<()> {
        if self.cancel.is_some_and(CancelToken::is_cancelled) {
            return Err(SearchError::Cancelled);
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(SearchError::DeadlineExceeded { expanded });
        }
        if let Some(limit) = self.max_expansions.filter(|&limit| expanded >= limit) {
            return Err(SearchError::ExpansionLimit { limit });
        }
        Ok(())
    }
}

fn validate_endpoints(graph: &RouteGraph, start: NodeId, goal: NodeId) -> SearchResult<()> {
    if graph.is_empty() {
        return Err(SearchError::InvalidGraph("graph has no nodes".into()));
    }
    for (role, node) in [("start", start), ("goal", goal)] {
        if !graph.contains(node) {
            return Err(SearchError::InvalidGraph(format!(
                "{role} node {node} is not in the graph"
            )));
        }
    }
    Ok(())
}

fn best_first<H: Heuristic + ?Sized>(
    graph:     &RouteGraph,
    coords:    &dyn CoordinateLookup,
    start:     NodeId,
    goal:      NodeId,
    heuristic: &H,
    limits:    &Limits<'_>,
) -> SearchResult<SearchOutcome> {
    validate_endpoints(graph, start, goal)?;

    if start == goal {
        return Ok(SearchOutcome {
            path:       vec![start],
            total_cost: 0.0,
            stats:      SearchStats::default(),
        });
    }

    let mut stats = SearchStats::default();
    let mut ctx = SearchContext::new(graph.node_count());

    let h_start = heuristic.estimate(coords, start, goal)?;
    ctx.relax(start, 0.0, h_start, None);
    stats.pushed += 1;
    debug!(%start, %goal, nodes = graph.node_count(), h_start, "search started");

    while let Some(current) = ctx.pop_min() {
        if current == goal {
            let total_cost = ctx.g_score(goal);
            let path = ctx.reconstruct_path(goal);
            debug!(
                hops = path.len() - 1,
                total_cost,
                expanded = stats.expanded,
                "search reached goal"
            );
            return Ok(SearchOutcome { path, total_cost, stats });
        }

        if let Err(e) = limits.check(stats.expanded) {
            warn!(%start, %goal, expanded = stats.expanded, error = %e, "search stopped early");
            return Err(e);
        }

        stats.expanded += 1;
        let g_current = ctx.g_score(current);
        trace!(node = %current, g = g_current, f = ctx.f_score(current), "expand");

        for edge in graph.out_edges(current) {
            let tentative = g_current + edge.weight;
            if tentative < ctx.g_score(edge.to) {
                let h = heuristic.estimate(coords, edge.to, goal)?;
                ctx.relax(edge.to, tentative, tentative + h, Some(current));
                stats.pushed += 1;
            }
        }
    }

    debug!(%start, %goal, expanded = stats.expanded, "frontier exhausted");
    Err(SearchError::NoPathFound { from: start, to: goal })
}
