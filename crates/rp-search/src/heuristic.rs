//! Traffic-adjusted remaining-time heuristic.
//!
//! ```text
//! estimate = distance(current, goal) / average_speed * traffic_multiplier
//! ```
//!
//! The multiplier is a fixed stand-in for measured congestion: `1.0` when
//! scoring the best-route hypothesis, `0.1667` for alternatives.  Edge
//! weights are real durations in seconds while the planar distance is in
//! degrees, so the estimate lives on a different scale from `g`.  See the
//! crate docs on admissibility.

use rp_core::{GeoPoint, NodeId, haversine_km, planar_distance};
use rp_graph::CoordinateLookup;

use crate::config::{DistanceMetric, HeuristicConfig};
use crate::{SearchError, SearchResult};

/// Delay ratio assumed for the best-route hypothesis.
pub const BEST_ROUTE_MULTIPLIER: f64 = 1.0;

/// Delay ratio assumed for every other hypothesis (10 of 60 minutes).
pub const ALTERNATIVE_ROUTE_MULTIPLIER: f64 = 0.1667;

/// Assumed average travel speed.
pub const DEFAULT_AVERAGE_SPEED: f64 = 50.0;

#[inline]
pub fn traffic_delay_multiplier(is_best_route_hypothesis: bool) -> f64 {
    if is_best_route_hypothesis {
        BEST_ROUTE_MULTIPLIER
    } else {
        ALTERNATIVE_ROUTE_MULTIPLIER
    }
}

/// Estimated remaining travel time from `current` to `goal`.
///
/// Non-decreasing in distance, and strictly increasing in
/// `traffic_multiplier` whenever the two points differ.
pub fn estimate_remaining_time(current: GeoPoint, goal: GeoPoint, config: &HeuristicConfig) -> f64 {
    let distance = match config.metric {
        DistanceMetric::Planar    => planar_distance(current, goal),
        DistanceMetric::Haversine => haversine_km(current, goal),
    };
    distance / config.average_speed * config.traffic_multiplier
}

// ── Heuristic trait ───────────────────────────────────────────────────────────

/// Scores a node's remaining cost to `goal` for frontier ordering.
pub trait Heuristic: Send + Sync {
    fn estimate(
        &self,
        coords: &dyn CoordinateLookup,
        node:   NodeId,
        goal:   NodeId,
    ) -> SearchResult<f64>;
}

/// The traffic-adjusted estimate over caller-supplied coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TrafficHeuristic {
    config: HeuristicConfig,
}

impl TrafficHeuristic {
    pub fn new(config: HeuristicConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HeuristicConfig {
        &self.config
    }
}

impl Heuristic for TrafficHeuristic {
    fn estimate(
        &self,
        coords: &dyn CoordinateLookup,
        node:   NodeId,
        goal:   NodeId,
    ) -> SearchResult<f64> {
        let here = coords.coords(node).ok_or(SearchError::MissingCoordinate(node))?;
        let there = coords.coords(goal).ok_or(SearchError::MissingCoordinate(goal))?;
        Ok(estimate_remaining_time(here, there, &self.config))
    }
}

/// Always zero: turns the best-first search into Dijkstra.  Needs no
/// coordinates.
#[derive(Copy, Clone, Debug, Default)]
pub struct ZeroHeuristic;

impl Heuristic for ZeroHeuristic {
    fn estimate(&self, _: &dyn CoordinateLookup, _: NodeId, _: NodeId) -> SearchResult<f64> {
        Ok(0.0)
    }
}
