//! `rp-search` — traffic-adjusted best-first search over route graphs.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                    |
//! |---------------|-------------------------------------------------------------|
//! | [`config`]    | `HeuristicConfig`, `SearchConfig`, `DistanceMetric`         |
//! | [`heuristic`] | Traffic multiplier, remaining-time estimate, `Heuristic`    |
//! | [`context`]   | `SearchContext` — per-call scores and frontier              |
//! | [`router`]    | `Router` trait, `AStarRouter`, `DijkstraRouter`             |
//! | [`compare`]   | `compare_routes` over several candidate routes              |
//! | [`error`]     | `SearchError`, `SearchResult<T>`                            |
//!
//! # Admissibility
//!
//! The traffic heuristic divides a degree-space distance by a speed and
//! scales it by an assumed delay ratio.  It is not a lower bound on the
//! remaining edge cost, so [`AStarRouter`] is a weighted best-first search
//! and may return a costlier path than [`DijkstraRouter`] on graphs with
//! branching.  On the linear step graphs produced by `rp_graph::build_graph`
//! there is only one path and both agree.
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `parallel` | `compare_routes` searches candidates with Rayon.         |

pub mod compare;
pub mod config;
pub mod context;
pub mod error;
pub mod heuristic;
pub mod router;


pub use compare::{RouteComparison, RouteEvaluation, compare_routes, evaluate_route};
pub use config::{DistanceMetric, HeuristicConfig, SearchConfig};
pub use context::SearchContext;
pub use error::{SearchError, SearchResult};
pub use heuristic::{
    ALTERNATIVE_ROUTE_MULTIPLIER, BEST_ROUTE_MULTIPLIER, DEFAULT_AVERAGE_SPEED, Heuristic,
    TrafficHeuristic, ZeroHeuristic, estimate_remaining_time, traffic_delay_multiplier,
};
pub use router::{AStarRouter, CancelToken, DijkstraRouter, Router, SearchOutcome, SearchStats};
