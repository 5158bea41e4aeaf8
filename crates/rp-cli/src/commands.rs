use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use tracing::info;

use rp_core::{GeoPoint, NodeId, RouteId};
use rp_graph::{CandidateRoute, RouteNetwork, load_directions_json, load_steps_csv};
use rp_search::{
    AStarRouter, DijkstraRouter, Router, SearchConfig, compare_routes, traffic_delay_multiplier,
};

use crate::output::{self, CompareReport, DistanceReport, SearchReport};
use crate::{Algorithm, OutputFormat};

pub struct SearchArgs {
    pub input:     PathBuf,
    pub route:     Option<u32>,
    pub from:      Option<GeoPoint>,
    pub to:        Option<GeoPoint>,
    pub best:      bool,
    pub speed:     Option<f64>,
    pub algorithm: Algorithm,
}

pub fn handle_haversine(from: GeoPoint, to: GeoPoint, format: OutputFormat) -> Result<()> {
    let report = DistanceReport { from, to, kilometres: from.haversine_km(to) };
    output::print_distance(&report, format)
}

pub fn handle_search(args: &SearchArgs, mut config: SearchConfig, format: OutputFormat) -> Result<()> {
    let routes = load_routes(&args.input)?;
    let index = match args.route {
        Some(id) => route_index(&routes, id)?,
        None => 0,
    };
    let route = routes
        .get(index)
        .ok_or_else(|| anyhow!("{} contains no routes", args.input.display()))?;

    let is_best = args.best || index == 0;
    config.heuristic.traffic_multiplier = traffic_delay_multiplier(is_best);
    if let Some(speed) = args.speed {
        config.heuristic.average_speed = speed;
    }

    let network = RouteNetwork::from_steps(&route.steps)
        .with_context(|| format!("failed to build the graph for route {}", route.id))?;
    let start = snap(&network, args.from, network.start(), "start")?;
    let goal = snap(&network, args.to, network.end(), "goal")?;

    info!(route = %route.id, %start, %goal, algorithm = ?args.algorithm, "searching");
    let router: Box<dyn Router> = match args.algorithm {
        Algorithm::Astar => Box::new(AStarRouter::new(config)),
        Algorithm::Dijkstra => Box::new(DijkstraRouter::new(config)),
    };
    let outcome = router
        .route(&network.graph, &network.positions, start, goal)
        .with_context(|| format!("search failed on route {}", route.id))?;

    let report = SearchReport::new(route, is_best, args.algorithm, &network, &outcome);
    output::print_search(&report, format)
}

pub fn handle_compare(
    input:      &Path,
    best_route: Option<u32>,
    config:     &SearchConfig,
    format:     OutputFormat,
) -> Result<()> {
    let routes = load_routes(input)?;
    let best = match best_route {
        Some(id) => route_index(&routes, id)?,
        None => 0,
    };

    info!(routes = routes.len(), best_route = best, "comparing");
    let comparison = compare_routes(&routes, best, config).context("route comparison failed")?;

    let report = CompareReport::new(&routes, &comparison);
    output::print_compare(&report, format)
}

/// Pick the loader from the file extension.
pub fn load_routes(path: &Path) -> Result<Vec<CandidateRoute>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let routes = match ext.as_deref() {
        Some("json") => load_directions_json(path),
        Some("csv") => load_steps_csv(path),
        _ => bail!("unsupported input {}: expected a .json or .csv file", path.display()),
    }
    .with_context(|| format!("failed to load routes from {}", path.display()))?;

    if routes.is_empty() {
        bail!("{} contains no routes", path.display());
    }
    Ok(routes)
}

fn route_index(routes: &[CandidateRoute], id: u32) -> Result<usize> {
    routes
        .iter()
        .position(|r| r.id == RouteId(id))
        .ok_or_else(|| anyhow!("no route with id {id}"))
}

fn snap(network: &RouteNetwork, at: Option<GeoPoint>, fallback: NodeId, role: &str) -> Result<NodeId> {
    match at {
        None => Ok(fallback),
        Some(point) => network
            .positions
            .snap_to_node(point)
            .ok_or_else(|| anyhow!("could not snap the {role} point {point} to the route")),
    }
}
