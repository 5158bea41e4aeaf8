//! Route-step loaders.
//!
//! # Directions JSON
//!
//! A directions-service response with GeoJSON geometries:
//!
//! ```json
//! { "code": "Ok",
//!   "routes": [
//!     { "legs": [
//!         { "steps": [
//!             { "duration": 42.5, "distance": 310.0,
//!               "name": "Titova", "maneuver": { "instruction": "Turn left" },
//!               "geometry": { "type": "LineString",
//!                             "coordinates": [[18.41, 43.85], [18.42, 43.86]] } } ] } ] } ] }
//! ```
//!
//! GeoJSON coordinates are `[lng, lat]`.  Steps of all legs of a route are
//! concatenated in order.  Route `i` of the response gets `RouteId(i)`.
//!
//! # Step CSV
//!
//! One row per step.  `geometry` is a `;`-separated list of `"lat,lng"`
//! points:
//!
//! ```csv
//! route,duration_secs,geometry
//! 0,42.5,"43.85,18.41;43.86,18.42"
//! 0,30,"43.86,18.42;43.87,18.44"
//! 1,95,"43.85,18.41;43.87,18.44"
//! ```
//!
//! Routes keep the order of their first row; steps keep row order.

use std::io::Read;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::Deserialize;
use tracing::debug;

use rp_core::{GeoPoint, RouteId};

use crate::step::{CandidateRoute, RouteStep};
use crate::GraphError;

// ── Directions records ────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    code:    Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes:  Vec<RouteRecord>,
}

#[derive(Deserialize)]
struct RouteRecord {
    #[serde(default)]
    legs: Vec<LegRecord>,
}

#[derive(Deserialize)]
struct LegRecord {
    #[serde(default)]
    steps: Vec<StepRecord>,
}

#[derive(Deserialize)]
struct StepRecord {
    duration: f64,
    #[serde(default)]
    distance: Option<f64>,
    #[serde(default)]
    name:     Option<String>,
    #[serde(default)]
    maneuver: Option<ManeuverRecord>,
    geometry: LineStringRecord,
}

#[derive(Deserialize)]
struct ManeuverRecord {
    #[serde(default)]
    instruction: Option<String>,
}

#[derive(Deserialize)]
struct LineStringRecord {
    coordinates: Vec<[f64; 2]>,
}

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct CsvStepRecord {
    route:         u32,
    duration_secs: f64,
    geometry:      String,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load candidate routes from a directions JSON file.
pub fn load_directions_json(path: &Path) -> Result<Vec<CandidateRoute>, GraphError> {
    let file = std::fs::File::open(path)?;
    load_directions_reader(std::io::BufReader::new(file))
}

/// Like [`load_directions_json`] but accepts any `Read` source.
pub fn load_directions_reader<R: Read>(reader: R) -> Result<Vec<CandidateRoute>, GraphError> {
    let response: DirectionsResponse = serde_json::from_reader(reader)
        .map_err(|e| GraphError::Parse(e.to_string()))?;

    if let Some(code) = response.code.as_deref().filter(|c| !c.eq_ignore_ascii_case("ok")) {
        let message = response.message.unwrap_or_default();
        return Err(GraphError::Parse(format!(
            "directions service returned {code:?}: {message}"
        )));
    }

    let routes = response
        .routes
        .into_iter()
        .enumerate()
        .map(|(i, route)| {
            let steps = route
                .legs
                .into_iter()
                .flat_map(|leg| leg.steps)
                .map(step_from_record)
                .collect::<Result<Vec<_>, GraphError>>()?;
            Ok(CandidateRoute::new(route_id(i)?, steps))
        })
        .collect::<Result<Vec<_>, GraphError>>()?;

    debug!(routes = routes.len(), "loaded directions response");
    Ok(routes)
}

/// Load candidate routes from a step CSV file.
pub fn load_steps_csv(path: &Path) -> Result<Vec<CandidateRoute>, GraphError> {
    let file = std::fs::File::open(path)?;
    load_steps_reader(file)
}

/// Like [`load_steps_csv`] but accepts any `Read` source.
pub fn load_steps_reader<R: Read>(reader: R) -> Result<Vec<CandidateRoute>, GraphError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut routes: Vec<CandidateRoute> = Vec::new();
    let mut by_route: FxHashMap<u32, usize> = FxHashMap::default();

    for result in csv_reader.deserialize::<CsvStepRecord>() {
        let row = result.map_err(|e| GraphError::Parse(e.to_string()))?;
        let step = RouteStep::new(row.duration_secs, parse_geometry(&row.geometry)?);
        let slot = *by_route.entry(row.route).or_insert_with(|| {
            routes.push(CandidateRoute::new(RouteId(row.route), Vec::new()));
            routes.len() - 1
        });
        routes[slot].steps.push(step);
    }

    debug!(routes = routes.len(), "loaded step CSV");
    Ok(routes)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn route_id(i: usize) -> Result<RouteId, GraphError> {
    RouteId::try_from(i).map_err(|_| GraphError::Parse(format!("too many routes ({i})")))
}

fn step_from_record(r: StepRecord) -> Result<RouteStep, GraphError> {
    let geometry = r
        .geometry
        .coordinates
        .into_iter()
        .map(|[lng, lat]| GeoPoint::new(lat, lng))
        .collect::<Result<Vec<_>, _>>()?;
    let instruction = r.maneuver.and_then(|m| m.instruction).or(r.name);
    Ok(RouteStep {
        duration_secs: r.duration,
        geometry,
        distance_m: r.distance,
        instruction,
    })
}

fn parse_geometry(s: &str) -> Result<Vec<GeoPoint>, GraphError> {
    s.split(';')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| p.parse::<GeoPoint>().map_err(GraphError::from))
        .collect()
}
