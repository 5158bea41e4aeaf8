//! Text and JSON rendering of command results.  Everything here goes to
//! stdout; logs go to stderr.

use anyhow::Result;
use serde::Serialize;

use rp_core::{GeoPoint, RouteId};
use rp_graph::{CandidateRoute, RouteNetwork};
use rp_search::{RouteComparison, SearchOutcome};

use crate::{Algorithm, OutputFormat};

fn hypothesis(is_best: bool) -> &'static str {
    if is_best { "best" } else { "alternative" }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ── haversine ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct DistanceReport {
    pub from:       GeoPoint,
    pub to:         GeoPoint,
    pub kilometres: f64,
}

pub fn print_distance(report: &DistanceReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(report),
        OutputFormat::Text => {
            println!("{:.3} km", report.kilometres);
            Ok(())
        }
    }
}

// ── search ────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct StepLine {
    pub index:         usize,
    pub duration_secs: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instruction:   Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchReport {
    pub route:           RouteId,
    pub hypothesis:      &'static str,
    pub algorithm:       &'static str,
    pub start:           String,
    pub goal:            String,
    pub path:            Vec<String>,
    pub steps:           Vec<StepLine>,
    pub total_cost_secs: f64,
    pub expanded:        usize,
    pub pushed:          usize,
}

impl SearchReport {
    pub fn new(
        route:     &CandidateRoute,
        is_best:   bool,
        algorithm: Algorithm,
        network:   &RouteNetwork,
        outcome:   &SearchOutcome,
    ) -> Self {
        let label = |n| network.graph.label(n).unwrap_or("?").to_owned();
        let path: Vec<String> = outcome.path.iter().map(|&n| label(n)).collect();
        let steps = outcome
            .step_range()
            .filter_map(|i| {
                route.steps.get(i).map(|s| StepLine {
                    index:         i,
                    duration_secs: s.duration_secs,
                    instruction:   s.instruction.clone(),
                })
            })
            .collect();

        Self {
            route: route.id,
            hypothesis: hypothesis(is_best),
            algorithm: match algorithm {
                Algorithm::Astar => "astar",
                Algorithm::Dijkstra => "dijkstra",
            },
            start: path.first().cloned().unwrap_or_default(),
            goal: path.last().cloned().unwrap_or_default(),
            path,
            steps,
            total_cost_secs: outcome.total_cost,
            expanded: outcome.stats.expanded,
            pushed: outcome.stats.pushed,
        }
    }
}

pub fn print_search(report: &SearchReport, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(report);
    }

    println!(
        "route {} ({} hypothesis, {})",
        report.route.0, report.hypothesis, report.algorithm
    );
    println!(
        "{} -> {}: {} steps, {:.1} s",
        report.start,
        report.goal,
        report.steps.len(),
        report.total_cost_secs
    );
    for (n, step) in report.steps.iter().enumerate() {
        match &step.instruction {
            Some(text) => println!("  {}. {} ({:.1} s)", n + 1, text, step.duration_secs),
            None => println!("  {}. step {} ({:.1} s)", n + 1, step.index, step.duration_secs),
        }
    }
    println!("expanded {} nodes, {} frontier pushes", report.expanded, report.pushed);
    Ok(())
}

// ── compare ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CompareRow {
    pub route:           RouteId,
    pub hypothesis:      &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank:            Option<usize>,
    pub steps:           usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_cost_secs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error:           Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CompareReport {
    pub winner: Option<RouteId>,
    /// Ranked routes first, then failures in input order.
    pub routes: Vec<CompareRow>,
}

impl CompareReport {
    pub fn new(routes: &[CandidateRoute], comparison: &RouteComparison) -> Self {
        let row = |i: usize, rank: Option<usize>| {
            let eval = &comparison.evaluations()[i];
            CompareRow {
                route:           eval.route,
                hypothesis:      hypothesis(eval.is_best_hypothesis),
                rank,
                steps:           routes.get(i).map_or(0, |r| r.steps.len()),
                total_cost_secs: eval.total_cost(),
                error:           eval.outcome.as_ref().err().map(ToString::to_string),
            }
        };

        let mut rows: Vec<CompareRow> = comparison
            .ranking()
            .iter()
            .enumerate()
            .map(|(rank, &i)| row(i, Some(rank + 1)))
            .collect();
        rows.extend(
            comparison
                .evaluations()
                .iter()
                .enumerate()
                .filter(|(_, e)| e.outcome.is_err())
                .map(|(i, _)| row(i, None)),
        );

        Self { winner: comparison.winner().map(|e| e.route), routes: rows }
    }
}

pub fn print_compare(report: &CompareReport, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(report);
    }

    println!("{:<5} {:<6} {:<12} {:>5} {:>10}", "rank", "route", "hypothesis", "steps", "time (s)");
    for row in &report.routes {
        let rank = row.rank.map_or_else(|| "-".to_owned(), |r| r.to_string());
        let time = match (&row.total_cost_secs, &row.error) {
            (Some(cost), _) => format!("{cost:.1}"),
            (None, Some(err)) => format!("error: {err}"),
            (None, None) => String::new(),
        };
        println!(
            "{:<5} {:<6} {:<12} {:>5} {:>10}",
            rank, row.route.0, row.hypothesis, row.steps, time
        );
    }
    if let Some(winner) = report.winner {
        println!("winner: route {}", winner.0);
    }
    Ok(())
}
