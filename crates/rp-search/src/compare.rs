//! Ranking several candidate routes against each other.
//!
//! Each candidate is turned into its own step graph and searched from its
//! first to its last boundary node.  One candidate is scored as the
//! best-route hypothesis (multiplier `1.0`); every other candidate uses the
//! alternative multiplier.  All other heuristic settings come from the
//! supplied [`SearchConfig`].

use tracing::{debug, warn};

use rp_core::RouteId;
use rp_graph::{CandidateRoute, RouteNetwork};

use crate::config::SearchConfig;
use crate::heuristic::traffic_delay_multiplier;
use crate::router::{AStarRouter, Router, SearchOutcome};
use crate::{SearchError, SearchResult};

/// The result of searching one candidate route.
#[derive(Debug)]
pub struct RouteEvaluation {
    pub route:              RouteId,
    pub is_best_hypothesis: bool,
    pub outcome:            SearchResult<SearchOutcome>,
}

impl RouteEvaluation {
    pub fn total_cost(&self) -> Option<f64> {
        self.outcome.as_ref().ok().map(|o| o.total_cost)
    }
}

/// Every evaluation, in input order, plus a cost ranking of the successful
/// ones.
#[derive(Debug)]
pub struct RouteComparison {
    evaluations: Vec<RouteEvaluation>,
    /// Indices into `evaluations`, cheapest first; ties by `RouteId`.
    ranking:     Vec<usize>,
}

impl RouteComparison {
    /// Every evaluation, in input order.
    pub fn evaluations(&self) -> &[RouteEvaluation] {
        &self.evaluations
    }

    /// Indices into [`evaluations`](Self::evaluations) of the successful
    /// routes, cheapest first.
    pub fn ranking(&self) -> &[usize] {
        &self.ranking
    }

    /// The cheapest successfully searched route.
    pub fn winner(&self) -> Option<&RouteEvaluation> {
        self.ranking.first().map(|&i| &self.evaluations[i])
    }

    /// Successful evaluations, cheapest first.
    pub fn ranked(&self) -> impl Iterator<Item = &RouteEvaluation> + '_ {
        self.ranking.iter().map(|&i| &self.evaluations[i])
    }

    /// Evaluations that failed, in input order.
    pub fn failures(&self) -> impl Iterator<Item = &RouteEvaluation> + '_ {
        self.evaluations.iter().filter(|e| e.outcome.is_err())
    }
}

/// Search one candidate route end to end.
pub fn evaluate_route(
    route:              &CandidateRoute,
    is_best_hypothesis: bool,
    config:             &SearchConfig,
) -> SearchResult<SearchOutcome> {
    let network = RouteNetwork::from_steps(&route.steps)?;

    let mut config = config.clone();
    config.heuristic.traffic_multiplier = traffic_delay_multiplier(is_best_hypothesis);

    AStarRouter::new(config).route(
        &network.graph,
        &network.positions,
        network.start(),
        network.end(),
    )
}

/// Search every candidate and rank the results.
///
/// `best_route` is the index in `routes` of the best-route hypothesis;
/// directions services list their recommended route first, so callers
/// usually pass `0`.  An index past the end of a non-empty `routes` is a
/// `Config` error.  Fails with `NoViableRoute` when no candidate could be
/// searched.
pub fn compare_routes(
    routes:     &[CandidateRoute],
    best_route: usize,
    config:     &SearchConfig,
) -> SearchResult<RouteComparison> {
    config.validate()?;
    if !routes.is_empty() && best_route >= routes.len() {
        return Err(SearchError::Config(format!(
            "best_route index {best_route} is out of range for {} routes",
            routes.len()
        )));
    }

    let evaluate = |(i, route): (usize, &CandidateRoute)| {
        let is_best = i == best_route;
        let outcome = evaluate_route(route, is_best, config);
        if let Err(e) = &outcome {
            warn!(route = %route.id, error = %e, "candidate route could not be searched");
        }
        RouteEvaluation { route: route.id, is_best_hypothesis: is_best, outcome }
    };

    #[cfg(feature = "parallel")]
    let evaluations: Vec<RouteEvaluation> = {
        use rayon::prelude::*;
        routes.par_iter().enumerate().map(evaluate).collect()
    };

    #[cfg(not(feature = "parallel"))]
    let evaluations: Vec<RouteEvaluation> = routes.iter().enumerate().map(evaluate).collect();

    let mut ranking: Vec<usize> = evaluations
        .iter()
        .enumerate()
        .filter(|(_, e)| e.outcome.is_ok())
        .map(|(i, _)| i)
        .collect();

    if ranking.is_empty() {
        return Err(SearchError::NoViableRoute(routes.len()));
    }

    ranking.sort_by(|&a, &b| {
        let (ea, eb) = (&evaluations[a], &evaluations[b]);
        let ca = ea.total_cost().unwrap_or(f64::INFINITY);
        let cb = eb.total_cost().unwrap_or(f64::INFINITY);
        ca.total_cmp(&cb).then(ea.route.cmp(&eb.route))
    });

    if let Some(best) = ranking.first().map(|&i| &evaluations[i]) {
        debug!(
            candidates = routes.len(),
            ranked = ranking.len(),
            winner = %best.route,
            cost = ?best.total_cost(),
            "routes compared"
        );
    }

    Ok(RouteComparison { evaluations, ranking })
}
