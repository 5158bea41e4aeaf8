//! Search configuration.
//!
//! Both structs deserialize from JSON with every field optional:
//!
//! ```json
//! { "heuristic": { "average_speed": 50, "traffic_multiplier": 0.1667, "metric": "planar" },
//!   "max_expansions": 100000,
//!   "timeout_ms": 250 }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::heuristic::{DEFAULT_AVERAGE_SPEED, traffic_delay_multiplier};
use crate::{SearchError, SearchResult};

/// Which estimator turns two points into a distance for the heuristic.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Euclidean distance in degree space.
    #[default]
    Planar,
    /// Great-circle distance in kilometres.
    Haversine,
}

/// Immutable heuristic parameters, resolved once per search.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicConfig {
    /// Assumed average travel speed (distance units per time unit).
    pub average_speed:      f64,
    /// Assumed traffic-delay ratio applied to the time estimate.
    pub traffic_multiplier: f64,
    pub metric:             DistanceMetric,
}

impl HeuristicConfig {
    /// Parameters for a best-route (`true`) or alternative-route (`false`)
    /// hypothesis at the default speed.
    pub fn for_hypothesis(is_best_route_hypothesis: bool) -> Self {
        Self {
            average_speed:      DEFAULT_AVERAGE_SPEED,
            traffic_multiplier: traffic_delay_multiplier(is_best_route_hypothesis),
            metric:             DistanceMetric::Planar,
        }
    }

    pub fn with_average_speed(mut self, average_speed: f64) -> Self {
        self.average_speed = average_speed;
        self
    }

    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    pub fn validate(&self) -> SearchResult<()> {
        if !(self.average_speed.is_finite() && self.average_speed > 0.0) {
            return Err(SearchError::Config(format!(
                "average_speed must be a positive number, got {}",
                self.average_speed
            )));
        }
        if !(self.traffic_multiplier.is_finite() && self.traffic_multiplier >= 0.0) {
            return Err(SearchError::Config(format!(
                "traffic_multiplier must be a non-negative number, got {}",
                self.traffic_multiplier
            )));
        }
        Ok(())
    }
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self::for_hypothesis(true)
    }
}

/// Everything a single search needs besides the graph.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub heuristic:      HeuristicConfig,
    /// Stop with `ExpansionLimit` after this many node expansions.
    pub max_expansions: Option<usize>,
    /// Stop with `DeadlineExceeded` once this much wall time has passed.
    pub timeout_ms:     Option<u64>,
}

impl SearchConfig {
    pub fn new(heuristic: HeuristicConfig) -> Self {
        Self { heuristic, ..Self::default() }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn validate(&self) -> SearchResult<()> {
        self.heuristic.validate()
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(s: &str) -> SearchResult<Self> {
        let config: SearchConfig =
            serde_json::from_str(s).map_err(|e| SearchError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_path(path: &Path) -> SearchResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            SearchError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&text)
    }
}
