//! Route steps as supplied by a directions service.

use serde::{Deserialize, Serialize};

use rp_core::{GeoPoint, RouteId};

/// One manoeuvre of a route: how long it takes and the polyline it follows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    /// Travel time for this step in seconds.  Becomes the edge weight.
    pub duration_secs: f64,
    /// Points along the step, in travel order.
    pub geometry: Vec<GeoPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,
}

impl RouteStep {
    pub fn new(duration_secs: f64, geometry: Vec<GeoPoint>) -> Self {
        Self { duration_secs, geometry, distance_m: None, instruction: None }
    }

    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = Some(instruction.into());
        self
    }

    /// First point of the geometry, if any.
    pub fn start(&self) -> Option<GeoPoint> {
        self.geometry.first().copied()
    }

    /// Last point of the geometry, if any.
    pub fn end(&self) -> Option<GeoPoint> {
        self.geometry.last().copied()
    }
}

/// One alternative route (a "hypothesis") from a directions response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CandidateRoute {
    pub id: RouteId,
    pub steps: Vec<RouteStep>,
}

impl CandidateRoute {
    pub fn new(id: RouteId, steps: Vec<RouteStep>) -> Self {
        Self { id, steps }
    }

    /// Sum of all step durations, seconds.
    pub fn total_duration_secs(&self) -> f64 {
        self.steps.iter().map(|s| s.duration_secs).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
