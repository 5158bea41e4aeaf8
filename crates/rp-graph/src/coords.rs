//! Node coordinates and spatial snapping.
//!
//! Route graphs only carry labels.  The heuristic needs a position for every
//! node it scores, which callers provide through [`CoordinateLookup`].
//!
//! # Step boundary positions
//!
//! [`NodePositions::from_steps`] places the synthetic `step_i` nodes:
//!
//! - `step_i` (i < len) sits at the first point of step `i`'s geometry;
//! - `step_len` sits at the last point of the last step's geometry;
//! - a step with an empty geometry reuses the most recent known point.
//!
//! Only the very first step must carry geometry.

use std::collections::HashMap;
use std::hash::BuildHasher;

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use rp_core::{GeoPoint, NodeId};

use crate::step::RouteStep;
use crate::{GraphError, GraphResult};

/// Maps a node to its geographic position.
pub trait CoordinateLookup {
    fn coords(&self, node: NodeId) -> Option<GeoPoint>;
}

impl CoordinateLookup for [GeoPoint] {
    fn coords(&self, node: NodeId) -> Option<GeoPoint> {
        self.get(node.index()).copied()
    }
}

impl CoordinateLookup for Vec<GeoPoint> {
    fn coords(&self, node: NodeId) -> Option<GeoPoint> {
        self.as_slice().coords(node)
    }
}

impl<S: BuildHasher> CoordinateLookup for HashMap<NodeId, GeoPoint, S> {
    fn coords(&self, node: NodeId) -> Option<GeoPoint> {
        self.get(&node).copied()
    }
}

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// `[lat, lng]` point with its `NodeId`.
#[derive(Clone, Debug)]
struct NodeEntry {
    point: [f64; 2],
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in lat/lng space, consistent with the
    /// planar estimator.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlng = self.point[1] - point[1];
        dlat * dlat + dlng * dlng
    }
}

// ── NodePositions ─────────────────────────────────────────────────────────────

/// Dense position table indexed by `NodeId`, plus an R-tree for snapping
/// arbitrary points to the nearest node.
#[derive(Clone, Debug)]
pub struct NodePositions {
    positions:   Vec<GeoPoint>,
    spatial_idx: RTree<NodeEntry>,
}

impl NodePositions {
    /// Position table where node `i` sits at `points[i]`.
    pub fn from_points(points: Vec<GeoPoint>) -> Self {
        let entries: Vec<NodeEntry> = points
            .iter()
            .enumerate()
            .map(|(i, p)| NodeEntry { point: [p.lat(), p.lng()], id: NodeId(i as u32) })
            .collect();
        Self { positions: points, spatial_idx: RTree::bulk_load(entries) }
    }

    /// Positions for the `len + 1` boundary nodes of a step graph.
    pub fn from_steps(steps: &[RouteStep]) -> GraphResult<Self> {
        if steps.is_empty() {
            return Err(GraphError::EmptyInput);
        }

        let mut points = Vec::with_capacity(steps.len() + 1);
        let mut last: Option<GeoPoint> = None;
        for (i, step) in steps.iter().enumerate() {
            let here = step.start().or(last).ok_or(GraphError::MissingGeometry { step: i })?;
            points.push(here);
            last = step.end().or(Some(here));
        }
        // `last` is always set after at least one iteration.
        points.extend(last);

        Ok(Self::from_points(points))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn get(&self, node: NodeId) -> Option<GeoPoint> {
        self.positions.get(node.index()).copied()
    }

    pub fn as_slice(&self) -> &[GeoPoint] {
        &self.positions
    }

    /// Nearest node to `pos`.  `None` only if the table is empty.
    pub fn snap_to_node(&self, pos: GeoPoint) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.lat(), pos.lng()])
            .map(|e| e.id)
    }

    /// Up to `k` nearest nodes to `pos`, sorted by ascending distance.
    pub fn k_nearest_nodes(&self, pos: GeoPoint, k: usize) -> Vec<NodeId> {
        self.spatial_idx
            .nearest_neighbor_iter(&[pos.lat(), pos.lng()])
            .take(k)
            .map(|e| e.id)
            .collect()
    }
}

impl CoordinateLookup for NodePositions {
    fn coords(&self, node: NodeId) -> Option<GeoPoint> {
        self.get(node)
    }
}
