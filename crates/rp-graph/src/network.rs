//! Route graph representation and builder.
//!
//! # Data layout
//!
//! Edges are stored in insertion order and indexed by `EdgeId`.  A
//! **Compressed Sparse Row (CSR)** index over those edges gives each node's
//! outgoing edges as a contiguous slice:
//!
//! ```text
//! out_edge_ids[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! The CSR index is built with a stable sort, so a node's out-edges keep the
//! order in which they were added.  Nodes are dense `NodeId`s `0..n`; each
//! also carries a string label (`step_0`, `step_1`, … for graphs made by
//! [`build_graph`]).

use rustc_hash::FxHashMap;
use tracing::debug;

use rp_core::{EdgeId, NodeId};

use crate::coords::NodePositions;
use crate::step::RouteStep;
use crate::{GraphError, GraphResult};

// ── Edge ──────────────────────────────────────────────────────────────────────

/// A directed, weighted edge.  `weight` is a travel time in seconds and is
/// always finite and non-negative.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub weight: f64,
}

// ── RouteGraph ────────────────────────────────────────────────────────────────

/// Immutable directed graph.  Do not construct directly; use
/// [`RouteGraphBuilder`] or [`build_graph`].
#[derive(Clone, Debug)]
pub struct RouteGraph {
    labels:         Vec<String>,
    label_index:    FxHashMap<String, NodeId>,
    edges:          Vec<Edge>,
    /// CSR row pointer.  Length = `node_count + 1`.
    node_out_start: Vec<u32>,
    /// Edge ids grouped by source node.
    out_edge_ids:   Vec<EdgeId>,
}

impl RouteGraph {
    /// A graph with no nodes.  Every search against it fails with
    /// `InvalidGraph`.
    pub fn empty() -> Self {
        RouteGraphBuilder::new().build()
    }

    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// `true` if `node` belongs to this graph.
    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.labels.len()
    }

    /// All node ids in ascending order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.labels.len()).map(|i| NodeId(i as u32))
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index())
    }

    pub fn label(&self, node: NodeId) -> Option<&str> {
        self.labels.get(node.index()).map(String::as_str)
    }

    pub fn node_by_label(&self, label: &str) -> Option<NodeId> {
        self.label_index.get(label).copied()
    }

    /// Outgoing edges of `node`, in insertion order.
    ///
    /// # Panics
    /// Panics if `node` is not in the graph; check with [`contains`](Self::contains).
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = &Edge> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        self.out_edge_ids[start..end]
            .iter()
            .map(move |e| &self.edges[e.index()])
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }
}

// ── RouteGraphBuilder ─────────────────────────────────────────────────────────

/// Construct a [`RouteGraph`] incrementally, then call [`build`](Self::build).
///
/// Edges may only reference nodes already added, so every edge endpoint of
/// the finished graph is one of its nodes.
///
/// # Example
///
/// ```
/// use rp_graph::RouteGraphBuilder;
///
/// let mut b = RouteGraphBuilder::new();
/// let a = b.add_node("a").unwrap();
/// let c = b.add_node("c").unwrap();
/// b.add_edge(a, c, 90.0).unwrap();
/// let graph = b.build();
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 1);
/// ```
#[derive(Default)]
pub struct RouteGraphBuilder {
    labels:      Vec<String>,
    label_index: FxHashMap<String, NodeId>,
    edges:       Vec<Edge>,
}

impl RouteGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            labels:      Vec::with_capacity(nodes),
            label_index: FxHashMap::with_capacity_and_hasher(nodes, Default::default()),
            edges:       Vec::with_capacity(edges),
        }
    }

    /// Add a node and return its `NodeId` (sequential from 0).  Labels must
    /// be unique.
    pub fn add_node(&mut self, label: impl Into<String>) -> GraphResult<NodeId> {
        let label = label.into();
        if self.label_index.contains_key(&label) {
            return Err(GraphError::InvalidGraph(format!("duplicate node label {label:?}")));
        }
        let id = NodeId::try_from(self.labels.len())
            .map_err(|_| GraphError::InvalidGraph("too many nodes".into()))?;
        self.label_index.insert(label.clone(), id);
        self.labels.push(label);
        Ok(id)
    }

    /// Add a directed edge.  Parallel edges are allowed.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, weight: f64) -> GraphResult<EdgeId> {
        for node in [from, to] {
            if node.index() >= self.labels.len() {
                return Err(GraphError::InvalidGraph(format!("edge references unknown node {node}")));
            }
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(GraphError::InvalidGraph(format!(
                "edge {from} → {to} has invalid weight {weight}"
            )));
        }
        let id = EdgeId::try_from(self.edges.len())
            .map_err(|_| GraphError::InvalidGraph("too many edges".into()))?;
        self.edges.push(Edge { from, to, weight });
        Ok(id)
    }

    pub fn node_count(&self) -> usize { self.labels.len() }
    pub fn edge_count(&self) -> usize { self.edges.len() }

    /// Consume the builder and produce a [`RouteGraph`].
    pub fn build(self) -> RouteGraph {
        let node_count = self.labels.len();

        let mut out_edge_ids: Vec<EdgeId> =
            (0..self.edges.len()).map(|i| EdgeId(i as u32)).collect();
        out_edge_ids.sort_by_key(|e| self.edges[e.index()].from.0);

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &self.edges {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, self.edges.len());

        RouteGraph {
            labels: self.labels,
            label_index: self.label_index,
            edges: self.edges,
            node_out_start,
            out_edge_ids,
        }
    }
}

// ── Step graphs ───────────────────────────────────────────────────────────────

/// Label of the boundary node before step `i` (`step_len` is the route end).
pub fn step_label(i: usize) -> String {
    format!("step_{i}")
}

/// Turn an ordered list of steps into a path graph.
///
/// Node `step_i` is `NodeId(i)`; step `i` becomes the edge
/// `step_i → step_{i+1}` weighted by its duration.  `k` steps give `k + 1`
/// nodes and `k` edges in step order.
pub fn build_graph(steps: &[RouteStep]) -> GraphResult<RouteGraph> {
    if steps.is_empty() {
        return Err(GraphError::EmptyInput);
    }

    let mut b = RouteGraphBuilder::with_capacity(steps.len() + 1, steps.len());
    let mut prev = b.add_node(step_label(0))?;
    for (i, step) in steps.iter().enumerate() {
        let next = b.add_node(step_label(i + 1))?;
        b.add_edge(prev, next, step.duration_secs).map_err(|_| {
            GraphError::InvalidGraph(format!(
                "step {i} has invalid duration {}",
                step.duration_secs
            ))
        })?;
        prev = next;
    }

    let graph = b.build();
    debug!(nodes = graph.node_count(), edges = graph.edge_count(), "built step graph");
    Ok(graph)
}

// ── RouteNetwork ──────────────────────────────────────────────────────────────

/// A step graph together with the positions of its nodes.
#[derive(Clone, Debug)]
pub struct RouteNetwork {
    pub graph:     RouteGraph,
    pub positions: NodePositions,
}

impl RouteNetwork {
    pub fn from_steps(steps: &[RouteStep]) -> GraphResult<Self> {
        let graph = build_graph(steps)?;
        let positions = NodePositions::from_steps(steps)?;
        debug_assert_eq!(graph.node_count(), positions.len());
        Ok(Self { graph, positions })
    }

    /// First node of the route.
    pub fn start(&self) -> NodeId {
        NodeId(0)
    }

    /// Last node of the route.
    pub fn end(&self) -> NodeId {
        NodeId(self.graph.node_count().saturating_sub(1) as u32)
    }
}
