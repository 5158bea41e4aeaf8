//! Per-search state: scores, predecessors and the open set.
//!
//! A `SearchContext` is created at the start of one search and dropped at
//! its end.  Scores are dense `Vec`s indexed by `NodeId`.
//!
//! # Frontier
//!
//! The open set is a binary min-heap keyed by `(f, NodeId)`, so the lowest
//! `f` is expanded first and ties go to the lowest `NodeId`.  Improving a
//! node pushes a fresh entry rather than updating in place; entries whose
//! node has left the open set or whose `f` no longer matches are skipped on
//! pop.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use rp_core::NodeId;

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct FrontierEntry {
    f:    FloatOrd,
    node: NodeId,
}

/// Scores and frontier for a single search.
#[derive(Debug)]
pub struct SearchContext {
    g_score:   Vec<f64>,
    f_score:   Vec<f64>,
    came_from: Vec<Option<NodeId>>,
    in_open:   Vec<bool>,
    open_len:  usize,
    heap:      BinaryHeap<Reverse<FrontierEntry>>,
}

impl SearchContext {
    /// Fresh context with every score at `+∞` and an empty open set.
    pub fn new(node_count: usize) -> Self {
        Self {
            g_score:   vec![f64::INFINITY; node_count],
            f_score:   vec![f64::INFINITY; node_count],
            came_from: vec![None; node_count],
            in_open:   vec![false; node_count],
            open_len:  0,
            heap:      BinaryHeap::new(),
        }
    }

    #[inline]
    pub fn g_score(&self, node: NodeId) -> f64 {
        self.g_score[node.index()]
    }

    #[inline]
    pub fn f_score(&self, node: NodeId) -> f64 {
        self.f_score[node.index()]
    }

    #[inline]
    pub fn came_from(&self, node: NodeId) -> Option<NodeId> {
        self.came_from[node.index()]
    }

    #[inline]
    pub fn is_open(&self, node: NodeId) -> bool {
        self.in_open[node.index()]
    }

    /// Number of nodes currently in the open set.
    pub fn open_len(&self) -> usize {
        self.open_len
    }

    /// Record new scores for `node` and make sure it is in the open set.
    pub fn relax(&mut self, node: NodeId, g: f64, f: f64, parent: Option<NodeId>) {
        let i = node.index();
        self.g_score[i] = g;
        self.f_score[i] = f;
        self.came_from[i] = parent;
        if !self.in_open[i] {
            self.in_open[i] = true;
            self.open_len += 1;
        }
        self.heap.push(Reverse(FrontierEntry { f: FloatOrd(f), node }));
    }

    /// Remove and return the open node with the lowest `(f, NodeId)`.
    pub fn pop_min(&mut self) -> Option<NodeId> {
        while let Some(Reverse(entry)) = self.heap.pop() {
            let i = entry.node.index();
            if !self.in_open[i] || entry.f != FloatOrd(self.f_score[i]) {
                continue; // stale
            }
            self.in_open[i] = false;
            self.open_len -= 1;
            return Some(entry.node);
        }
        None
    }

    /// Follow predecessors back from `goal` and return the path in
    /// start → goal order.
    pub fn reconstruct_path(&self, goal: NodeId) -> Vec<NodeId> {
        let mut path = vec![goal];
        let mut cur = goal;
        while let Some(prev) = self.came_from[cur.index()] {
            path.push(prev);
            cur = prev;
            debug_assert!(path.len() <= self.came_from.len(), "predecessor cycle");
        }
        path.reverse();
        path
    }
}
