//! Search error type.

use thiserror::Error;

use rp_core::{CoreError, NodeId};
use rp_graph::GraphError;

/// Errors produced by `rp-search`.  Every variant is terminal for the call
/// that returned it; nothing is retried internally.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    #[error("no path from {from} to {to}")]
    NoPathFound { from: NodeId, to: NodeId },

    #[error("no coordinates for node {0}")]
    MissingCoordinate(NodeId),

    #[error("search cancelled")]
    Cancelled,

    #[error("search deadline exceeded after {expanded} expansions")]
    DeadlineExceeded { expanded: usize },

    #[error("search stopped at the expansion limit of {limit}")]
    ExpansionLimit { limit: usize },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("none of the {0} candidate routes could be searched")]
    NoViableRoute(usize),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type SearchResult<T> = Result<T, SearchError>;
