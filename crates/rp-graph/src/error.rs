//! Graph-construction error type.

use thiserror::Error;

use rp_core::CoreError;

/// Errors produced by `rp-graph`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("cannot build a route graph from zero steps")]
    EmptyInput,

    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    #[error("step {step} has no geometry to position its start node")]
    MissingGeometry { step: usize },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("route data parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GraphResult<T> = Result<T, GraphError>;
