//! `rp-graph` — route graphs built from directions steps.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                      |
//! |-------------|---------------------------------------------------------------|
//! | [`step`]    | `RouteStep`, `CandidateRoute`                                 |
//! | [`network`] | `RouteGraph`, `RouteGraphBuilder`, `build_graph`              |
//! | [`coords`]  | `CoordinateLookup` trait, `NodePositions` (R-tree snapping)   |
//! | [`loader`]  | Directions JSON and step CSV loaders                          |
//! | [`error`]   | `GraphError`, `GraphResult<T>`                                |
//!
//! A graph carries no coordinates.  The search engine reads positions
//! through [`CoordinateLookup`], which [`NodePositions`] implements for
//! graphs produced by [`build_graph`].

pub mod coords;
pub mod error;
pub mod loader;
pub mod network;
pub mod step;

#[cfg(test)]
mod tests;

pub use coords::{CoordinateLookup, NodePositions};
pub use error::{GraphError, GraphResult};
pub use loader::{load_directions_json, load_directions_reader, load_steps_csv, load_steps_reader};
pub use network::{Edge, RouteGraph, RouteGraphBuilder, RouteNetwork, build_graph, step_label};
pub use step::{CandidateRoute, RouteStep};
