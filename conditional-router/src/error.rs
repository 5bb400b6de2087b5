//! Routing error types.
//!
//! Ordinary outcomes (an edge closed at the requested time, no path between
//! two nodes) are not errors. These variants cover data that makes a time
//! comparison or a travel time meaningless.

use crate::storage::StorageError;

/// Errors raised while evaluating edges or searching.
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    /// The timezone id stored for a node is not a known zone name
    #[error("node {node} has unknown timezone '{zone}'")]
    UnknownZone { node: usize, zone: String },

    /// A conditional edge starts at a node without a timezone
    #[error("node {node} has no timezone")]
    MissingZone { node: usize },

    /// The weighting was asked for the travel time of a closed edge
    #[error("edge {edge} has zero speed; it should have been filtered out")]
    ZeroSpeed { edge: usize },

    /// A node id outside the graph
    #[error("unknown node {0}")]
    UnknownNode(usize),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
