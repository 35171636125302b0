use thiserror::Error;

use crate::graphs::{frontier::FrontierError, node::NodeId, vertex::VertexId};

/// Failures reported by graph mutation, traversal and generation.
///
/// Requests that are merely redundant (adding an edge that already exists,
/// removing one that does not) are not errors; those operations report
/// through their `bool` return value instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// The handle does not name a live vertex of this graph.
    #[error("vertex {0} is not part of this graph")]
    VertexNotFound(VertexId),

    /// The handle does not name a live node of this arena.
    #[error("node {0} is not part of this arena")]
    NodeNotFound(NodeId),

    /// The vertex pair is not adjacent.
    #[error("no edge from {from} to {to}")]
    EdgeNotFound { from: VertexId, to: VertexId },

    /// Retargeting would merge two adjacency entries and change the degree.
    #[error("edge from {from} to {to} already exists")]
    EdgeExists { from: VertexId, to: VertexId },

    /// Malformed parameters, such as inverted bounds.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A traversal frontier refused an operation.
    #[error(transparent)]
    Frontier(#[from] FrontierError),
}

pub type Result<T> = std::result::Result<T, GraphError>;
