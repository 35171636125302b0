use std::{fmt::Debug, hash::Hash};

use crate::error::{GraphError, Result};
use crate::graphs::visited::DenseIndex;

/// Identity handle of a vertex or node.
pub trait Handle: Eq + Hash + Copy + Debug + DenseIndex {
    /// Error reported when this handle is not part of the structure.
    fn not_found(self) -> GraphError;
}

/// Common vertex identifier type used by the edge-related traits.
///
/// Types implementing graph traits are expected to use [`Edges::Vertex`]
/// to identify vertices. Identifiers are small copyable handles and
/// membership is always decided by handle equality, never by the value a
/// vertex carries.
pub trait Edges {
    /// Type used to identify vertices.
    ///
    /// Typically an arena handle such as [`VertexId`](crate::VertexId).
    type Vertex: Handle;
}

/// A graph that supports read-only queries on its adjacency.
///
/// The precise interpretation of direction, the handling of parallel edges,
/// and whether self-loops are permitted is left to the implementation.
pub trait ReadEdges: Edges {
    /// Returns true when `to` appears in the adjacency of `from`.
    ///
    /// Unknown handles are never adjacent, so this returns false for them
    /// instead of failing.
    fn has_edge(&self, from: Self::Vertex, to: Self::Vertex) -> bool;

    /// Number of adjacency entries of `vertex`.
    ///
    /// Fails when `vertex` is not part of the graph.
    fn degree(&self, vertex: Self::Vertex) -> Result<usize>;

    /// Total number of adjacency entries over all vertices.
    ///
    /// An undirected edge between two distinct vertices is stored once per
    /// endpoint and therefore contributes two entries.
    fn edge_count(&self) -> usize;
}
