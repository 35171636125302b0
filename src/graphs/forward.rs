use crate::graphs::vertices::Vertices;

/// Graphs that can enumerate the one-hop successors of a vertex.
///
/// This is the only capability the traversal engine needs. Successors are
/// yielded in the order the representation promises for its adjacency:
/// insertion order for the central graphs, unspecified for node edge sets.
pub trait Forward: Vertices {
    type Successors<'a>: Iterator<Item = Self::Vertex>
    where
        Self: 'a;

    /// Returns `None` when `vertex` is not part of the graph.
    fn successors(&self, vertex: Self::Vertex) -> Option<Self::Successors<'_>>;
}
