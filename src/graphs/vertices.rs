use crate::graphs::edges::Edges;

/// Graphs that can enumerate and recognize their live vertices.
pub trait Vertices: Edges {
    /// Live handles in creation order. Removed vertices are skipped.
    type Vertices<'a>: Iterator<Item = Self::Vertex>
    where
        Self: 'a;

    fn vertices(&self) -> Self::Vertices<'_>;

    /// False for removed handles and for handles minted elsewhere.
    fn contains_vertex(&self, vertex: Self::Vertex) -> bool;

    fn vertex_count(&self) -> usize {
        self.vertices().count()
    }
}
