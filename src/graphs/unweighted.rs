use tracing::debug;

use crate::error::{GraphError, Result};
use crate::graphs::{
    bfs::{self, GraphBfs},
    edges::{Edges, ReadEdges},
    forward::Forward,
    options::{Compare, EdgeOptions, GraphOptions, SetEdgeOptions, SetEdgesOptions},
    traversal::{self, SearchOptions, SearchResult, TraverseOptions},
    vertex::{NeighborSet, Vertex, VertexArena, VertexId, VertexIds},
    vertices::Vertices,
    worklist::Worklist,
};
use crate::set::Set;

/// Graph whose edges carry no weight.
///
/// Each vertex holds an insertion-ordered set of neighbor handles, so a
/// pair of vertices is adjacent at most once per direction. In undirected
/// mode every mutation writes both directions or neither.
///
/// | Operation | Complexity |
/// |-----------|------------|
/// | `add_vertex` | O(1) amortized |
/// | `remove_vertex` | O(V + E) |
/// | `add_edge` / `has_edge` | O(1) expected |
/// | `remove_edge` / `set_edge` | O(degree) |
#[derive(Clone)]
pub struct UnweightedGraph<T> {
    arena: VertexArena<T, NeighborSet>,
    undirected: bool,
    compare: Compare<T>,
}

impl<T: PartialEq> UnweightedGraph<T> {
    pub fn new(undirected: bool) -> Self {
        Self::with_options(GraphOptions::new().with_undirected(undirected))
    }
}

impl<T> UnweightedGraph<T> {
    pub fn with_options(options: GraphOptions<T>) -> Self {
        Self {
            arena: VertexArena::new(),
            undirected: options.undirected,
            compare: options.compare,
        }
    }

    pub fn is_undirected(&self) -> bool {
        self.undirected
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.len() == 0
    }

    pub fn contains(&self, vertex: VertexId) -> bool {
        self.arena.contains(vertex)
    }

    pub fn vertex(&self, vertex: VertexId) -> Result<&Vertex<T, NeighborSet>> {
        self.arena
            .get(vertex)
            .ok_or(GraphError::VertexNotFound(vertex))
    }

    /// Live vertices in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Vertex<T, NeighborSet>> + '_ {
        self.arena.iter()
    }

    pub fn value(&self, vertex: VertexId) -> Result<&T> {
        self.vertex(vertex).map(Vertex::value)
    }

    pub fn value_mut(&mut self, vertex: VertexId) -> Result<&mut T> {
        self.arena
            .value_mut(vertex)
            .ok_or(GraphError::VertexNotFound(vertex))
    }

    /// Replaces the stored value, returning the previous one.
    pub fn set_value(&mut self, vertex: VertexId, value: T) -> Result<T> {
        Ok(std::mem::replace(self.value_mut(vertex)?, value))
    }

    pub fn add_vertex(&mut self, value: T) -> VertexId {
        self.arena.insert(value)
    }

    /// Removes `vertex` and every edge touching it, in either direction.
    pub fn remove_vertex(&mut self, vertex: VertexId) -> Result<T> {
        let (value, detached) = self
            .arena
            .remove(vertex)
            .ok_or(GraphError::VertexNotFound(vertex))?;
        debug!(%vertex, detached, "removed vertex");
        Ok(value)
    }

    fn adjacency(&self, vertex: VertexId) -> Result<&NeighborSet> {
        Ok(&self.vertex(vertex)?.adjacency)
    }

    fn adjacency_mut(&mut self, vertex: VertexId) -> Result<&mut NeighborSet> {
        self.arena
            .get_mut(vertex)
            .map(|v| &mut v.adjacency)
            .ok_or(GraphError::VertexNotFound(vertex))
    }

    fn ensure(&self, vertex: VertexId) -> Result<()> {
        if self.arena.contains(vertex) {
            Ok(())
        } else {
            Err(GraphError::VertexNotFound(vertex))
        }
    }

    /// Adds `from -> to`, and `to -> from` in undirected mode.
    ///
    /// Returns false when the edge was already present; the adjacency is
    /// left untouched in that case.
    pub fn add_edge(&mut self, options: EdgeOptions) -> Result<bool> {
        let EdgeOptions { from, to, .. } = options;
        self.ensure(from)?;
        self.ensure(to)?;
        let undirected = options.undirected.unwrap_or(self.undirected);

        let added = self.adjacency_mut(from)?.insert(to);
        if undirected && from != to {
            self.adjacency_mut(to)?.insert(from);
        }
        Ok(added)
    }

    /// Removes `from -> to`, and its mirror in undirected mode.
    ///
    /// Returns false when no such edge existed.
    pub fn remove_edge(&mut self, options: EdgeOptions) -> Result<bool> {
        let EdgeOptions { from, to, .. } = options;
        self.ensure(from)?;
        self.ensure(to)?;
        let undirected = options.undirected.unwrap_or(self.undirected);

        let removed = self.adjacency_mut(from)?.shift_remove(&to);
        if removed && undirected && from != to {
            self.adjacency_mut(to)?.shift_remove(&from);
        }
        Ok(removed)
    }

    /// Retargets `vertex -> old` to `vertex -> new`, keeping its position
    /// in the adjacency order and therefore the degree.
    ///
    /// Fails with [`GraphError::EdgeNotFound`] when `old` is not adjacent
    /// and with [`GraphError::EdgeExists`] when `new` already is.
    pub fn set_edge(&mut self, options: SetEdgeOptions) -> Result<()> {
        let SetEdgeOptions {
            vertex, old, new, ..
        } = options;
        self.ensure(old)?;
        self.ensure(new)?;
        let adjacency = self.adjacency(vertex)?;
        let Some(position) = adjacency.get_index_of(&old) else {
            return Err(GraphError::EdgeNotFound {
                from: vertex,
                to: old,
            });
        };
        if old == new {
            return Ok(());
        }
        if adjacency.contains(&new) {
            return Err(GraphError::EdgeExists {
                from: vertex,
                to: new,
            });
        }
        let undirected = options.undirected.unwrap_or(self.undirected);

        let adjacency = self.adjacency_mut(vertex)?;
        adjacency.shift_remove_index(position);
        adjacency.shift_insert(position, new);
        if undirected {
            if old != vertex {
                self.adjacency_mut(old)?.shift_remove(&vertex);
            }
            if new != vertex {
                self.adjacency_mut(new)?.insert(vertex);
            }
        }
        Ok(())
    }

    /// Replaces the whole adjacency of `options.vertex`.
    ///
    /// Duplicate entries collapse to one. In undirected mode the previous
    /// neighbors lose their mirror entries and the new neighbors gain one,
    /// so symmetry holds once the call returns. Every handle is checked
    /// before anything changes.
    pub fn set_edges(&mut self, options: SetEdgesOptions) -> Result<()> {
        let SetEdgesOptions {
            vertex,
            edges,
            undirected,
        } = options;
        self.ensure(vertex)?;
        if let Some(&missing) = edges.iter().find(|&&v| !self.arena.contains(v)) {
            return Err(GraphError::VertexNotFound(missing));
        }
        let undirected = undirected.unwrap_or(self.undirected);

        let replacement: NeighborSet = edges.into_iter().collect();
        let previous = std::mem::replace(self.adjacency_mut(vertex)?, replacement.clone());

        if undirected {
            for old in previous.iter().filter(|&&old| old != vertex) {
                if !replacement.contains(old) {
                    self.adjacency_mut(*old)?.shift_remove(&vertex);
                }
            }
            for new in replacement.iter().filter(|&&new| new != vertex) {
                self.adjacency_mut(*new)?.insert(vertex);
            }
        }
        Ok(())
    }

    /// Returns false for unknown handles.
    pub fn has_edge(&self, from: VertexId, to: VertexId) -> bool {
        self.arena
            .get(from)
            .is_some_and(|v| v.adjacency.contains(&to))
    }

    /// Number of neighbors. A self-loop counts once.
    pub fn degree(&self, vertex: VertexId) -> Result<usize> {
        Ok(self.adjacency(vertex)?.len())
    }

    /// Neighbors in insertion order.
    pub fn edges(&self, vertex: VertexId) -> Result<Vec<VertexId>> {
        Ok(self.adjacency(vertex)?.iter().copied().collect())
    }

    pub fn edge_count(&self) -> usize {
        self.arena.iter().map(|v| v.adjacency.len()).sum()
    }

    /// Visit order of a DFS or BFS from `options.start`.
    pub fn traverse(&self, options: &TraverseOptions<VertexId>) -> Result<Vec<VertexId>> {
        traversal::traverse(self, options)
    }

    /// Searches for a vertex whose value equals `options.target` under the
    /// graph's compare function.
    pub fn search(&self, options: &SearchOptions<VertexId, T>) -> Result<SearchResult<VertexId>> {
        let compare = self.compare;
        traversal::search_by(
            self,
            &options.traverse_options(),
            options.return_path,
            |v| {
                self.arena
                    .get(v)
                    .is_some_and(|vertex| compare(vertex.value(), &options.target))
            },
        )
    }

    /// Breadth-first distance layers from `start`.
    pub fn layers(&self, start: VertexId) -> Result<Vec<Vec<VertexId>>> {
        bfs::layers(self, start)
    }

    /// Every vertex reachable from `start`, itself included.
    pub fn reachable(&self, start: VertexId) -> Result<Set<VertexId>> {
        let engine: GraphBfs<Self, Set<VertexId>> = GraphBfs::new(self, [start])?;
        Ok(engine.worklist())
    }
}

impl<T> Edges for UnweightedGraph<T> {
    type Vertex = VertexId;
}

impl<T> ReadEdges for UnweightedGraph<T> {
    fn has_edge(&self, from: VertexId, to: VertexId) -> bool {
        UnweightedGraph::has_edge(self, from, to)
    }

    fn degree(&self, vertex: VertexId) -> Result<usize> {
        UnweightedGraph::degree(self, vertex)
    }

    fn edge_count(&self) -> usize {
        UnweightedGraph::edge_count(self)
    }
}

impl<T> Vertices for UnweightedGraph<T> {
    type Vertices<'a>
        = VertexIds<'a, T, NeighborSet>
    where
        Self: 'a;

    fn vertices(&self) -> Self::Vertices<'_> {
        self.arena.ids()
    }

    fn contains_vertex(&self, vertex: VertexId) -> bool {
        self.arena.contains(vertex)
    }

    fn vertex_count(&self) -> usize {
        self.arena.len()
    }
}

impl<T> Forward for UnweightedGraph<T> {
    type Successors<'a>
        = std::iter::Copied<indexmap::set::Iter<'a, VertexId>>
    where
        Self: 'a;

    fn successors(&self, vertex: VertexId) -> Option<Self::Successors<'_>> {
        self.arena
            .get(vertex)
            .map(|v| v.adjacency.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use crate::graphs::traversal::TraversalType;

    fn edge(from: VertexId, to: VertexId) -> EdgeOptions {
        EdgeOptions::new(from, to)
    }

    #[test]
    fn add_edge_reports_new_relationships_only() {
        let mut graph = UnweightedGraph::new(false);
        let a = graph.add_vertex("a");
        let b = graph.add_vertex("b");

        assert_eq!(graph.add_edge(edge(a, b)), Ok(true));
        assert_eq!(graph.add_edge(edge(a, b)), Ok(false));
        assert_eq!(graph.degree(a), Ok(1));
        assert!(graph.has_edge(a, b));
        assert!(!graph.has_edge(b, a));
    }

    #[test]
    fn undirected_edges_are_mirrored() {
        let mut graph = UnweightedGraph::new(true);
        let a = graph.add_vertex(1);
        let b = graph.add_vertex(2);

        assert_eq!(graph.add_edge(edge(a, b)), Ok(true));
        assert!(graph.has_edge(b, a));
        assert_eq!(graph.remove_edge(edge(b, a)), Ok(true));
        assert!(!graph.has_edge(a, b));
        assert_eq!(graph.remove_edge(edge(b, a)), Ok(false));
    }

    #[test]
    fn per_call_override_beats_graph_default() {
        let mut graph = UnweightedGraph::new(false);
        let a = graph.add_vertex(1);
        let b = graph.add_vertex(2);

        graph.add_edge(edge(a, b).with_undirected(true)).unwrap();
        assert!(graph.has_edge(b, a));

        graph
            .remove_edge(edge(a, b).with_undirected(false))
            .unwrap();
        assert!(!graph.has_edge(a, b));
        assert!(graph.has_edge(b, a));
    }

    #[test]
    fn self_loops_are_stored_once() {
        let mut graph = UnweightedGraph::new(true);
        let a = graph.add_vertex(0);

        assert_eq!(graph.add_edge(edge(a, a)), Ok(true));
        assert_eq!(graph.degree(a), Ok(1));
        assert_eq!(graph.edges(a), Ok(vec![a]));
        assert_eq!(graph.remove_edge(edge(a, a)), Ok(true));
        assert_eq!(graph.degree(a), Ok(0));
    }

    #[test]
    fn unknown_vertices_fail_loudly() {
        let mut graph = UnweightedGraph::new(false);
        let a = graph.add_vertex(0);
        let b = graph.add_vertex(1);
        let mut other = UnweightedGraph::new(false);
        let foreign = other.add_vertex(0);

        assert_eq!(
            graph.add_edge(edge(a, foreign)),
            Err(GraphError::VertexNotFound(foreign))
        );
        assert_eq!(graph.degree(a), Ok(0));

        graph.remove_vertex(b).unwrap();
        assert_eq!(graph.remove_vertex(b), Err(GraphError::VertexNotFound(b)));
        assert_eq!(graph.degree(b), Err(GraphError::VertexNotFound(b)));
        assert!(!graph.has_edge(a, b));
    }

    #[test]
    fn remove_vertex_cascades_to_incoming_edges() {
        let mut graph = UnweightedGraph::new(false);
        let a = graph.add_vertex("a");
        let b = graph.add_vertex("b");
        let c = graph.add_vertex("c");
        graph.add_edge(edge(a, c)).unwrap();
        graph.add_edge(edge(b, c)).unwrap();
        graph.add_edge(edge(c, a)).unwrap();

        assert_eq!(graph.remove_vertex(c), Ok("c"));
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.degree(a), Ok(0));
        assert_eq!(graph.degree(b), Ok(0));
        assert_eq!(graph.vertices().collect::<Vec<_>>(), vec![a, b]);
    }

    #[test]
    fn set_edge_keeps_position_and_degree() {
        let mut graph = UnweightedGraph::new(true);
        let ids: Vec<VertexId> = (0..4).map(|v| graph.add_vertex(v)).collect();
        graph.add_edge(edge(ids[0], ids[1])).unwrap();
        graph.add_edge(edge(ids[0], ids[2])).unwrap();

        graph
            .set_edge(SetEdgeOptions::new(ids[0], ids[1], ids[3]))
            .unwrap();
        assert_eq!(graph.edges(ids[0]), Ok(vec![ids[3], ids[2]]));
        assert_eq!(graph.degree(ids[0]), Ok(2));
        assert!(!graph.has_edge(ids[1], ids[0]));
        assert!(graph.has_edge(ids[3], ids[0]));
    }

    #[test]
    fn set_edge_rejects_missing_or_merging_edges() {
        let mut graph = UnweightedGraph::new(false);
        let a = graph.add_vertex(0);
        let b = graph.add_vertex(1);
        let c = graph.add_vertex(2);
        graph.add_edge(edge(a, b)).unwrap();
        graph.add_edge(edge(a, c)).unwrap();

        assert_eq!(
            graph.set_edge(SetEdgeOptions::new(b, a, c)),
            Err(GraphError::EdgeNotFound { from: b, to: a })
        );
        assert_eq!(
            graph.set_edge(SetEdgeOptions::new(a, b, c)),
            Err(GraphError::EdgeExists { from: a, to: c })
        );
        assert_eq!(graph.edges(a), Ok(vec![b, c]));
    }

    #[test]
    fn set_edges_repairs_symmetry() {
        let mut graph = UnweightedGraph::new(true);
        let ids: Vec<VertexId> = (0..4).map(|v| graph.add_vertex(v)).collect();
        graph.add_edge(edge(ids[0], ids[1])).unwrap();
        graph.add_edge(edge(ids[0], ids[2])).unwrap();

        graph
            .set_edges(SetEdgesOptions::new(ids[0], vec![ids[2], ids[3], ids[3]]))
            .unwrap();
        assert_eq!(graph.edges(ids[0]), Ok(vec![ids[2], ids[3]]));
        assert!(!graph.has_edge(ids[1], ids[0]));
        assert!(graph.has_edge(ids[2], ids[0]));
        assert!(graph.has_edge(ids[3], ids[0]));
    }

    #[test]
    fn set_edges_validates_before_mutating() {
        let mut graph = UnweightedGraph::new(true);
        let a = graph.add_vertex(0);
        let b = graph.add_vertex(1);
        let gone = graph.add_vertex(2);
        graph.add_edge(edge(a, b)).unwrap();
        graph.remove_vertex(gone).unwrap();

        assert_eq!(
            graph.set_edges(SetEdgesOptions::new(a, vec![gone])),
            Err(GraphError::VertexNotFound(gone))
        );
        assert!(graph.has_edge(a, b));
        assert!(graph.has_edge(b, a));
    }

    fn same_ignoring_case(a: &&str, b: &&str) -> bool {
        a.eq_ignore_ascii_case(b)
    }

    #[test]
    fn search_uses_compare_not_identity() {
        let options = GraphOptions::new()
            .with_undirected(true)
            .with_compare(same_ignoring_case);
        let mut graph = UnweightedGraph::with_options(options);
        let a = graph.add_vertex("start");
        let b = graph.add_vertex("middle");
        let c = graph.add_vertex("Goal");
        graph.add_edge(edge(a, b)).unwrap();
        graph.add_edge(edge(b, c)).unwrap();

        let found = graph.search(&SearchOptions::new(a, "goal")).unwrap();
        assert_eq!(found, SearchResult::Found(c));

        let path = graph
            .search(
                &SearchOptions::new(a, "GOAL")
                    .with_return_path(true)
                    .with_traversal(TraversalType::Bfs),
            )
            .unwrap();
        assert_eq!(path, SearchResult::Path(vec![a, b, c]));

        let missing = graph.search(&SearchOptions::new(a, "elsewhere")).unwrap();
        assert_eq!(missing, SearchResult::NotFound);
    }

    #[test]
    fn search_for_start_value_is_single_element_path() {
        let mut graph = UnweightedGraph::new(false);
        let a = graph.add_vertex(7);
        let b = graph.add_vertex(7);
        graph.add_edge(edge(a, b)).unwrap();

        let result = graph
            .search(&SearchOptions::new(a, 7).with_return_path(true))
            .unwrap();
        assert_eq!(result, SearchResult::Path(vec![a]));
    }

    #[test]
    fn reachable_is_the_connected_component() {
        let mut graph = UnweightedGraph::new(true);
        let ids: Vec<VertexId> = (0..5).map(|v| graph.add_vertex(v)).collect();
        graph.add_edge(edge(ids[0], ids[1])).unwrap();
        graph.add_edge(edge(ids[2], ids[1])).unwrap();
        graph.add_edge(edge(ids[3], ids[4])).unwrap();

        let component = graph.reachable(ids[2]).unwrap();
        let expected: Set<VertexId> = [ids[0], ids[1], ids[2]].into_iter().collect();
        assert_eq!(component, expected);
        assert_eq!(graph.traverse(&TraverseOptions::new(ids[2])).unwrap().len(), 3);
        assert_eq!(
            graph.layers(ids[0]).unwrap(),
            vec![vec![ids[0]], vec![ids[1]], vec![ids[2]]]
        );
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(usize, usize),
        Remove(usize, usize),
        RemoveVertex(usize),
        Retarget(usize, usize, usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (0usize..8, 0usize..8).prop_map(|(a, b)| Op::Add(a, b)),
            2 => (0usize..8, 0usize..8).prop_map(|(a, b)| Op::Remove(a, b)),
            1 => (0usize..8).prop_map(Op::RemoveVertex),
            1 => (0usize..8, 0usize..8, 0usize..8).prop_map(|(v, a, b)| Op::Retarget(v, a, b)),
        ]
    }

    proptest! {
        // Symmetry and degree bookkeeping survive arbitrary mutation sequences.
        #[test]
        fn prop_undirected_invariants_hold(ops in prop::collection::vec(op(), 0..64)) {
            let mut graph = UnweightedGraph::new(true);
            let ids: Vec<VertexId> = (0..8).map(|v| graph.add_vertex(v)).collect();

            for op in ops {
                // Failures on removed vertices are expected; they must not mutate.
                let _ = match op {
                    Op::Add(a, b) => graph.add_edge(edge(ids[a], ids[b])).map(|_| ()),
                    Op::Remove(a, b) => graph.remove_edge(edge(ids[a], ids[b])).map(|_| ()),
                    Op::RemoveVertex(v) => graph.remove_vertex(ids[v]).map(|_| ()),
                    Op::Retarget(v, a, b) => {
                        graph.set_edge(SetEdgeOptions::new(ids[v], ids[a], ids[b]))
                    }
                };
            }

            for &a in &ids {
                for &b in &ids {
                    prop_assert_eq!(graph.has_edge(a, b), graph.has_edge(b, a));
                    if !graph.contains(b) {
                        prop_assert!(!graph.has_edge(a, b));
                    }
                }
                if let Ok(degree) = graph.degree(a) {
                    prop_assert_eq!(degree, graph.edges(a).unwrap().len());
                }
            }
        }

        // Adding twice leaves the same adjacency as adding once.
        #[test]
        fn prop_add_edge_idempotent(pairs in prop::collection::vec((0usize..6, 0usize..6), 0..24)) {
            let mut once = UnweightedGraph::new(false);
            let mut twice = UnweightedGraph::new(false);
            let a: Vec<VertexId> = (0..6).map(|v| once.add_vertex(v)).collect();
            let b: Vec<VertexId> = (0..6).map(|v| twice.add_vertex(v)).collect();

            for &(x, y) in &pairs {
                once.add_edge(edge(a[x], a[y])).unwrap();
                twice.add_edge(edge(b[x], b[y])).unwrap();
                prop_assert!(!twice.add_edge(edge(b[x], b[y])).unwrap());
            }
            for v in 0..6 {
                let left: Vec<usize> =
                    once.edges(a[v]).unwrap().iter().map(|id| id.index()).collect();
                let right: Vec<usize> =
                    twice.edges(b[v]).unwrap().iter().map(|id| id.index()).collect();
                prop_assert_eq!(left, right);
            }
        }
    }

    #[test]
    fn random_stress_remove_edge_twice() {
        let mut rng = ChaCha8Rng::seed_from_u64(0x_554E_5745_4947_4854);
        let mut graph = UnweightedGraph::new(true);
        let ids: Vec<VertexId> = (0..10).map(|v| graph.add_vertex(v)).collect();

        for _ in 0..200 {
            let a = ids[rng.random_range(0..10)];
            let b = ids[rng.random_range(0..10)];
            let existed = graph.has_edge(a, b);
            if rng.random_bool(0.6) {
                assert_eq!(graph.add_edge(edge(a, b)), Ok(!existed));
            } else {
                assert_eq!(graph.remove_edge(edge(a, b)), Ok(existed));
                assert_eq!(graph.remove_edge(edge(a, b)), Ok(false));
            }
            assert_eq!(graph.has_edge(a, b), graph.has_edge(b, a));
        }
    }
}
