use tracing::debug;

use crate::error::{GraphError, Result};
use crate::graphs::{
    bfs::{self, GraphBfs},
    edges::{Edges, ReadEdges},
    forward::Forward,
    options::{
        Compare, GraphOptions, SetEdgeOptions, WeightedEdgeOptions, WeightedSetEdgesOptions,
    },
    traversal::{self, SearchOptions, SearchResult, TraverseOptions},
    vertex::{Vertex, VertexArena, VertexId, VertexIds, WeightedNeighbors},
    vertices::Vertices,
    worklist::Worklist,
};
use crate::set::Set;

/// Multigraph whose edges carry weights of type `W`.
///
/// Each vertex maps every neighbor to the weights of the parallel edges
/// leading there, in insertion order. Degree counts parallel edges
/// separately: a neighbor reached by three edges contributes three.
/// A self-loop is one entry per edge and is never mirrored twice.
///
/// In undirected mode an edge `(u, v, w)` is always stored together with
/// `(v, u, w)`; every mutation writes both sides or neither.
#[derive(Clone)]
pub struct WeightedGraph<T, W> {
    arena: VertexArena<T, WeightedNeighbors<W>>,
    undirected: bool,
    compare: Compare<T>,
}

impl<T: PartialEq, W> WeightedGraph<T, W> {
    pub fn new(undirected: bool) -> Self {
        Self::with_options(GraphOptions::new().with_undirected(undirected))
    }
}

impl<T, W> WeightedGraph<T, W> {
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

    pub fn vertex(&self, vertex: VertexId) -> Result<&Vertex<T, WeightedNeighbors<W>>> {
        self.arena
            .get(vertex)
            .ok_or(GraphError::VertexNotFound(vertex))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vertex<T, WeightedNeighbors<W>>> + '_ {
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

    pub fn set_value(&mut self, vertex: VertexId, value: T) -> Result<T> {
        Ok(std::mem::replace(self.value_mut(vertex)?, value))
    }

    pub fn add_vertex(&mut self, value: T) -> VertexId {
        self.arena.insert(value)
    }

    /// Removes `vertex` together with every weighted edge touching it.
    pub fn remove_vertex(&mut self, vertex: VertexId) -> Result<T> {
        let (value, detached) = self
            .arena
            .remove(vertex)
            .ok_or(GraphError::VertexNotFound(vertex))?;
        debug!(%vertex, detached, "removed weighted vertex");
        Ok(value)
    }

    fn adjacency(&self, vertex: VertexId) -> Result<&WeightedNeighbors<W>> {
        Ok(&self.vertex(vertex)?.adjacency)
    }

    fn adjacency_mut(&mut self, vertex: VertexId) -> Result<&mut WeightedNeighbors<W>> {
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

    /// Returns false for unknown handles.
    pub fn has_edge(&self, from: VertexId, to: VertexId) -> bool {
        self.arena
            .get(from)
            .is_some_and(|v| v.adjacency.contains_key(&to))
    }

    /// Number of weighted edges leaving `vertex`, parallel edges included.
    pub fn degree(&self, vertex: VertexId) -> Result<usize> {
        Ok(self.adjacency(vertex)?.values().map(Vec::len).sum())
    }

    /// One entry per edge: a neighbor appears once for each parallel edge.
    pub fn edges(&self, vertex: VertexId) -> Result<Vec<VertexId>> {
        Ok(self
            .adjacency(vertex)?
            .iter()
            .flat_map(|(&to, weights)| std::iter::repeat(to).take(weights.len()))
            .collect())
    }

    /// Distinct neighbors in insertion order.
    pub fn neighbors(&self, vertex: VertexId) -> Result<Vec<VertexId>> {
        Ok(self.adjacency(vertex)?.keys().copied().collect())
    }

    /// Weights of the parallel edges `from -> to`, oldest first.
    pub fn weights(&self, from: VertexId, to: VertexId) -> Option<&[W]> {
        self.arena
            .get(from)?
            .adjacency
            .get(&to)
            .map(Vec::as_slice)
    }

    pub fn edge_count(&self) -> usize {
        self.arena
            .iter()
            .map(|v| v.adjacency.values().map(Vec::len).sum::<usize>())
            .sum()
    }

    pub fn traverse(&self, options: &TraverseOptions<VertexId>) -> Result<Vec<VertexId>> {
        traversal::traverse(self, options)
    }

    /// Searches for a vertex whose value equals `options.target` under the
    /// graph's compare function. Weights play no part in the walk.
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

    pub fn layers(&self, start: VertexId) -> Result<Vec<Vec<VertexId>>> {
        bfs::layers(self, start)
    }

    pub fn reachable(&self, start: VertexId) -> Result<Set<VertexId>> {
        let engine: GraphBfs<Self, Set<VertexId>> = GraphBfs::new(self, [start])?;
        Ok(engine.worklist())
    }
}

impl<T, W: Copy + PartialEq + Default> WeightedGraph<T, W> {
    /// Appends one weighted edge `from -> to`, mirrored in undirected mode.
    ///
    /// Returns true when `to` was not yet a neighbor of `from`, and false
    /// when the edge was added in parallel to existing ones. An absent
    /// weight means `W::default()`.
    pub fn add_edge(&mut self, options: WeightedEdgeOptions<W>) -> Result<bool> {
        let WeightedEdgeOptions { from, to, .. } = options;
        self.ensure(from)?;
        self.ensure(to)?;
        let undirected = options.undirected.unwrap_or(self.undirected);
        let weight = options.weight.unwrap_or_default();

        let adjacency = self.adjacency_mut(from)?;
        let added = !adjacency.contains_key(&to);
        adjacency.entry(to).or_default().push(weight);
        if undirected && from != to {
            self.adjacency_mut(to)?.entry(from).or_default().push(weight);
        }
        Ok(added)
    }

    /// Removes weighted edges `from -> to`, and their mirrors in undirected
    /// mode.
    ///
    /// With a weight, exactly one edge carrying that weight is removed.
    /// Without one, the whole relationship goes. Returns false when nothing
    /// matched.
    pub fn remove_edge(&mut self, options: WeightedEdgeOptions<W>) -> Result<bool> {
        let WeightedEdgeOptions { from, to, .. } = options;
        self.ensure(from)?;
        self.ensure(to)?;
        let undirected = options.undirected.unwrap_or(self.undirected);

        let removed = match options.weight {
            None => self.adjacency_mut(from)?.shift_remove(&to).is_some(),
            Some(weight) => remove_one(self.adjacency_mut(from)?, to, weight),
        };
        if removed && undirected && from != to {
            let mirror = self.adjacency_mut(to)?;
            match options.weight {
                None => {
                    mirror.shift_remove(&from);
                }
                Some(weight) => {
                    remove_one(mirror, from, weight);
                }
            }
        }
        Ok(removed)
    }

    /// Moves every parallel edge `vertex -> old` onto `vertex -> new`.
    ///
    /// The relationship keeps its position in the adjacency order unless
    /// `new` was already a neighbor, in which case the moved weights are
    /// appended to its list. A given weight overwrites each moved weight.
    /// The degree is unchanged either way.
    pub fn set_edge(&mut self, options: SetEdgeOptions<W>) -> Result<()> {
        let SetEdgeOptions {
            vertex, old, new, ..
        } = options;
        self.ensure(old)?;
        self.ensure(new)?;
        let undirected = options.undirected.unwrap_or(self.undirected);

        let adjacency = self.adjacency_mut(vertex)?;
        let Some((position, _, mut weights)) = adjacency.shift_remove_full(&old) else {
            return Err(GraphError::EdgeNotFound {
                from: vertex,
                to: old,
            });
        };
        if let Some(weight) = options.weight {
            weights.fill(weight);
        }
        let moved = weights.clone();
        match adjacency.get_mut(&new) {
            Some(existing) => existing.extend(weights),
            None => {
                adjacency.shift_insert(position, new, weights);
            }
        }

        if undirected {
            if old != vertex {
                self.adjacency_mut(old)?.shift_remove(&vertex);
            }
            if new != vertex {
                self.adjacency_mut(new)?
                    .entry(vertex)
                    .or_default()
                    .extend(moved);
            }
        }
        Ok(())
    }

    /// Replaces every weighted edge leaving `options.vertex`.
    ///
    /// Entries naming the same neighbor are merged. In undirected mode the
    /// previous neighbors lose their mirror entries and each new neighbor's
    /// mirror is set to the same weight list. All handles and weight lists
    /// are validated before anything changes.
    pub fn set_edges(&mut self, options: WeightedSetEdgesOptions<W>) -> Result<()> {
        let WeightedSetEdgesOptions {
            vertex,
            edges,
            undirected,
        } = options;
        self.ensure(vertex)?;
        for (to, weights) in &edges {
            self.ensure(*to)?;
            if weights.is_empty() {
                return Err(GraphError::InvalidConfiguration(format!(
                    "edge from {vertex} to {to} has no weights"
                )));
            }
        }
        let undirected = undirected.unwrap_or(self.undirected);

        let mut replacement = WeightedNeighbors::<W>::default();
        for (to, weights) in edges {
            replacement.entry(to).or_default().extend(weights);
        }
        let previous = std::mem::replace(self.adjacency_mut(vertex)?, replacement.clone());

        if undirected {
            for old in previous.keys().filter(|&&old| old != vertex) {
                if !replacement.contains_key(old) {
                    self.adjacency_mut(*old)?.shift_remove(&vertex);
                }
            }
            for (new, weights) in replacement.iter().filter(|&(&new, _)| new != vertex) {
                self.adjacency_mut(*new)?.insert(vertex, weights.clone());
            }
        }
        Ok(())
    }

    /// Every weighted edge leaving `vertex` as `(neighbor, weight)`.
    pub fn weighted_edges(&self, vertex: VertexId) -> Result<Vec<(VertexId, W)>> {
        Ok(self
            .adjacency(vertex)?
            .iter()
            .flat_map(|(&to, weights)| weights.iter().map(move |&w| (to, w)))
            .collect())
    }
}

/// Drops the first edge to `to` carrying `weight`, and the relationship
/// once its last edge is gone.
fn remove_one<W: PartialEq>(adjacency: &mut WeightedNeighbors<W>, to: VertexId, weight: W) -> bool {
    let Some(weights) = adjacency.get_mut(&to) else {
        return false;
    };
    let Some(position) = weights.iter().position(|w| *w == weight) else {
        return false;
    };
    weights.remove(position);
    if weights.is_empty() {
        adjacency.shift_remove(&to);
    }
    true
}

impl<T, W> Edges for WeightedGraph<T, W> {
    type Vertex = VertexId;
}

impl<T, W> ReadEdges for WeightedGraph<T, W> {
    fn has_edge(&self, from: VertexId, to: VertexId) -> bool {
        WeightedGraph::has_edge(self, from, to)
    }

    fn degree(&self, vertex: VertexId) -> Result<usize> {
        WeightedGraph::degree(self, vertex)
    }

    fn edge_count(&self) -> usize {
        WeightedGraph::edge_count(self)
    }
}

impl<T, W> Vertices for WeightedGraph<T, W> {
    type Vertices<'a>
        = VertexIds<'a, T, WeightedNeighbors<W>>
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

impl<T, W> Forward for WeightedGraph<T, W> {
    type Successors<'a>
        = std::iter::Copied<indexmap::map::Keys<'a, VertexId, Vec<W>>>
    where
        Self: 'a;

    fn successors(&self, vertex: VertexId) -> Option<Self::Successors<'_>> {
        self.arena
            .get(vertex)
            .map(|v| v.adjacency.keys().copied())
    }
}
