use std::{
    fmt,
    sync::atomic::{AtomicU32, Ordering},
};

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxBuildHasher;

use crate::error::GraphError;
use crate::graphs::{edges::Handle, visited::DenseIndex};

static NEXT_BRAND: AtomicU32 = AtomicU32::new(0);

/// Mints a process-unique brand for a new arena.
pub(crate) fn next_brand() -> u32 {
    NEXT_BRAND.fetch_add(1, Ordering::Relaxed)
}

/// Stable handle naming one vertex of one graph.
///
/// The handle carries the brand of the graph that minted it, so a handle
/// from another graph is rejected rather than aliasing an unrelated vertex.
/// Slots are never reused: once a vertex is removed its handle stays dead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId {
    brand: u32,
    index: usize,
}

impl VertexId {
    /// Position of the vertex in its graph's creation order.
    pub fn index(self) -> usize {
        self.index
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.index)
    }
}

impl DenseIndex for VertexId {
    #[inline]
    fn dense_index(self) -> usize {
        self.index
    }
}

impl Handle for VertexId {
    fn not_found(self) -> GraphError {
        GraphError::VertexNotFound(self)
    }
}

/// Insertion-ordered neighbor set of an unweighted vertex.
pub type NeighborSet = IndexSet<VertexId, FxBuildHasher>;

/// Insertion-ordered neighbor map of a weighted vertex.
///
/// Each neighbor maps to the weights of its parallel edges, oldest first.
pub type WeightedNeighbors<W> = IndexMap<VertexId, Vec<W>, FxBuildHasher>;

/// Adjacency storage that can drop every entry for one neighbor.
pub(crate) trait Adjacency: Default {
    /// Returns true when `neighbor` was present.
    fn forget(&mut self, neighbor: VertexId) -> bool;
}

impl Adjacency for NeighborSet {
    fn forget(&mut self, neighbor: VertexId) -> bool {
        self.shift_remove(&neighbor)
    }
}

impl<W> Adjacency for WeightedNeighbors<W> {
    fn forget(&mut self, neighbor: VertexId) -> bool {
        self.shift_remove(&neighbor).is_some()
    }
}

/// A value-bearing vertex together with its outgoing adjacency.
#[derive(Debug, Clone)]
pub struct Vertex<T, A> {
    id: VertexId,
    value: T,
    pub(crate) adjacency: A,
}

impl<T, A> Vertex<T, A> {
    pub fn id(&self) -> VertexId {
        self.id
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn adjacency(&self) -> &A {
        &self.adjacency
    }
}

/// Slot arena owning every vertex of one graph.
///
/// Removal leaves a hole so outstanding handles can be detected as dead.
#[derive(Debug, Clone)]
pub(crate) struct VertexArena<T, A> {
    brand: u32,
    slots: Vec<Option<Vertex<T, A>>>,
    len: usize,
}

impl<T, A: Adjacency> VertexArena<T, A> {
    pub(crate) fn new() -> Self {
        Self {
            brand: next_brand(),
            slots: Vec::new(),
            len: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn insert(&mut self, value: T) -> VertexId {
        let id = VertexId {
            brand: self.brand,
            index: self.slots.len(),
        };
        self.slots.push(Some(Vertex {
            id,
            value,
            adjacency: A::default(),
        }));
        self.len += 1;
        id
    }

    pub(crate) fn contains(&self, id: VertexId) -> bool {
        self.get(id).is_some()
    }

    pub(crate) fn get(&self, id: VertexId) -> Option<&Vertex<T, A>> {
        if id.brand != self.brand {
            return None;
        }
        self.slots.get(id.index)?.as_ref()
    }

    pub(crate) fn get_mut(&mut self, id: VertexId) -> Option<&mut Vertex<T, A>> {
        if id.brand != self.brand {
            return None;
        }
        self.slots.get_mut(id.index)?.as_mut()
    }

    pub(crate) fn value_mut(&mut self, id: VertexId) -> Option<&mut T> {
        self.get_mut(id).map(|vertex| &mut vertex.value)
    }

    /// Removes the vertex and every adjacency entry naming it.
    ///
    /// Returns the removed value together with the number of other
    /// vertices that lost an entry.
    pub(crate) fn remove(&mut self, id: VertexId) -> Option<(T, usize)> {
        if !self.contains(id) {
            return None;
        }
        let vertex = self.slots[id.index].take()?;
        self.len -= 1;

        let mut detached = 0;
        for other in self.slots.iter_mut().flatten() {
            if other.adjacency.forget(id) {
                detached += 1;
            }
        }
        Some((vertex.value, detached))
    }

    /// Live vertices in creation order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Vertex<T, A>> + '_ {
        self.slots.iter().flatten()
    }

    pub(crate) fn ids(&self) -> VertexIds<'_, T, A> {
        VertexIds {
            slots: self.slots.iter(),
        }
    }
}

/// Iterator over the live vertex handles of a graph, in creation order.
pub struct VertexIds<'a, T, A> {
    slots: std::slice::Iter<'a, Option<Vertex<T, A>>>,
}

impl<T, A> Iterator for VertexIds<'_, T, A> {
    type Item = VertexId;

    fn next(&mut self) -> Option<Self::Item> {
        self.slots.by_ref().flatten().next().map(Vertex::id)
    }
}
