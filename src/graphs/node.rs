//! Self-contained nodes whose edges are single-direction references.
//!
//! A [`GraphNode`] owns only its value and the set of nodes it points at.
//! Nothing mirrors an edge automatically: `a.add_edge(b)` leaves `b`
//! untouched. Nodes live in a [`NodeArena`] and refer to each other by
//! [`NodeId`], so reference cycles are just index cycles.

use std::fmt;

use tracing::debug;

use crate::error::{GraphError, Result};
use crate::graphs::{
    bfs::GraphBfs,
    edges::{Edges, Handle, ReadEdges},
    forward::Forward,
    traversal::{self, SearchOptions, SearchResult, TraverseOptions},
    vertex::next_brand,
    vertices::Vertices,
    visited::DenseIndex,
    worklist::Worklist,
};
use crate::set::Set;

/// Stable handle naming one node of one arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    brand: u32,
    index: usize,
}

impl NodeId {
    pub fn index(self) -> usize {
        self.index
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.index)
    }
}

impl DenseIndex for NodeId {
    #[inline]
    fn dense_index(self) -> usize {
        self.index
    }
}

impl Handle for NodeId {
    fn not_found(self) -> GraphError {
        GraphError::NodeNotFound(self)
    }
}

/// A value plus the unordered set of nodes it has edges to.
#[derive(Debug, Clone)]
pub struct GraphNode<T> {
    id: NodeId,
    value: T,
    edges: Set<NodeId>,
}

impl<T> GraphNode<T> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn get_mut(&mut self) -> &mut T {
        &mut self.value
    }

    /// Replaces the value and returns the previous one.
    pub fn set(&mut self, value: T) -> T {
        std::mem::replace(&mut self.value, value)
    }

    /// Adds an edge from this node to `node` only. Returns false when it
    /// was already present.
    pub fn add_edge(&mut self, node: NodeId) -> bool {
        self.edges.insert(node)
    }

    pub fn remove_edge(&mut self, node: NodeId) -> bool {
        self.edges.remove(&node)
    }

    /// Membership probe: returns `node` back when the edge exists.
    pub fn get_edge(&self, node: NodeId) -> Option<NodeId> {
        self.edges.contains(&node).then_some(node)
    }

    /// Adjacent nodes in unspecified order.
    pub fn edges(&self) -> Vec<NodeId> {
        self.edges.iter().copied().collect()
    }

    pub fn degree(&self) -> usize {
        self.edges.len()
    }

    pub fn has_edge(&self, node: NodeId) -> bool {
        self.edges.contains(&node)
    }

    /// Drops every outgoing edge. Edges other nodes hold to this one stay.
    pub fn clear_edges(&mut self) {
        self.edges.clear();
    }
}

/// Owner of a family of [`GraphNode`]s.
///
/// The arena has no per-node delete. A node is retired by
/// [`retain_reachable`](Self::retain_reachable) once no root can reach it.
#[derive(Debug, Clone)]
pub struct NodeArena<T> {
    brand: u32,
    slots: Vec<Option<GraphNode<T>>>,
    len: usize,
}

impl<T> Default for NodeArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> NodeArena<T> {
    pub fn new() -> Self {
        Self {
            brand: next_brand(),
            slots: Vec::new(),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn insert(&mut self, value: T) -> NodeId {
        let id = NodeId {
            brand: self.brand,
            index: self.slots.len(),
        };
        self.slots.push(Some(GraphNode {
            id,
            value,
            edges: Set::default(),
        }));
        self.len += 1;
        id
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    fn get(&self, id: NodeId) -> Option<&GraphNode<T>> {
        if id.brand != self.brand {
            return None;
        }
        self.slots.get(id.index)?.as_ref()
    }

    pub fn node(&self, id: NodeId) -> Result<&GraphNode<T>> {
        self.get(id).ok_or(GraphError::NodeNotFound(id))
    }

    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut GraphNode<T>> {
        if id.brand != self.brand {
            return Err(GraphError::NodeNotFound(id));
        }
        self.slots
            .get_mut(id.index)
            .and_then(Option::as_mut)
            .ok_or(GraphError::NodeNotFound(id))
    }

    /// Live nodes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &GraphNode<T>> + '_ {
        self.slots.iter().flatten()
    }

    fn ensure(&self, id: NodeId) -> Result<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(GraphError::NodeNotFound(id))
        }
    }

    /// Single-direction edge `from -> to`, with both ends checked.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> Result<bool> {
        self.ensure(to)?;
        Ok(self.node_mut(from)?.add_edge(to))
    }

    pub fn remove_edge(&mut self, from: NodeId, to: NodeId) -> Result<bool> {
        self.ensure(to)?;
        Ok(self.node_mut(from)?.remove_edge(to))
    }

    /// Adds `a -> b` and `b -> a` together. Returns true when either side
    /// was new.
    pub fn link(&mut self, a: NodeId, b: NodeId) -> Result<bool> {
        self.ensure(a)?;
        self.ensure(b)?;
        let forward = self.node_mut(a)?.add_edge(b);
        let backward = self.node_mut(b)?.add_edge(a);
        Ok(forward || backward)
    }

    /// Removes both directions between `a` and `b`.
    pub fn unlink(&mut self, a: NodeId, b: NodeId) -> Result<bool> {
        self.ensure(a)?;
        self.ensure(b)?;
        let forward = self.node_mut(a)?.remove_edge(b);
        let backward = self.node_mut(b)?.remove_edge(a);
        Ok(forward || backward)
    }

    /// Visit order from `options.start`. Sibling order follows the
    /// unordered edge sets and must not be relied upon.
    pub fn traverse(&self, options: &TraverseOptions<NodeId>) -> Result<Vec<NodeId>> {
        traversal::traverse(self, options)
    }

    /// Retires every node that no root can reach and returns how many went.
    ///
    /// Survivors also lose edges naming nodes outside the arena.
    pub fn retain_reachable(&mut self, roots: impl IntoIterator<Item = NodeId>) -> Result<usize> {
        let keep: Set<NodeId> = GraphBfs::<Self, Set<NodeId>>::new(self, roots)?.worklist();

        let mut retired = 0;
        for slot in &mut self.slots {
            let Some(node) = slot else {
                continue;
            };
            if keep.contains(&node.id) {
                node.edges.retain(|target| keep.contains(target));
            } else {
                *slot = None;
                retired += 1;
            }
        }
        self.len -= retired;
        debug!(retired, remaining = self.len, "retired unreachable nodes");
        Ok(retired)
    }
}

impl<T: PartialEq> NodeArena<T> {
    /// Searches for a node whose value equals `options.target`.
    pub fn search(&self, options: &SearchOptions<NodeId, T>) -> Result<SearchResult<NodeId>> {
        traversal::search_by(
            self,
            &options.traverse_options(),
            options.return_path,
            |id| self.get(id).is_some_and(|node| node.value == options.target),
        )
    }
}

/// Live nodes of an arena, in creation order.
pub struct NodeIds<'a, T> {
    slots: std::slice::Iter<'a, Option<GraphNode<T>>>,
}

impl<T> Iterator for NodeIds<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        self.slots.by_ref().flatten().next().map(GraphNode::id)
    }
}

/// Edge targets of one node that still name live nodes of the arena.
pub struct NodeSuccessors<'a, T> {
    arena: &'a NodeArena<T>,
    edges: std::collections::hash_set::Iter<'a, NodeId>,
}

impl<T> Iterator for NodeSuccessors<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let arena = self.arena;
        self.edges.by_ref().copied().find(|&id| arena.contains(id))
    }
}

impl<T> Edges for NodeArena<T> {
    type Vertex = NodeId;
}

impl<T> ReadEdges for NodeArena<T> {
    fn has_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.get(from).is_some_and(|node| node.has_edge(to))
    }

    fn degree(&self, vertex: NodeId) -> Result<usize> {
        self.node(vertex).map(GraphNode::degree)
    }

    fn edge_count(&self) -> usize {
        self.iter().map(GraphNode::degree).sum()
    }
}

impl<T> Vertices for NodeArena<T> {
    type Vertices<'a>
        = NodeIds<'a, T>
    where
        Self: 'a;

    fn vertices(&self) -> Self::Vertices<'_> {
        NodeIds {
            slots: self.slots.iter(),
        }
    }

    fn contains_vertex(&self, vertex: NodeId) -> bool {
        self.contains(vertex)
    }

    fn vertex_count(&self) -> usize {
        self.len
    }
}

impl<T> Forward for NodeArena<T> {
    type Successors<'a>
        = NodeSuccessors<'a, T>
    where
        Self: 'a;

    fn successors(&self, vertex: NodeId) -> Option<Self::Successors<'_>> {
        self.get(vertex).map(|node| NodeSuccessors {
            arena: self,
            edges: node.edges.iter(),
        })
    }
}
