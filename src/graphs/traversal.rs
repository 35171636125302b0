//! Depth-first and breadth-first traversal over any [`Forward`] graph.
//!
//! The engine is the same for both disciplines; only the frontier differs.
//! A vertex is marked visited when it is pushed, so every reachable vertex
//! is expanded exactly once and cycles terminate. Successors are pushed in
//! the order the graph yields them, which makes the visit order exactly as
//! deterministic as that ordering.

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::error::Result;
use crate::graphs::{
    edges::Handle,
    forward::Forward,
    frontier::{Frontier, Queue, Stack},
    visited::Visited,
};
use crate::set::Set;

/// Frontier discipline of a traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TraversalType {
    /// Depth first, driven by a [`Stack`].
    #[default]
    Dfs,
    /// Breadth first, driven by a [`Queue`].
    Bfs,
}

/// Where to start and how to walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraverseOptions<V> {
    pub start: V,
    pub traversal: TraversalType,
    /// Bound on the frontier size. Exceeding it fails the traversal with
    /// [`FrontierError::Overflow`](crate::FrontierError::Overflow).
    pub frontier_capacity: Option<usize>,
}

impl<V> TraverseOptions<V> {
    pub fn new(start: V) -> Self {
        Self {
            start,
            traversal: TraversalType::default(),
            frontier_capacity: None,
        }
    }

    #[must_use]
    pub fn with_traversal(mut self, traversal: TraversalType) -> Self {
        self.traversal = traversal;
        self
    }

    #[must_use]
    pub fn with_frontier_capacity(mut self, capacity: usize) -> Self {
        self.frontier_capacity = Some(capacity);
        self
    }
}

/// Drives a value search from `start`.
///
/// `return_path` switches the result from the matching vertex to the path
/// leading to it.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions<V, T> {
    pub start: V,
    pub target: T,
    pub return_path: bool,
    pub traversal: TraversalType,
    pub frontier_capacity: Option<usize>,
}

impl<V: Copy, T> SearchOptions<V, T> {
    pub fn new(start: V, target: T) -> Self {
        Self {
            start,
            target,
            return_path: false,
            traversal: TraversalType::default(),
            frontier_capacity: None,
        }
    }

    #[must_use]
    pub fn with_return_path(mut self, return_path: bool) -> Self {
        self.return_path = return_path;
        self
    }

    #[must_use]
    pub fn with_traversal(mut self, traversal: TraversalType) -> Self {
        self.traversal = traversal;
        self
    }

    #[must_use]
    pub fn with_frontier_capacity(mut self, capacity: usize) -> Self {
        self.frontier_capacity = Some(capacity);
        self
    }

    pub fn traverse_options(&self) -> TraverseOptions<V> {
        TraverseOptions {
            start: self.start,
            traversal: self.traversal,
            frontier_capacity: self.frontier_capacity,
        }
    }
}

/// Outcome of a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResult<V> {
    NotFound,
    /// The first matching vertex reached.
    Found(V),
    /// Start to match, both inclusive.
    Path(Vec<V>),
}

impl<V: Copy> SearchResult<V> {
    pub fn is_found(&self) -> bool {
        !matches!(self, SearchResult::NotFound)
    }

    /// The matching vertex, whichever shape the result has.
    pub fn vertex(&self) -> Option<V> {
        match self {
            SearchResult::NotFound => None,
            SearchResult::Found(vertex) => Some(*vertex),
            SearchResult::Path(path) => path.last().copied(),
        }
    }

    pub fn path(&self) -> Option<&[V]> {
        match self {
            SearchResult::Path(path) => Some(path),
            _ => None,
        }
    }
}

struct Walk<V> {
    order: Vec<V>,
    parents: FxHashMap<V, V>,
    found: Option<V>,
}

impl<V: Handle> Walk<V> {
    /// Follows parent links from `target` back to the start.
    fn path_to(&self, target: V) -> Vec<V> {
        let mut path = vec![target];
        let mut current = target;
        while let Some(&parent) = self.parents.get(&current) {
            path.push(parent);
            current = parent;
        }
        path.reverse();
        path
    }
}

fn walk<G, F, P>(
    graph: &G,
    start: G::Vertex,
    mut frontier: F,
    track_parents: bool,
    mut matches: P,
) -> Result<Walk<G::Vertex>>
where
    G: Forward,
    F: Frontier<G::Vertex>,
    P: FnMut(G::Vertex) -> bool,
{
    let mut visited: Set<G::Vertex> = Set::default();
    let mut parents = FxHashMap::default();
    let mut order = Vec::new();

    visited.visit(start);
    frontier.push(start)?;

    while !frontier.is_empty() {
        let current = frontier.pop()?;
        order.push(current);

        if matches(current) {
            return Ok(Walk {
                order,
                parents,
                found: Some(current),
            });
        }

        let Some(successors) = graph.successors(current) else {
            continue;
        };
        for next in successors {
            if visited.visit(next) {
                if track_parents {
                    parents.insert(next, current);
                }
                frontier.push(next)?;
            }
        }
    }

    Ok(Walk {
        order,
        parents,
        found: None,
    })
}

fn run<G, P>(
    graph: &G,
    options: &TraverseOptions<G::Vertex>,
    track_parents: bool,
    matches: P,
) -> Result<Walk<G::Vertex>>
where
    G: Forward,
    P: FnMut(G::Vertex) -> bool,
{
    let start = options.start;
    if !graph.contains_vertex(start) {
        return Err(start.not_found());
    }
    trace!(?start, traversal = ?options.traversal, "starting traversal");

    match (options.traversal, options.frontier_capacity) {
        (TraversalType::Dfs, None) => walk(graph, start, Stack::new(), track_parents, matches),
        (TraversalType::Dfs, Some(capacity)) => walk(
            graph,
            start,
            Stack::with_capacity(capacity)?,
            track_parents,
            matches,
        ),
        (TraversalType::Bfs, None) => walk(graph, start, Queue::new(), track_parents, matches),
        (TraversalType::Bfs, Some(capacity)) => walk(
            graph,
            start,
            Queue::with_capacity(capacity)?,
            track_parents,
            matches,
        ),
    }
}

/// Visits everything reachable from `options.start` and returns the visit
/// order. The start vertex always comes first.
pub fn traverse<G: Forward>(
    graph: &G,
    options: &TraverseOptions<G::Vertex>,
) -> Result<Vec<G::Vertex>> {
    Ok(run(graph, options, false, |_| false)?.order)
}

/// Walks from `options.start` until `matches` accepts a vertex.
///
/// The start vertex itself is tested first, so a matching start yields a
/// one-element path.
pub fn search_by<G, P>(
    graph: &G,
    options: &TraverseOptions<G::Vertex>,
    return_path: bool,
    matches: P,
) -> Result<SearchResult<G::Vertex>>
where
    G: Forward,
    P: FnMut(G::Vertex) -> bool,
{
    let walk = run(graph, options, return_path, matches)?;
    Ok(match walk.found {
        None => SearchResult::NotFound,
        Some(found) if return_path => SearchResult::Path(walk.path_to(found)),
        Some(found) => SearchResult::Found(found),
    })
}
