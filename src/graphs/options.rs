//! Option records accepted by the graph mutation operations.
//!
//! Every `undirected` field is a per-call override: `None` falls back to
//! the graph's own directedness flag.

use std::fmt;

use crate::graphs::vertex::VertexId;

/// Value-equality function used by `search`.
///
/// Never consulted for adjacency membership, which is always by handle.
pub type Compare<T> = fn(&T, &T) -> bool;

/// Construction-time settings shared by both graph variants.
pub struct GraphOptions<T> {
    pub undirected: bool,
    pub compare: Compare<T>,
}

impl<T> Clone for GraphOptions<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for GraphOptions<T> {}

impl<T: PartialEq> GraphOptions<T> {
    /// Directed graph comparing values with `PartialEq`.
    pub fn new() -> Self {
        Self {
            undirected: false,
            compare: |a, b| a == b,
        }
    }
}

impl<T: PartialEq> Default for GraphOptions<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> GraphOptions<T> {
    /// Settings for a graph whose values have no `PartialEq`.
    pub fn with_compare_only(compare: Compare<T>) -> Self {
        Self {
            undirected: false,
            compare,
        }
    }

    #[must_use]
    pub fn with_undirected(mut self, undirected: bool) -> Self {
        self.undirected = undirected;
        self
    }

    #[must_use]
    pub fn with_compare(mut self, compare: Compare<T>) -> Self {
        self.compare = compare;
        self
    }
}

impl<T> fmt::Debug for GraphOptions<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphOptions")
            .field("undirected", &self.undirected)
            .finish_non_exhaustive()
    }
}

/// Names one unweighted edge to add or remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeOptions {
    pub from: VertexId,
    pub to: VertexId,
    pub undirected: Option<bool>,
}

impl EdgeOptions {
    pub fn new(from: VertexId, to: VertexId) -> Self {
        Self {
            from,
            to,
            undirected: None,
        }
    }

    #[must_use]
    pub fn with_undirected(mut self, undirected: bool) -> Self {
        self.undirected = Some(undirected);
        self
    }
}

/// Names one weighted edge to add or remove.
///
/// When adding, an absent weight means `W::default()`. When removing, an
/// absent weight removes the whole relationship, every parallel edge
/// included; a present weight removes exactly one matching edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedEdgeOptions<W> {
    pub from: VertexId,
    pub to: VertexId,
    pub weight: Option<W>,
    pub undirected: Option<bool>,
}

impl<W> WeightedEdgeOptions<W> {
    pub fn new(from: VertexId, to: VertexId) -> Self {
        Self {
            from,
            to,
            weight: None,
            undirected: None,
        }
    }

    #[must_use]
    pub fn with_weight(mut self, weight: W) -> Self {
        self.weight = Some(weight);
        self
    }

    #[must_use]
    pub fn with_undirected(mut self, undirected: bool) -> Self {
        self.undirected = Some(undirected);
        self
    }
}

/// Retargets the `vertex -> old` entry to `vertex -> new`.
///
/// `weight` is only meaningful for weighted graphs, where it overwrites
/// every moved parallel weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetEdgeOptions<W = ()> {
    pub vertex: VertexId,
    pub old: VertexId,
    pub new: VertexId,
    pub weight: Option<W>,
    pub undirected: Option<bool>,
}

impl<W> SetEdgeOptions<W> {
    pub fn new(vertex: VertexId, old: VertexId, new: VertexId) -> Self {
        Self {
            vertex,
            old,
            new,
            weight: None,
            undirected: None,
        }
    }

    #[must_use]
    pub fn with_weight(mut self, weight: W) -> Self {
        self.weight = Some(weight);
        self
    }

    #[must_use]
    pub fn with_undirected(mut self, undirected: bool) -> Self {
        self.undirected = Some(undirected);
        self
    }
}

/// Replaces the whole adjacency of an unweighted vertex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetEdgesOptions {
    pub vertex: VertexId,
    pub edges: Vec<VertexId>,
    pub undirected: Option<bool>,
}

impl SetEdgesOptions {
    pub fn new(vertex: VertexId, edges: Vec<VertexId>) -> Self {
        Self {
            vertex,
            edges,
            undirected: None,
        }
    }

    #[must_use]
    pub fn with_undirected(mut self, undirected: bool) -> Self {
        self.undirected = Some(undirected);
        self
    }
}

/// Replaces the whole adjacency of a weighted vertex.
///
/// Each entry carries the weights of its parallel edges; an empty weight
/// list is rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedSetEdgesOptions<W> {
    pub vertex: VertexId,
    pub edges: Vec<(VertexId, Vec<W>)>,
    pub undirected: Option<bool>,
}

impl<W> WeightedSetEdgesOptions<W> {
    pub fn new(vertex: VertexId, edges: Vec<(VertexId, Vec<W>)>) -> Self {
        Self {
            vertex,
            edges,
            undirected: None,
        }
    }

    #[must_use]
    pub fn with_undirected(mut self, undirected: bool) -> Self {
        self.undirected = Some(undirected);
        self
    }
}
