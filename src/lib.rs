//! Graph data structures addressed by identity handles.
//!
//! Two independent representations are provided:
//!
//! - [`UnweightedGraph`] and [`WeightedGraph`] own every vertex centrally,
//!   keep undirected edges symmetric and track parallel weighted edges.
//! - [`NodeArena`] holds self-contained [`GraphNode`]s whose edges are
//!   single-direction references to other nodes.
//!
//! Both implement the [`graphs::forward::Forward`] trait, so the DFS/BFS
//! engine in [`graphs::traversal`] works over either one.

pub mod error;
pub mod graphs;
pub mod set;

pub use error::{GraphError, Result};
pub use graphs::frontier::{Frontier, FrontierError, Queue, Stack};
pub use graphs::node::{GraphNode, NodeArena, NodeId};
pub use graphs::options::{
    EdgeOptions, GraphOptions, SetEdgeOptions, SetEdgesOptions, WeightedEdgeOptions,
    WeightedSetEdgesOptions,
};
pub use graphs::random::RandomGraphOptions;
pub use graphs::traversal::{SearchOptions, SearchResult, TraversalType, TraverseOptions};
pub use graphs::unweighted::UnweightedGraph;
pub use graphs::vertex::{Vertex, VertexId};
pub use graphs::weighted::WeightedGraph;
pub use set::Set;
