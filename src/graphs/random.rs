//! Random graph generation under per-vertex degree and weight bounds.
//!
//! Generation happens in two phases. First an edge plan is drawn over
//! plain indices: every vertex draws a target degree and then picks
//! distinct, non-adjacent partners until it reaches that target or runs
//! out of candidates. In undirected mode a partner must still be below
//! the maximum degree, since the edge counts towards it as well. A plan
//! that leaves any vertex under the minimum degree is first repaired by
//! rewiring existing edges, and only thrown away and redrawn when that
//! fails. After a bounded number of redraws generation gives up. Only a
//! finished plan touches the graph, and every edge goes through the
//! graph's own `add_edge`.

use std::cmp::Ordering;

use num_traits::NumCast;
use rand::{distr::uniform::SampleUniform, seq::IndexedRandom, Rng};
use tracing::debug;

use crate::error::{GraphError, Result};
use crate::graphs::{
    options::{EdgeOptions, GraphOptions, WeightedEdgeOptions},
    unweighted::UnweightedGraph,
    vertex::VertexId,
    weighted::WeightedGraph,
};
use crate::set::Set;

/// Redraws allowed before a configuration is declared infeasible.
const MAX_ATTEMPTS: usize = 64;

const DEFAULT_MIN_WEIGHT: u8 = 1;
const DEFAULT_MAX_WEIGHT: u8 = 10;

/// Parameters for [`UnweightedGraph::random`] and [`WeightedGraph::random`].
///
/// Unset bounds fall back to defaults derived from `vertex_count`: at
/// least one edge and at most three per vertex, capped at `vertex_count - 1`.
/// A default minimum never exceeds an explicit maximum. Weights default
/// to `1..=10`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomGraphOptions<W = u32> {
    pub vertex_count: usize,
    pub min_edges: Option<usize>,
    pub max_edges: Option<usize>,
    pub min_weight: Option<W>,
    pub max_weight: Option<W>,
}

impl<W> RandomGraphOptions<W> {
    pub fn new(vertex_count: usize) -> Self {
        Self {
            vertex_count,
            min_edges: None,
            max_edges: None,
            min_weight: None,
            max_weight: None,
        }
    }

    #[must_use]
    pub fn with_min_edges(mut self, min_edges: usize) -> Self {
        self.min_edges = Some(min_edges);
        self
    }

    #[must_use]
    pub fn with_max_edges(mut self, max_edges: usize) -> Self {
        self.max_edges = Some(max_edges);
        self
    }

    /// Sets both degree bounds.
    #[must_use]
    pub fn with_edges(self, min_edges: usize, max_edges: usize) -> Self {
        self.with_min_edges(min_edges).with_max_edges(max_edges)
    }

    /// Sets both weight bounds, inclusive.
    #[must_use]
    pub fn with_weights(mut self, min_weight: W, max_weight: W) -> Self {
        self.min_weight = Some(min_weight);
        self.max_weight = Some(max_weight);
        self
    }

    /// Resolves the inclusive degree range every vertex must land in.
    fn degree_bounds(&self, undirected: bool) -> Result<(usize, usize)> {
        let n = self.vertex_count;
        if n < 1 {
            return Err(invalid("vertex count must be at least 1"));
        }
        let limit = n - 1;
        let min = self
            .min_edges
            .unwrap_or_else(|| limit.min(1).min(self.max_edges.unwrap_or(usize::MAX)));
        let max = self.max_edges.unwrap_or(min.max(limit.min(3)));

        if min > max {
            return Err(invalid(format!(
                "minimum degree {min} exceeds maximum degree {max}"
            )));
        }
        if min > limit {
            return Err(invalid(format!(
                "minimum degree {min} needs more than {n} vertices"
            )));
        }
        let max = max.min(limit);
        if undirected && min == max && (n * min) % 2 == 1 {
            return Err(invalid(format!(
                "no undirected graph on {n} vertices has every degree equal to {min}"
            )));
        }
        Ok((min, max))
    }
}

impl<W: NumCast + PartialOrd + Copy> RandomGraphOptions<W> {
    fn weight_bounds(&self) -> Result<(W, W)> {
        let min = match self.min_weight {
            Some(weight) => weight,
            None => default_weight(DEFAULT_MIN_WEIGHT)?,
        };
        let max = match self.max_weight {
            Some(weight) => weight,
            None => default_weight(DEFAULT_MAX_WEIGHT)?,
        };
        match min.partial_cmp(&max) {
            Some(Ordering::Less | Ordering::Equal) => Ok((min, max)),
            _ => Err(invalid("minimum weight exceeds maximum weight")),
        }
    }
}

fn default_weight<W: NumCast>(value: u8) -> Result<W> {
    W::from(value)
        .ok_or_else(|| invalid(format!("default weight {value} does not fit the weight type")))
}

fn invalid(message: impl Into<String>) -> GraphError {
    GraphError::InvalidConfiguration(message.into())
}

/// Draws an edge list over `0..n` meeting the degree bounds.
///
/// Directed plans bound out-degree only. Undirected plans count each edge
/// at both ends and list it once. Fails with
/// [`GraphError::InvalidConfiguration`] once every redraw has been used up,
/// which for dense undirected bounds does not prove that no graph exists.
fn plan_edges<R>(
    n: usize,
    (min, max): (usize, usize),
    undirected: bool,
    rng: &mut R,
) -> Result<Vec<(usize, usize)>>
where
    R: Rng + ?Sized,
{
    for attempt in 0..MAX_ATTEMPTS {
        let mut adjacency: Vec<Set<usize>> = vec![Set::with_capacity(max); n];
        let mut edges = Vec::new();

        for v in 0..n {
            let target = rng.random_range(min..=max);
            while adjacency[v].len() < target {
                let candidates: Vec<usize> = (0..n)
                    .filter(|&u| {
                        u != v
                            && !adjacency[v].contains(&u)
                            && (!undirected || adjacency[u].len() < max)
                    })
                    .collect();
                let Some(&u) = candidates.choose(rng) else {
                    break;
                };
                adjacency[v].insert(u);
                if undirected {
                    adjacency[u].insert(v);
                }
                edges.push((v, u));
            }
        }

        if undirected && !rewire(&mut adjacency, &mut edges, min, rng) {
            debug!(attempt, n, min, max, "rewiring could not lift every vertex, redrawing");
            continue;
        }
        if adjacency.iter().all(|neighbors| neighbors.len() >= min) {
            return Ok(edges);
        }
        debug!(attempt, n, min, max, "edge plan left a vertex below its minimum degree, redrawing");
    }

    Err(invalid(format!(
        "gave up placing {min}..={max} edges per vertex on {n} vertices \
         after {MAX_ATTEMPTS} attempts"
    )))
}

/// Lifts undirected vertices left below `min` without touching anyone
/// else's degree.
///
/// Two short vertices that are not yet adjacent are joined directly.
/// Otherwise an existing edge `a - b` is split and its ends are attached
/// to the short vertices instead: `a` and `b` keep their degree, the short
/// ones gain. A vertex two or more short may take both ends itself.
/// Returns false when some vertex is still short and no move applies.
fn rewire<R>(
    adjacency: &mut [Set<usize>],
    edges: &mut Vec<(usize, usize)>,
    min: usize,
    rng: &mut R,
) -> bool
where
    R: Rng + ?Sized,
{
    loop {
        let short: Vec<usize> = (0..adjacency.len())
            .filter(|&v| adjacency[v].len() < min)
            .collect();
        let Some(&v) = short.first() else {
            return true;
        };

        if let Some(&u) = short[1..].iter().find(|&&u| !adjacency[v].contains(&u)) {
            connect(adjacency, edges, v, u);
            continue;
        }

        let u = if adjacency[v].len() + 2 <= min {
            v
        } else {
            match short.get(1) {
                Some(&u) => u,
                None => return false,
            }
        };

        let splits: Vec<(usize, usize, usize)> = edges
            .iter()
            .enumerate()
            .flat_map(|(i, &(a, b))| [(i, a, b), (i, b, a)])
            .filter(|&(_, a, b)| {
                a != v
                    && a != u
                    && b != v
                    && b != u
                    && !adjacency[v].contains(&a)
                    && !adjacency[u].contains(&b)
            })
            .collect();
        let Some(&(i, a, b)) = splits.choose(rng) else {
            return false;
        };

        edges.swap_remove(i);
        adjacency[a].remove(&b);
        adjacency[b].remove(&a);
        connect(adjacency, edges, v, a);
        connect(adjacency, edges, u, b);
    }
}

fn connect(adjacency: &mut [Set<usize>], edges: &mut Vec<(usize, usize)>, v: usize, u: usize) {
    adjacency[v].insert(u);
    adjacency[u].insert(v);
    edges.push((v, u));
}

impl<T> UnweightedGraph<T> {
    /// Builds a graph of `random.vertex_count` vertices with degrees inside
    /// the configured bounds. Vertex `i` carries `value_fn(i)`.
    pub fn random<R>(
        options: GraphOptions<T>,
        random: &RandomGraphOptions,
        rng: &mut R,
        mut value_fn: impl FnMut(usize) -> T,
    ) -> Result<Self>
    where
        R: Rng + ?Sized,
    {
        let bounds = random.degree_bounds(options.undirected)?;
        let n = random.vertex_count;
        let edges = plan_edges(n, bounds, options.undirected, rng)?;

        let mut graph = Self::with_options(options);
        let ids: Vec<VertexId> = (0..n).map(|i| graph.add_vertex(value_fn(i))).collect();
        for (from, to) in edges {
            graph.add_edge(EdgeOptions::new(ids[from], ids[to]))?;
        }
        debug!(vertices = n, edges = graph.edge_count(), "generated random graph");
        Ok(graph)
    }
}

impl<T, W> WeightedGraph<T, W>
where
    W: SampleUniform + NumCast + PartialOrd + Copy + Default,
{
    /// Like [`UnweightedGraph::random`], with each edge weighted uniformly
    /// from the inclusive weight range.
    pub fn random<R>(
        options: GraphOptions<T>,
        random: &RandomGraphOptions<W>,
        rng: &mut R,
        mut value_fn: impl FnMut(usize) -> T,
    ) -> Result<Self>
    where
        R: Rng + ?Sized,
    {
        let bounds = random.degree_bounds(options.undirected)?;
        let (min_weight, max_weight) = random.weight_bounds()?;
        let n = random.vertex_count;
        let edges = plan_edges(n, bounds, options.undirected, rng)?;

        let mut graph = Self::with_options(options);
        let ids: Vec<VertexId> = (0..n).map(|i| graph.add_vertex(value_fn(i))).collect();
        for (from, to) in edges {
            let weight = rng.random_range(min_weight..=max_weight);
            graph.add_edge(WeightedEdgeOptions::new(ids[from], ids[to]).with_weight(weight))?;
        }
        debug!(vertices = n, edges = graph.edge_count(), "generated random weighted graph");
        Ok(graph)
    }
}
