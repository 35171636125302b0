use rustc_hash::FxHashSet;

use crate::error::Result;
use crate::graphs::edges::Handle;
use crate::graphs::forward::Forward;
use crate::graphs::frontier::LayeredFrontier;
use crate::graphs::visited::Visited;
use crate::graphs::worklist::Worklist;
use crate::set::Set;

/// Breadth-first search yielding one distance layer per step.
///
/// Layer `k` holds every vertex whose shortest hop distance from the
/// initials is `k`. Order within a layer follows successor order.
pub struct GraphBfs<'g, G, V>
where
    G: Forward,
    V: Visited<G::Vertex>,
{
    graph: &'g G,
    visited: V,
    frontier: LayeredFrontier<G::Vertex>,
}

impl<'g, G, V> GraphBfs<'g, G, V>
where
    G: Forward,
    V: Visited<G::Vertex>,
{
    /// Seeds the search. Fails when an initial vertex is not in `graph`.
    pub fn new(graph: &'g G, initials: impl IntoIterator<Item = G::Vertex>) -> Result<Self> {
        let mut visited = V::default();
        let mut initial_frontier: Vec<G::Vertex> = Vec::default();

        for value in initials {
            if !graph.contains_vertex(value) {
                return Err(value.not_found());
            }
            if visited.visit(value) {
                initial_frontier.push(value);
            }
        }

        let frontier = LayeredFrontier::new(initial_frontier);

        // debug: no duplicates, all in visited
        debug_assert!(frontier.layer().iter().all(|v| visited.is_visited(v)));
        debug_assert!({
            let mut seen = FxHashSet::default();
            frontier.layer().iter().all(|v| seen.insert(*v))
        });

        Ok(Self {
            graph,
            visited,
            frontier,
        })
    }

    #[inline]
    pub fn into_visited(self) -> V {
        self.visited
    }

    #[inline]
    pub fn step(&mut self) -> Option<Vec<G::Vertex>> {
        let graph = self.graph;
        let visited = &mut self.visited;
        self.frontier.step(|current, next| {
            for &from in current {
                for to in graph.successors(from).into_iter().flatten() {
                    if visited.visit(to) {
                        next.push(to);
                    }
                }
            }

            // debug invariants: next has no duplicates, and is subset of visited
            debug_assert!(next.iter().all(|v| visited.is_visited(v)));
            debug_assert!({
                let mut seen = FxHashSet::default();
                next.iter().all(|v| seen.insert(*v))
            });
        })
    }
}

impl<G, V> Iterator for GraphBfs<'_, G, V>
where
    G: Forward,
    V: Visited<G::Vertex>,
{
    type Item = Vec<G::Vertex>;

    fn next(&mut self) -> Option<Self::Item> {
        self.step()
    }
}

impl<G, V> Worklist<G::Vertex, V> for GraphBfs<'_, G, V>
where
    G: Forward,
    V: Visited<G::Vertex>,
{
    fn worklist(mut self) -> V {
        while self.step().is_some() {}
        self.into_visited()
    }
}

/// Collects the layers of a breadth-first search from `start`.
pub fn layers<G: Forward>(graph: &G, start: G::Vertex) -> Result<Vec<Vec<G::Vertex>>> {
    let bfs: GraphBfs<G, Set<G::Vertex>> = GraphBfs::new(graph, [start])?;
    Ok(bfs.collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    use bit_vec::BitVec;
    use proptest::prelude::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use std::collections::VecDeque;

    use crate::error::GraphError;
    use crate::graphs::{options::EdgeOptions, unweighted::UnweightedGraph, vertex::VertexId};

    fn build(n: usize, edges: &[(usize, usize)]) -> (UnweightedGraph<usize>, Vec<VertexId>) {
        let mut graph = UnweightedGraph::new(false);
        let ids: Vec<VertexId> = (0..n).map(|v| graph.add_vertex(v)).collect();
        for &(from, to) in edges {
            graph.add_edge(EdgeOptions::new(ids[from], ids[to])).unwrap();
        }
        (graph, ids)
    }

    #[test]
    fn bfs_no_initials_yields_nothing() {
        let (graph, _) = build(3, &[(0, 1)]);
        let mut bfs: GraphBfs<_, Set<VertexId>> =
            GraphBfs::new(&graph, std::iter::empty()).unwrap();
        assert!(bfs.next().is_none());
        assert!(bfs.into_visited().is_empty());
    }

    #[test]
    fn bfs_line_graph_layers() {
        // 0 -> 1 -> 2 -> 3
        let (graph, ids) = build(4, &[(0, 1), (1, 2), (2, 3)]);
        let layers = layers(&graph, ids[0]).unwrap();
        assert_eq!(
            layers,
            vec![vec![ids[0]], vec![ids[1]], vec![ids[2]], vec![ids[3]]]
        );
    }

    #[test]
    fn bfs_branching_graph_layers_in_successor_order() {
        // 0 -> 2, 0 -> 1, 1 -> 3, 2 -> 3
        let (graph, ids) = build(4, &[(0, 2), (0, 1), (1, 3), (2, 3)]);
        let layers = layers(&graph, ids[0]).unwrap();
        assert_eq!(layers.len(), 3);
        assert_eq!(layers[1], vec![ids[2], ids[1]]);
        assert_eq!(layers[2], vec![ids[3]]);
    }

    #[test]
    fn bfs_unknown_initial_fails() {
        let (mut graph, ids) = build(2, &[(0, 1)]);
        graph.remove_vertex(ids[1]).unwrap();
        let result: Result<GraphBfs<_, Set<VertexId>>> = GraphBfs::new(&graph, [ids[0], ids[1]]);
        assert!(matches!(result, Err(GraphError::VertexNotFound(v)) if v == ids[1]));
    }

    #[test]
    fn worklist_disconnected_components() {
        // Component A: 0 -> 1
        // Component B: 2 -> 3
        let (graph, ids) = build(4, &[(0, 1), (2, 3)]);

        let engine: GraphBfs<_, Set<VertexId>> = GraphBfs::new(&graph, [ids[2]]).unwrap();
        let expected: Set<VertexId> = [ids[2], ids[3]].into_iter().collect();
        assert_eq!(engine.worklist(), expected);

        let engine: GraphBfs<_, Set<VertexId>> = GraphBfs::new(&graph, [ids[0], ids[2]]).unwrap();
        assert_eq!(engine.worklist().len(), 4);
    }

    #[test]
    fn worklist_with_bitvec_matches_set() {
        // 0 -> 0 (loop), 0 -> 1, 1 -> 1 (loop), 2 isolated
        let (graph, ids) = build(3, &[(0, 0), (0, 1), (1, 1)]);

        let engine: GraphBfs<_, BitVec> = GraphBfs::new(&graph, [ids[0]]).unwrap();
        let bits = engine.worklist();
        assert!(Visited::<VertexId>::is_visited(&bits, &ids[0]));
        assert!(Visited::<VertexId>::is_visited(&bits, &ids[1]));
        assert!(!Visited::<VertexId>::is_visited(&bits, &ids[2]));
    }

    /// Reference BFS distances on an adjacency list.
    fn reference_layers(n: usize, edges: &[(usize, usize)], start: usize) -> Vec<Option<usize>> {
        let mut adjacency = vec![Vec::new(); n];
        for &(from, to) in edges {
            adjacency[from].push(to);
        }
        let mut distance = vec![None; n];
        let mut queue = VecDeque::new();
        distance[start] = Some(0);
        queue.push_back(start);
        while let Some(v) = queue.pop_front() {
            let d = distance[v].unwrap();
            for &w in &adjacency[v] {
                if distance[w].is_none() {
                    distance[w] = Some(d + 1);
                    queue.push_back(w);
                }
            }
        }
        distance
    }

    prop_compose! {
        fn random_edge_list()
            (edges in prop::collection::vec((0usize..16, 0usize..16), 0..=64))
            -> Vec<(usize, usize)>
        {
            edges
        }
    }

    proptest! {
        // Layer index equals shortest hop distance.
        #[test]
        fn prop_layers_match_reference_distances(edges in random_edge_list(), start in 0usize..16) {
            let (graph, ids) = build(16, &edges);
            let expected = reference_layers(16, &edges, start);

            let layers = layers(&graph, ids[start]).unwrap();
            let mut seen = 0;
            for (depth, layer) in layers.iter().enumerate() {
                for v in layer {
                    prop_assert_eq!(expected[v.index()], Some(depth));
                    seen += 1;
                }
            }
            prop_assert_eq!(seen, expected.iter().filter(|d| d.is_some()).count());
        }
    }

    #[test]
    fn random_stress_worklist_idempotent() {
        let mut rng = ChaCha8Rng::seed_from_u64(0x_4246_535F_4C41_5952);

        for _case in 0..50 {
            let n = rng.random_range(1..24);
            let edges: Vec<(usize, usize)> = (0..rng.random_range(0..64))
                .map(|_| (rng.random_range(0..n), rng.random_range(0..n)))
                .collect();
            let (graph, ids) = build(n, &edges);

            let start = ids[rng.random_range(0..n)];
            let first: Set<VertexId> = GraphBfs::new(&graph, [start]).unwrap().worklist();
            let second: Set<VertexId> =
                GraphBfs::new(&graph, first.iter().copied()).unwrap().worklist();
            assert_eq!(first, second);
        }
    }
}
