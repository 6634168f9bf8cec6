use tracing::{debug, trace};

use super::csr::GraphCSR;
use super::limit::CycleLimit;
use super::scc::{Component, MIN_SCC_SIZE, strongly_connected_components};
use super::search::SearchState;
use common::{
    error::Error,
    types::{Cycle, VertexId},
};

/// Counters describing how far an enumeration has progressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnumerationStats {
    /// Roots whose cycle search has been completed.
    pub roots_processed: usize,
    pub cycles_found: usize,
    pub vertices_remaining: usize,
    pub edges_remaining: usize,
}

/// The search currently draining: its root's component and the engine state.
#[derive(Debug)]
struct ActiveRoot {
    component: Component,
    search: SearchState,
}

/// Lazy sequence of every elementary cycle of a graph.
///
/// Works on a private copy of the graph. Strongly connected components of at least
/// two vertices are kept on a worklist; for each popped component a root vertex is
/// chosen and all cycles through it are produced, after which the root is deleted
/// and the rest of the component is decomposed again. Every cycle is produced once:
/// by the search rooted at the first of its vertices to be deleted.
#[derive(Debug)]
pub struct CycleEnumerator {
    graph: GraphCSR,
    limit: CycleLimit,
    worklist: Vec<Component>,
    active: Option<ActiveRoot>,
    stats: EnumerationStats,
    started: bool,
    failed: bool,
}

/// Enumerates the elementary cycles of `graph` that satisfy `limit`.
///
/// The returned iterator is lazy: each `next` runs the search only as far as the
/// next cycle. Dropping it stops the enumeration; `graph` itself is never modified.
pub fn enumerate_cycles(graph: &GraphCSR, limit: CycleLimit) -> CycleEnumerator {
    CycleEnumerator::new(graph.clone(), limit)
}

impl CycleEnumerator {
    /// Takes ownership of the working graph.
    ///
    /// Nothing is computed until the first call to `next`.
    pub fn new(graph: GraphCSR, limit: CycleLimit) -> Self {
        let stats = EnumerationStats {
            vertices_remaining: graph.vertex_count(),
            edges_remaining: graph.edge_count(),
            ..EnumerationStats::default()
        };

        CycleEnumerator {
            graph,
            limit,
            worklist: Vec::new(),
            active: None,
            stats,
            started: false,
            failed: false,
        }
    }

    pub fn stats(&self) -> EnumerationStats {
        self.stats
    }

    pub fn limit(&self) -> &CycleLimit {
        &self.limit
    }

    /// Runs until the next cycle, or `Ok(None)` when every component has been processed.
    fn advance(&mut self) -> Result<Option<Cycle>, Error> {
        if !self.started {
            self.started = true;
            self.worklist = strongly_connected_components(&self.graph, MIN_SCC_SIZE)?;
            debug!(
                components = self.worklist.len(),
                vertices = self.graph.vertex_count(),
                edges = self.graph.edge_count(),
                "Initial strongly connected components computed"
            );
        }

        loop {
            if let Some(active) = self.active.as_mut() {
                if let Some(cycle) = active.search.next_cycle(&self.graph, &self.limit)? {
                    self.stats.cycles_found += 1;
                    trace!(
                        n = self.stats.cycles_found,
                        cycle = ?cycle.path,
                        "Cycle found"
                    );
                    return Ok(Some(cycle));
                }

                if let Some(done) = self.active.take() {
                    self.retire(done)?;
                }
            }

            let Some(mut component) = self.worklist.pop() else {
                return Ok(None);
            };
            let Some(root) = component.pop_first() else {
                continue;
            };

            self.active = Some(ActiveRoot {
                component,
                search: SearchState::new(&self.graph, root)?,
            });
        }
    }

    /// Deletes a fully searched root and re-decomposes what is left of its component.
    fn retire(&mut self, done: ActiveRoot) -> Result<(), Error> {
        let root = done.search.root();
        self.graph.remove_vertex(root)?;

        let pieces = {
            let rest = self.graph.induced_subgraph(&done.component);
            strongly_connected_components(&rest, 1)?
        };

        for piece in pieces {
            if piece.len() >= MIN_SCC_SIZE {
                self.worklist.push(piece);
            } else {
                for vertex in piece {
                    self.graph.remove_vertex(vertex)?;
                }
            }
        }

        self.stats.roots_processed += 1;
        self.stats.vertices_remaining = self.graph.vertex_count();
        self.stats.edges_remaining = self.graph.edge_count();
        self.log_progress(root);

        Ok(())
    }

    fn log_progress(&self, root: VertexId) {
        let processed = |remaining: usize, total: usize| {
            if total == 0 {
                100.0
            } else {
                (1.0 - remaining as f64 / total as f64) * 100.0
            }
        };

        debug!(
            step = self.stats.roots_processed,
            root,
            vertices = %format!(
                "{}/{} [{:.2}% processed]",
                self.graph.vertex_count(),
                self.graph.total_vertices(),
                processed(self.graph.vertex_count(), self.graph.total_vertices())
            ),
            edges = %format!(
                "{}/{} [{:.2}% processed]",
                self.graph.edge_count(),
                self.graph.total_edges(),
                processed(self.graph.edge_count(), self.graph.total_edges())
            ),
            pending_components = self.worklist.len(),
            "Root processed"
        );
    }
}

impl Iterator for CycleEnumerator {
    type Item = Result<Cycle, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        match self.advance() {
            Ok(cycle) => cycle.map(Ok),
            Err(e) => {
                self.failed = true;
                self.active = None;
                self.worklist.clear();
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::types::{Edge, Vertex};
    use std::collections::BTreeSet;

    fn canonical_set(graph: &GraphCSR, limit: CycleLimit) -> BTreeSet<Vec<VertexId>> {
        let cycles: Vec<Vec<VertexId>> = enumerate_cycles(graph, limit)
            .map(|c| c.unwrap().canonical().path)
            .collect();
        let set: BTreeSet<Vec<VertexId>> = cycles.iter().cloned().collect();
        assert_eq!(set.len(), cycles.len(), "duplicate cycle emitted");
        set
    }

    fn set_of(cycles: &[&[VertexId]]) -> BTreeSet<Vec<VertexId>> {
        cycles.iter().map(|c| c.to_vec()).collect()
    }

    fn labelled(names: &[&str], edges: &[(VertexId, VertexId)]) -> GraphCSR {
        let vertices = names.iter().map(|n| Vertex::from_name(*n)).collect();
        let mut edges: Vec<Edge> = edges.iter().map(|&(u, v)| Edge::new(u, v, "rel")).collect();
        GraphCSR::new(vertices, &mut edges).unwrap()
    }

    #[test]
    fn triangle_yields_one_cycle() {
        let graph = GraphCSR::from_edges(3, &[(0, 1), (1, 2), (2, 0)]).unwrap();

        assert_eq!(
            canonical_set(&graph, CycleLimit::unbounded()),
            set_of(&[&[0, 1, 2]])
        );
    }

    #[test]
    fn isolated_vertex_never_appears() {
        let graph = GraphCSR::from_edges(4, &[(0, 1), (1, 2), (2, 0)]).unwrap();
        let cycles = canonical_set(&graph, CycleLimit::unbounded());

        assert_eq!(cycles, set_of(&[&[0, 1, 2]]));
        assert!(cycles.iter().all(|c| !c.contains(&3)));
    }

    #[test]
    fn two_disjoint_triangles() {
        let graph =
            GraphCSR::from_edges(6, &[(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)]).unwrap();

        assert_eq!(
            canonical_set(&graph, CycleLimit::unbounded()),
            set_of(&[&[0, 1, 2], &[3, 4, 5]])
        );
    }

    #[test]
    fn four_cycle_exceeds_length_three() {
        let graph = GraphCSR::from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]).unwrap();

        assert!(canonical_set(&graph, CycleLimit::new(3, None)).is_empty());
        assert_eq!(
            canonical_set(&graph, CycleLimit::new(4, None)),
            set_of(&[&[0, 1, 2, 3]])
        );
    }

    #[test]
    fn category_limit_counts_matching_vertices_once() {
        // A(X) -> B(Y) -> C(X) -> A
        let graph = labelled(&["X-A", "Y-B", "X-C"], &[(0, 1), (1, 2), (2, 0)]);

        let one = CycleLimit::new(1, Some("X".to_string()));
        assert!(canonical_set(&graph, one).is_empty());

        let two = CycleLimit::new(2, Some("X".to_string()));
        assert_eq!(canonical_set(&graph, two), set_of(&[&[0, 1, 2]]));
    }

    #[test]
    fn empty_graph_and_dag_have_no_cycles() {
        let empty = GraphCSR::from_edges(0, &[]).unwrap();
        assert_eq!(enumerate_cycles(&empty, CycleLimit::unbounded()).count(), 0);

        let dag = GraphCSR::from_edges(5, &[(0, 1), (0, 2), (1, 3), (2, 3), (3, 4)]).unwrap();
        assert_eq!(enumerate_cycles(&dag, CycleLimit::unbounded()).count(), 0);
    }

    #[test]
    fn complete_digraph_on_four_vertices() {
        // K4 has 6 two-cycles, 8 three-cycles and 6 four-cycles.
        let edges: Vec<(usize, usize)> = (0..4)
            .flat_map(|u| (0..4).filter(move |&v| v != u).map(move |v| (u, v)))
            .collect();
        let graph = GraphCSR::from_edges(4, &edges).unwrap();

        let cycles = canonical_set(&graph, CycleLimit::unbounded());
        assert_eq!(cycles.len(), 20);
        assert_eq!(cycles.iter().filter(|c| c.len() == 2).count(), 6);
        assert_eq!(cycles.iter().filter(|c| c.len() == 3).count(), 8);
        assert_eq!(cycles.iter().filter(|c| c.len() == 4).count(), 6);
    }

    #[test]
    fn shared_vertex_between_cycles() {
        // Two triangles sharing vertex 2; no cycle uses both.
        let graph =
            GraphCSR::from_edges(5, &[(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 2)]).unwrap();

        assert_eq!(
            canonical_set(&graph, CycleLimit::unbounded()),
            set_of(&[&[0, 1, 2], &[2, 3, 4]])
        );
    }

    #[test]
    fn caller_graph_is_untouched() {
        let graph = GraphCSR::from_edges(3, &[(0, 1), (1, 2), (2, 0)]).unwrap();
        let found = enumerate_cycles(&graph, CycleLimit::unbounded()).count();

        assert_eq!(found, 1);
        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn stats_track_progress() {
        let graph =
            GraphCSR::from_edges(6, &[(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)]).unwrap();
        let mut enumerator = enumerate_cycles(&graph, CycleLimit::unbounded());

        assert_eq!(enumerator.stats().vertices_remaining, 6);
        let total = enumerator.by_ref().count();
        let stats = enumerator.stats();

        assert_eq!(total, 2);
        assert_eq!(stats.cycles_found, 2);
        // One root per triangle; the other four vertices fall out as singletons.
        assert_eq!(stats.roots_processed, 2);
        assert_eq!(stats.vertices_remaining, 0);
        assert_eq!(stats.edges_remaining, 0);
    }

    #[test]
    fn dropping_early_is_safe() {
        let edges: Vec<(usize, usize)> = (0..7)
            .flat_map(|u| (0..7).filter(move |&v| v != u).map(move |v| (u, v)))
            .collect();
        let graph = GraphCSR::from_edges(7, &edges).unwrap();

        let first: Vec<Cycle> = enumerate_cycles(&graph, CycleLimit::unbounded())
            .take(3)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(first.len(), 3);
    }
}
