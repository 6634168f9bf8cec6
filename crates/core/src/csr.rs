use std::collections::BTreeSet;

use super::traits::Digraph;
use common::error::Error;
use common::types::{Edge, Vertex, VertexId};

/// Mutable working graph in Compressed Sparse Row (CSR) format.
///
/// The adjacency is built once and never grows:
/// - `node_pointers[u]..node_pointers[u+1]` → out-edges of vertex `u`
/// - `edge_targets[i]` → target vertex of edge `i`
/// - `edge_kinds[i]` → relationship-type label of edge `i`
///
/// A second index (`in_pointers` / `in_sources`) holds the reverse adjacency so that
/// removing a vertex can account for its incoming edges without scanning the graph.
///
/// Vertices are only ever removed: `alive[v]` is cleared and every edge touching `v`
/// becomes invisible. The graph therefore stays a subgraph of what it was built from.
#[derive(Debug, Clone)]
pub struct GraphCSR {
    vertices: Vec<Vertex>,
    node_pointers: Vec<usize>,
    edge_targets: Vec<usize>,
    edge_kinds: Vec<String>,
    in_pointers: Vec<usize>,
    in_sources: Vec<usize>,
    alive: Vec<bool>,
    live_vertices: usize,
    live_edges: usize,
}

impl GraphCSR {
    /// Creates a graph from its vertices and a list of edges.
    ///
    /// Edges are stored sorted by source vertex to keep each out-edge block
    /// contiguous.
    ///
    /// # Errors
    /// Returns `Error::InvalidGraph` if an edge references a vertex id outside
    /// `0..vertices.len()`.
    pub fn new(vertices: Vec<Vertex>, edges: &mut [Edge]) -> Result<Self, Error> {
        let num_nodes = vertices.len();

        if let Some(edge) = edges
            .iter()
            .find(|e| e.source >= num_nodes || e.target >= num_nodes)
        {
            return Err(Error::InvalidGraph(format!(
                "edge {} -> {} references a vertex outside 0..{}",
                edge.source, edge.target, num_nodes
            )));
        }

        edges.sort_by_key(|e| e.source);

        let (node_pointers, edge_targets, edge_kinds) = Self::build_csr_from_edges(num_nodes, edges);
        let (in_pointers, in_sources) = Self::build_reverse_index(num_nodes, edges);

        Ok(Self {
            vertices,
            node_pointers,
            edge_targets,
            edge_kinds,
            in_pointers,
            in_sources,
            alive: vec![true; num_nodes],
            live_vertices: num_nodes,
            live_edges: edges.len(),
        })
    }

    /// Creates a graph over `0..num_nodes` from bare `(source, target)` pairs.
    ///
    /// Vertex `i` is named after its id and edges carry an empty relationship label.
    pub fn from_edges(num_nodes: usize, edges: &[(VertexId, VertexId)]) -> Result<Self, Error> {
        let vertices = (0..num_nodes)
            .map(|i| Vertex::from_name(i.to_string()))
            .collect();
        let mut edges: Vec<Edge> = edges.iter().map(|&(u, v)| Edge::new(u, v, "")).collect();

        Self::new(vertices, &mut edges)
    }

    /// Two-pass counting construction of the forward CSR arrays.
    ///
    /// # Returns
    /// 1. `node_pointers`: start index of each vertex's out-edges (size |V| + 1).
    /// 2. `edge_targets`: destination vertex of each edge.
    /// 3. `edge_kinds`: relationship label of each edge.
    fn build_csr_from_edges(num_nodes: usize, edges: &[Edge]) -> (Vec<usize>, Vec<usize>, Vec<String>) {
        let m = edges.len();
        let mut node_pointers = vec![0; num_nodes + 1];

        for edge in edges {
            node_pointers[edge.source + 1] += 1;
        }

        for i in 1..=num_nodes {
            node_pointers[i] += node_pointers[i - 1];
        }

        let mut edge_targets = vec![0; m];
        let mut edge_kinds = vec![String::new(); m];

        let mut cursor = node_pointers.clone();

        for edge in edges {
            let pos = cursor[edge.source];
            edge_targets[pos] = edge.target;
            edge_kinds[pos] = edge.kind.clone();

            cursor[edge.source] += 1;
        }

        (node_pointers, edge_targets, edge_kinds)
    }

    /// Same counting construction keyed by target: `in_sources[in_pointers[v]..in_pointers[v+1]]`
    /// are the sources of the edges entering `v`.
    fn build_reverse_index(num_nodes: usize, edges: &[Edge]) -> (Vec<usize>, Vec<usize>) {
        let mut in_pointers = vec![0; num_nodes + 1];

        for edge in edges {
            in_pointers[edge.target + 1] += 1;
        }

        for i in 1..=num_nodes {
            in_pointers[i] += in_pointers[i - 1];
        }

        let mut in_sources = vec![0; edges.len()];
        let mut cursor = in_pointers.clone();

        for edge in edges {
            in_sources[cursor[edge.target]] = edge.source;
            cursor[edge.target] += 1;
        }

        (in_pointers, in_sources)
    }

    fn check_live(&self, vertex: VertexId) -> Result<(), Error> {
        if self.contains(vertex) {
            Ok(())
        } else {
            Err(Error::VertexNotFound(vertex))
        }
    }

    /// Whether `vertex` exists and has not been removed.
    pub fn contains(&self, vertex: VertexId) -> bool {
        self.alive.get(vertex).copied().unwrap_or(false)
    }

    /// Number of vertices still in the graph.
    pub fn vertex_count(&self) -> usize {
        self.live_vertices
    }

    /// Number of edges whose endpoints are both still in the graph.
    pub fn edge_count(&self) -> usize {
        self.live_edges
    }

    /// Number of vertices the graph was built with.
    pub fn total_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges the graph was built with.
    pub fn total_edges(&self) -> usize {
        self.edge_targets.len()
    }

    /// Vertex data, also available after the vertex was removed from the working graph.
    pub fn vertex(&self, vertex: VertexId) -> Result<&Vertex, Error> {
        self.vertices
            .get(vertex)
            .ok_or(Error::VertexNotFound(vertex))
    }

    pub fn name(&self, vertex: VertexId) -> Result<&str, Error> {
        self.vertex(vertex).map(|v| v.name.as_str())
    }

    pub fn category(&self, vertex: VertexId) -> Result<&str, Error> {
        self.vertex(vertex).map(|v| v.category.as_str())
    }

    /// Relationship labels of the live edges `source -> target` (one per parallel edge).
    pub fn edge_kinds_between(
        &self,
        source: VertexId,
        target: VertexId,
    ) -> Result<Vec<&str>, Error> {
        self.check_live(source)?;
        self.check_live(target)?;

        let start = self.node_pointers[source];
        let end = self.node_pointers[source + 1];

        Ok((start..end)
            .filter(|&i| self.edge_targets[i] == target)
            .map(|i| self.edge_kinds[i].as_str())
            .collect())
    }

    /// Removes `vertex` and, implicitly, every edge incident to it.
    ///
    /// # Errors
    /// Returns `Error::VertexNotFound` if the vertex is unknown or was already removed.
    pub fn remove_vertex(&mut self, vertex: VertexId) -> Result<(), Error> {
        self.check_live(vertex)?;

        let outgoing = (self.node_pointers[vertex]..self.node_pointers[vertex + 1])
            .filter(|&i| self.alive[self.edge_targets[i]])
            .count();
        // Self-loops were already counted as outgoing.
        let incoming = (self.in_pointers[vertex]..self.in_pointers[vertex + 1])
            .map(|i| self.in_sources[i])
            .filter(|&u| u != vertex && self.alive[u])
            .count();

        self.alive[vertex] = false;
        self.live_vertices -= 1;
        self.live_edges -= outgoing + incoming;

        Ok(())
    }

    /// Read-only view of the graph restricted to `vertices`.
    ///
    /// Vertices of the set that were removed from the graph are not part of the view.
    pub fn induced_subgraph<'a>(&'a self, vertices: &'a BTreeSet<VertexId>) -> InducedSubgraph<'a> {
        InducedSubgraph {
            graph: self,
            vertices,
        }
    }
}

impl Digraph for GraphCSR {
    fn vertices(&self) -> Vec<VertexId> {
        (0..self.alive.len()).filter(|&v| self.alive[v]).collect()
    }

    fn out_neighbors(&self, vertex: VertexId) -> Result<Vec<VertexId>, Error> {
        self.check_live(vertex)?;

        let start = self.node_pointers[vertex];
        let end = self.node_pointers[vertex + 1];

        let mut neighbors: Vec<VertexId> = self.edge_targets[start..end]
            .iter()
            .copied()
            .filter(|&v| v != vertex && self.alive[v])
            .collect();
        neighbors.sort_unstable();
        neighbors.dedup();

        Ok(neighbors)
    }
}

/// A graph restricted to a vertex subset; edges leaving the subset are hidden.
#[derive(Debug, Clone, Copy)]
pub struct InducedSubgraph<'a> {
    graph: &'a GraphCSR,
    vertices: &'a BTreeSet<VertexId>,
}

impl InducedSubgraph<'_> {
    fn contains(&self, vertex: VertexId) -> bool {
        self.vertices.contains(&vertex) && self.graph.contains(vertex)
    }
}

impl Digraph for InducedSubgraph<'_> {
    fn vertices(&self) -> Vec<VertexId> {
        self.vertices
            .iter()
            .copied()
            .filter(|&v| self.graph.contains(v))
            .collect()
    }

    fn out_neighbors(&self, vertex: VertexId) -> Result<Vec<VertexId>, Error> {
        if !self.contains(vertex) {
            return Err(Error::VertexNotFound(vertex));
        }

        let mut neighbors = self.graph.out_neighbors(vertex)?;
        neighbors.retain(|v| self.vertices.contains(v));

        Ok(neighbors)
    }
}
