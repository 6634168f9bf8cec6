use std::collections::HashMap;

use common::error::Error;
use common::types::{Edge, Vertex, VertexId};
use cycle_core::GraphCSR;

/// Accumulates named relationships and assigns vertex ids in order of first appearance.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    ids: HashMap<String, VertexId>,
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of the vertex called `name`, creating it if needed.
    pub fn vertex(&mut self, name: &str) -> VertexId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }

        let id = self.vertices.len();
        self.vertices.push(Vertex::from_name(name));
        self.ids.insert(name.to_string(), id);
        id
    }

    /// Adds the relationship `source -> target` labelled `kind`.
    pub fn relationship(&mut self, source: &str, target: &str, kind: &str) {
        let source = self.vertex(source);
        let target = self.vertex(target);
        self.edges.push(Edge::new(source, target, kind));
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn build(mut self) -> Result<GraphCSR, Error> {
        GraphCSR::new(self.vertices, &mut self.edges)
    }
}
