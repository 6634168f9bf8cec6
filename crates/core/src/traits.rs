use common::{error::Error, types::VertexId};

/// Read access to a directed graph, as needed by the SCC decomposer.
///
/// Implemented by the full working graph and by induced subgraph views, so the
/// same decomposition runs on the whole graph at start-up and on a single shrunken
/// component afterwards.
pub trait Digraph {
    /// Live vertices of the graph, in ascending id order.
    fn vertices(&self) -> Vec<VertexId>;

    /// Live out-neighbours of `vertex`, without duplicates and without `vertex` itself.
    ///
    /// Returns `Err(Error::VertexNotFound)` if `vertex` is not part of the graph.
    fn out_neighbors(&self, vertex: VertexId) -> Result<Vec<VertexId>, Error>;
}
