use common::error::Error;
use common::types::VertexId;
use cycle_core::GraphCSR;

/// Vertices of the complete digraph used by `bench_unbounded`.
pub const COMPLETE_VERTICES: usize = 8;

/// Shape of the ring of cliques used by `bench_limited`.
pub const RING_CLIQUES: usize = 60;
pub const CLIQUE_SIZE: usize = 6;
pub const RING_LIMIT: i64 = 4;

/// Every ordered pair of distinct vertices is an edge.
pub fn complete_digraph(n: usize) -> Result<GraphCSR, Error> {
    let edges: Vec<(VertexId, VertexId)> = (0..n)
        .flat_map(|u| (0..n).filter(move |&v| v != u).map(move |v| (u, v)))
        .collect();
    GraphCSR::from_edges(n, &edges)
}

/// Number of elementary cycles of the complete digraph on `n` vertices:
/// `sum over k in 2..=n of C(n, k) * (k - 1)!`.
pub fn complete_digraph_cycles(n: usize) -> u64 {
    let mut total = 0u64;
    let mut choose = 1u64; // C(n, k), updated incrementally
    let mut factorial = 1u64; // (k - 1)!
    for k in 1..=n as u64 {
        choose = choose * (n as u64 - k + 1) / k;
        if k >= 2 {
            factorial *= k - 1;
            total += choose * factorial;
        }
    }
    total
}

/// `cliques` complete digraphs of `size` vertices, each joined to the next by a
/// single edge, the last one back to the first.
///
/// Long cycles run around the whole ring, so a length limit cuts most of the
/// search while the short in-clique cycles remain.
pub fn ring_of_cliques(cliques: usize, size: usize) -> Result<GraphCSR, Error> {
    let mut edges = Vec::new();
    for c in 0..cliques {
        let base = c * size;
        for u in 0..size {
            for v in 0..size {
                if u != v {
                    edges.push((base + u, base + v));
                }
            }
        }
        let next = ((c + 1) % cliques) * size;
        edges.push((base + size - 1, next));
    }
    GraphCSR::from_edges(cliques * size, &edges)
}
