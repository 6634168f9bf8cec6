use crate::category::category_of;

/// Dense vertex identifier, assigned once at graph construction (`0..N`).
pub type VertexId = usize;

/// A named entity of the relationship graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vertex {
    pub name: String,
    pub category: String,
}

impl Vertex {
    /// Builds a vertex whose category is derived from the name prefix.
    pub fn from_name(name: impl Into<String>) -> Self {
        let name = name.into();
        let category = category_of(&name).to_string();
        Vertex { name, category }
    }
}

/// A directed relationship `source -> target` labelled with its relationship type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub source: VertexId,
    pub target: VertexId,
    pub kind: String,
}

impl Edge {
    pub fn new(source: VertexId, target: VertexId, kind: impl Into<String>) -> Self {
        Edge {
            source,
            target,
            kind: kind.into(),
        }
    }
}

/// An elementary cycle of the graph.
///
/// `path` starts at the root vertex the cycle was discovered from and lists every
/// vertex exactly once; the closing edge from the last vertex back to the first is
/// implicit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cycle {
    pub path: Vec<VertexId>,
}

impl Cycle {
    pub fn new(path: Vec<VertexId>) -> Self {
        Cycle { path }
    }

    /// Number of vertices (and edges) in the cycle.
    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn contains(&self, vertex: VertexId) -> bool {
        self.path.contains(&vertex)
    }

    /// Returns the edges `(u, v)` traversed by the cycle, including the closing one.
    pub fn edges(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        let n = self.path.len();
        (0..n).map(move |i| (self.path[i], self.path[(i + 1) % n]))
    }

    /// Rotation of the cycle that starts at its smallest vertex id.
    ///
    /// Two cycles are the same cycle iff their canonical forms are equal.
    pub fn canonical(&self) -> Cycle {
        let Some(pivot) = self
            .path
            .iter()
            .enumerate()
            .min_by_key(|&(_, v)| *v)
            .map(|(i, _)| i)
        else {
            return self.clone();
        };

        let mut path = self.path.clone();
        path.rotate_left(pivot);
        Cycle { path }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_category_follows_name_prefix() {
        let v = Vertex::from_name("PJ-0042");
        assert_eq!(v.name, "PJ-0042");
        assert_eq!(v.category, "PJ");
    }

    #[test]
    fn canonical_rotates_to_smallest_vertex() {
        let cycle = Cycle::new(vec![4, 2, 9]);
        assert_eq!(cycle.canonical().path, vec![2, 9, 4]);
        assert_eq!(Cycle::new(vec![9, 4, 2]).canonical(), cycle.canonical());
    }

    #[test]
    fn canonical_keeps_direction() {
        // 0->1->2->0 and 0->2->1->0 are different cycles.
        let forward = Cycle::new(vec![1, 2, 0]).canonical();
        let backward = Cycle::new(vec![2, 1, 0]).canonical();
        assert_ne!(forward, backward);
    }

    #[test]
    fn edges_include_closing_edge() {
        let cycle = Cycle::new(vec![3, 5, 8]);
        let edges: Vec<_> = cycle.edges().collect();
        assert_eq!(edges, vec![(3, 5), (5, 8), (8, 3)]);
    }

    #[test]
    fn empty_cycle_is_its_own_canonical_form() {
        let cycle = Cycle::new(Vec::new());
        assert!(cycle.is_empty());
        assert_eq!(cycle.canonical(), cycle);
    }
}
