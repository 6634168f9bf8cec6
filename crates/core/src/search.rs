use std::collections::{HashMap, HashSet};

use super::csr::GraphCSR;
use super::limit::CycleLimit;
use super::traits::Digraph;
use common::{
    error::Error,
    types::{Cycle, VertexId},
};

/// One element of the current path together with the out-neighbours still to try.
#[derive(Debug, Clone)]
struct SearchFrame {
    vertex: VertexId,
    remaining: Vec<VertexId>,
}

/// Backtracking state of Johnson's circuit search rooted at a single vertex.
///
/// The state is owned by the caller and advanced with [`SearchState::next_cycle`],
/// which runs the search until it finds the next elementary cycle through the root.
/// Dropping the state at any point abandons the search without side effects.
#[derive(Debug, Clone)]
pub struct SearchState {
    start: VertexId,
    path: Vec<VertexId>,
    stack: Vec<SearchFrame>,
    /// Vertices that may not extend the current path.
    blocked: HashSet<VertexId>,
    /// Vertices that took part in a cycle found below the current prefix.
    closed: HashSet<VertexId>,
    /// `block_map[w]` holds the vertices to unblock together with `w`.
    block_map: HashMap<VertexId, HashSet<VertexId>>,
}

impl SearchState {
    /// Prepares a search for the cycles through `start`.
    ///
    /// # Errors
    /// Returns `Error::VertexNotFound` if `start` is not a live vertex of `graph`.
    pub fn new(graph: &GraphCSR, start: VertexId) -> Result<Self, Error> {
        let remaining = graph.out_neighbors(start)?;

        Ok(SearchState {
            start,
            path: vec![start],
            stack: vec![SearchFrame {
                vertex: start,
                remaining,
            }],
            blocked: HashSet::from([start]),
            closed: HashSet::new(),
            block_map: HashMap::new(),
        })
    }

    /// The root vertex every produced cycle starts and ends at.
    pub fn root(&self) -> VertexId {
        self.start
    }

    /// Whether the search has explored every path from the root.
    pub fn is_exhausted(&self) -> bool {
        self.stack.is_empty()
    }

    /// Advances the search to the next cycle through the root.
    ///
    /// Returns `Ok(None)` once every cycle has been produced, and keeps doing so on
    /// further calls. `graph` and `limit` must be the same for every call on one state.
    ///
    /// # Errors
    /// Any graph error ends the search: the state is left exhausted.
    pub fn next_cycle(
        &mut self,
        graph: &GraphCSR,
        limit: &CycleLimit,
    ) -> Result<Option<Cycle>, Error> {
        let result = self.advance(graph, limit);
        if result.is_err() {
            self.stack.clear();
            self.path.clear();
        }
        result
    }

    fn advance(&mut self, graph: &GraphCSR, limit: &CycleLimit) -> Result<Option<Cycle>, Error> {
        while let Some(frame) = self.stack.last_mut() {
            let vertex = frame.vertex;
            let within_limit = limit.admits(&self.path, graph)?;
            let mut found = None;

            if within_limit {
                if let Some(next) = frame.remaining.pop() {
                    if next == self.start {
                        found = Some(Cycle::new(self.path.clone()));
                        self.closed.extend(self.path.iter().copied());
                    } else if !self.blocked.contains(&next) {
                        let remaining = graph.out_neighbors(next)?;
                        self.path.push(next);
                        self.stack.push(SearchFrame {
                            vertex: next,
                            remaining,
                        });
                        self.closed.remove(&next);
                        self.blocked.insert(next);
                        continue;
                    }
                }
            }

            if !within_limit {
                // A truncated branch proves nothing about reaching the root: keep it
                // unblockable, as if it had closed a cycle.
                self.closed.extend(self.path.iter().copied());
            }

            if frame.remaining.is_empty() || !within_limit {
                self.backtrack(graph, vertex)?;
            }

            if found.is_some() {
                return Ok(found);
            }
        }

        Ok(None)
    }

    /// Leaves `vertex`, the top of the path.
    ///
    /// If a cycle was found through `vertex` it is released (with everything waiting
    /// on it); otherwise it stays blocked until one of its neighbours is released.
    fn backtrack(&mut self, graph: &GraphCSR, vertex: VertexId) -> Result<(), Error> {
        if self.closed.contains(&vertex) {
            self.unblock(vertex);
        } else {
            for nbr in graph.out_neighbors(vertex)? {
                self.block_map.entry(nbr).or_default().insert(vertex);
            }
        }

        self.stack.pop();
        self.path.pop();

        Ok(())
    }

    fn unblock(&mut self, vertex: VertexId) {
        let mut pending = vec![vertex];

        while let Some(v) = pending.pop() {
            if self.blocked.remove(&v) {
                if let Some(waiting) = self.block_map.get_mut(&v) {
                    pending.extend(waiting.drain());
                }
            }
        }
    }
}

/// Lazy sequence of the elementary cycles through one root vertex.
///
/// Not restartable: a fresh [`search_from`] is needed to search again. After an
/// error the sequence ends.
#[derive(Debug)]
pub struct CycleSearch<'g> {
    graph: &'g GraphCSR,
    limit: &'g CycleLimit,
    state: SearchState,
}

/// Starts a cycle search rooted at `start` over the current state of `graph`.
pub fn search_from<'g>(
    graph: &'g GraphCSR,
    start: VertexId,
    limit: &'g CycleLimit,
) -> Result<CycleSearch<'g>, Error> {
    Ok(CycleSearch {
        graph,
        limit,
        state: SearchState::new(graph, start)?,
    })
}

impl Iterator for CycleSearch<'_> {
    type Item = Result<Cycle, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.state.next_cycle(self.graph, self.limit).transpose()
    }
}
