//! Strongly connected component decomposition.
//!
//! Iterative Tarjan: a single DFS assigns each vertex a discovery index and a
//! low-link (smallest index reachable through the DFS subtree plus one back edge).
//! A vertex whose low-link equals its own index is the root of a component, which
//! is then popped off the Tarjan stack. The DFS is driven by an explicit frame stack
//! so deep graphs cannot overflow the call stack.

use std::collections::{BTreeSet, HashMap};

use super::traits::Digraph;
use common::{error::Error, types::VertexId};

/// Smallest component that can hold an elementary cycle (self-loops are not cycles here).
pub const MIN_SCC_SIZE: usize = 2;

/// A strongly connected component: vertex ids in ascending order.
pub type Component = BTreeSet<VertexId>;

#[derive(Debug, Clone, Copy)]
struct NodeState {
    index: usize,
    low_link: usize,
    on_stack: bool,
}

/// DFS frame: a vertex and the position of the next successor to examine.
struct Frame {
    vertex: VertexId,
    successors: Vec<VertexId>,
    next: usize,
}

/// Computes the strongly connected components of `graph` with at least `min_size` vertices.
///
/// Components are returned in no particular order.
///
/// # Errors
/// Propagates `Error::VertexNotFound` from the graph, which only happens if the
/// graph reports a neighbour that is not one of its vertices.
pub fn strongly_connected_components<G: Digraph>(
    graph: &G,
    min_size: usize,
) -> Result<Vec<Component>, Error> {
    let mut states: HashMap<VertexId, NodeState> = HashMap::new();
    let mut tarjan_stack: Vec<VertexId> = Vec::new();
    let mut components: Vec<Component> = Vec::new();
    let mut index = 0;

    for root in graph.vertices() {
        if states.contains_key(&root) {
            continue;
        }

        let mut dfs: Vec<Frame> = Vec::new();
        visit(graph, root, &mut index, &mut states, &mut tarjan_stack, &mut dfs)?;

        while let Some(frame) = dfs.last_mut() {
            let vertex = frame.vertex;

            if frame.next < frame.successors.len() {
                let succ = frame.successors[frame.next];
                frame.next += 1;

                match states.get(&succ).copied() {
                    None => {
                        visit(graph, succ, &mut index, &mut states, &mut tarjan_stack, &mut dfs)?;
                    }
                    Some(succ_state) if succ_state.on_stack => {
                        lower_link(&mut states, vertex, succ_state.index);
                    }
                    Some(_) => {}
                }
                continue;
            }

            // All successors done: close the frame and propagate the low-link upwards.
            dfs.pop();
            let state = states
                .get(&vertex)
                .copied()
                .ok_or(Error::VertexNotFound(vertex))?;

            if let Some(parent) = dfs.last() {
                lower_link(&mut states, parent.vertex, state.low_link);
            }

            if state.low_link == state.index {
                let mut component = Component::new();
                while let Some(member) = tarjan_stack.pop() {
                    if let Some(s) = states.get_mut(&member) {
                        s.on_stack = false;
                    }
                    component.insert(member);
                    if member == vertex {
                        break;
                    }
                }
                if component.len() >= min_size {
                    components.push(component);
                }
            }
        }
    }

    Ok(components)
}

/// First visit of `vertex`: number it, put it on the Tarjan stack and open its frame.
fn visit<G: Digraph>(
    graph: &G,
    vertex: VertexId,
    index: &mut usize,
    states: &mut HashMap<VertexId, NodeState>,
    tarjan_stack: &mut Vec<VertexId>,
    dfs: &mut Vec<Frame>,
) -> Result<(), Error> {
    states.insert(
        vertex,
        NodeState {
            index: *index,
            low_link: *index,
            on_stack: true,
        },
    );
    *index += 1;
    tarjan_stack.push(vertex);

    dfs.push(Frame {
        vertex,
        successors: graph.out_neighbors(vertex)?,
        next: 0,
    });

    Ok(())
}

fn lower_link(states: &mut HashMap<VertexId, NodeState>, vertex: VertexId, candidate: usize) {
    if let Some(state) = states.get_mut(&vertex) {
        state.low_link = state.low_link.min(candidate);
    }
}
