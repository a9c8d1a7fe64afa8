use crate::autograd::{NodeId, Variable};
use log::{debug, trace};
use std::collections::HashSet;

/// One pending node of the depth-first traversal, with the parents still to explore.
struct Frame<V> {
    node: V,
    pending_parents: std::vec::IntoIter<V>,
}

impl<V: Variable> Frame<V> {
    fn new(node: V) -> Self {
        // Leaves end the descent even if they report parents.
        let parents = if node.is_leaf() {
            Vec::new()
        } else {
            node.parents()
        };
        Frame {
            node,
            pending_parents: parents.into_iter(),
        }
    }
}

/// Orders every non-constant node reachable from `output`, output first.
///
/// Each node appears exactly once and strictly before all of its parents, so when the
/// sequence is consumed front to back every consumer of a node is handled before the
/// node itself. Constants are neither visited nor descended into; a constant `output`
/// yields an empty order.
///
/// This is a depth-first post-order (parents explored in `parents()` order, a node
/// marked visited before its parents are explored) that is then reversed. The descent
/// uses an explicit stack of frames so that very deep chains do not grow the call stack.
pub fn topological_sort<V: Variable>(output: &V) -> Vec<V> {
    if output.is_constant() {
        debug!("topological_sort: output {} is constant, nothing to order", output.unique_id());
        return Vec::new();
    }

    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut post_order: Vec<V> = Vec::new();
    let mut stack: Vec<Frame<V>> = Vec::new();

    visited.insert(output.unique_id());
    stack.push(Frame::new(output.clone()));

    while let Some(frame) = stack.last_mut() {
        let next_parent = frame.pending_parents.next();
        match next_parent {
            Some(parent) => {
                if parent.is_constant() {
                    trace!("topological_sort: skipping constant {}", parent.unique_id());
                    continue;
                }
                if !visited.insert(parent.unique_id()) {
                    continue;
                }
                trace!("topological_sort: visiting {}", parent.unique_id());
                stack.push(Frame::new(parent));
            }
            None => {
                if let Some(done) = stack.pop() {
                    post_order.push(done.node);
                }
            }
        }
    }

    post_order.reverse();
    debug!(
        "topological_sort: {} nodes reachable from {}",
        post_order.len(),
        output.unique_id()
    );
    post_order
}

#[cfg(test)]
#[path = "graph_test.rs"]
mod tests;
