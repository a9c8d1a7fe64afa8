//! Reverse-mode backpropagation driver.
//!
//! The backward pass:
//! 1. Orders every non-constant node reachable from the output, output first
//! 2. Walks that order keeping one running derivative total per node, committing
//!    leaf totals to their accumulators and fanning everything else out to parents

use crate::autograd::graph::topological_sort;
use crate::autograd::{NodeId, Variable};
use crate::error::AutogradError;
use log::{debug, trace};
use num_traits::Zero;
use std::collections::HashMap;

/// Propagates `seed` from `output` back to every reachable leaf.
///
/// Each leaf's [`Variable::accumulate_derivative`] is called exactly once with the sum
/// of the contributions of all paths from `output`. Because the traversal order puts
/// every consumer of a node before the node itself, a node's running total is complete
/// by the time it is read.
///
/// Contributions aimed at constant parents are discarded. Values are propagated as
/// returned by the operators: no clipping, normalization or NaN handling.
///
/// # Errors
/// Returns the first error raised by a node's `chain_rule` or a leaf's
/// `accumulate_derivative`. Leaves committed before the failure keep their contribution.
pub fn backpropagate<V: Variable>(output: &V, seed: V::Derivative) -> Result<(), AutogradError> {
    let order = topological_sort(output);
    debug!(
        "backpropagate: starting from {} over {} nodes",
        output.unique_id(),
        order.len()
    );

    let mut totals: HashMap<NodeId, V::Derivative> = order
        .iter()
        .map(|node| (node.unique_id(), V::Derivative::zero()))
        .collect();
    totals.insert(output.unique_id(), seed);

    let mut leaves_reached = 0usize;
    for node in &order {
        let id = node.unique_id();
        let d_output = totals
            .get(&id)
            .cloned()
            .unwrap_or_else(V::Derivative::zero);

        if node.is_leaf() {
            trace!("backpropagate: leaf {} receives {:?}", id, d_output);
            node.accumulate_derivative(d_output)?;
            leaves_reached += 1;
            continue;
        }

        for (parent, local_d) in node.chain_rule(d_output)? {
            if parent.is_constant() {
                continue;
            }
            trace!(
                "backpropagate: {} -> {} contributes {:?}",
                id,
                parent.unique_id(),
                local_d
            );
            *totals
                .entry(parent.unique_id())
                .or_insert_with(V::Derivative::zero) += local_d;
        }
    }

    debug!("backpropagate: done, {} leaves updated", leaves_reached);
    Ok(())
}

#[cfg(test)]
#[path = "backprop_test.rs"]
mod tests;
