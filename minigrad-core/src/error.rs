use crate::autograd::NodeId;
use thiserror::Error;

/// Custom error type for the minigrad engine.
#[derive(Error, Debug, PartialEq, Clone)] // PartialEq for easier testing
pub enum AutogradError {
    #[error("Node {node} returned {actual} local derivatives for {expected} parents")]
    GradientCountMismatch {
        node: NodeId,
        expected: usize,
        actual: usize,
    },

    #[error("Cannot accumulate a derivative into node {0}: it is not a leaf")]
    NotALeaf(NodeId),

    #[error("Gradient accumulator lock poisoned: {0}")]
    LockPoisoned(String),

    #[error("Forward pass failed: {0}")]
    ForwardError(String),

    #[error("Backward pass failed: {0}")]
    BackwardError(String),
}
