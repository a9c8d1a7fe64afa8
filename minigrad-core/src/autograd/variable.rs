use crate::autograd::NodeId;
use crate::error::AutogradError;
use num_traits::Zero;
use std::fmt::Debug;
use std::ops::AddAssign;

/// How a node participates in differentiation. Fixed when the node is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Created directly by the user; derivatives stop and accumulate here.
    Leaf,
    /// Detached from the graph; never receives or propagates derivatives.
    Constant,
    /// Produced by an operation; carries the inputs it was computed from.
    Operation,
}

/// Defines the interface every differentiable node exposes to the engine.
///
/// `topological_sort` and `backpropagate` are written purely against this trait,
/// so any value type can take part in reverse-mode differentiation as long as it
/// can report its identity, its classification, its parents and its chain-rule step.
///
/// Implementors are expected to be cheap handles (typically an `Arc` around the
/// node data): the engine clones them freely while traversing the graph.
pub trait Variable: Clone {
    /// Numeric type of the derivatives flowing through the graph.
    type Derivative: Clone + Debug + Zero + AddAssign;

    /// Identifier used as the key of every per-node map built by the engine.
    fn unique_id(&self) -> NodeId;

    /// Classification chosen at construction time.
    fn kind(&self) -> NodeKind;

    /// `true` iff the node was created without an operation history.
    fn is_leaf(&self) -> bool {
        self.kind() == NodeKind::Leaf
    }

    /// `true` iff the node is detached from the graph.
    fn is_constant(&self) -> bool {
        self.kind() == NodeKind::Constant
    }

    /// Ordered inputs of the operation that produced this node.
    ///
    /// Empty for leaves and constants. The order must match the order of the
    /// derivatives returned by [`Variable::chain_rule`].
    fn parents(&self) -> Vec<Self>;

    /// Applies the producing operation's local derivative to `d_output`.
    ///
    /// Returns one `(parent, derivative)` pair per parent that should receive a
    /// contribution. Only meaningful for [`NodeKind::Operation`] nodes.
    fn chain_rule(
        &self,
        d_output: Self::Derivative,
    ) -> Result<Vec<(Self, Self::Derivative)>, AutogradError>;

    /// Adds `d` into the node's persistent gradient accumulator.
    ///
    /// Only meaningful for leaves. Repeated calls, including across separate
    /// backward passes, sum rather than overwrite.
    fn accumulate_derivative(&self, d: Self::Derivative) -> Result<(), AutogradError>;
}
