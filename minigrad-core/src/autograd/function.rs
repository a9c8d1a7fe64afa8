use crate::autograd::Context;
use crate::error::AutogradError;
use std::fmt::Debug;

/// Defines the interface an operator implements to take part in the graph.
///
/// The engine itself ships no concrete operators. An operator is applied to its
/// inputs with [`crate::Value::apply`], which runs [`Function::forward`] and records
/// the function, its [`Context`] and the inputs on the resulting node. During the
/// backward pass that node's `chain_rule` calls [`Function::backward`].
///
/// The trait requires `Debug + Send + Sync` because the function is shared through an
/// `Arc` by every node it produced.
pub trait Function<T>: Debug + Send + Sync {
    /// Short label used in log messages and `Debug` output.
    fn name(&self) -> &'static str;

    /// Computes the output value from the input values.
    ///
    /// Anything the backward step needs must be stored with
    /// [`Context::save_for_backward`]. The call is a no-op when the context is in
    /// no-grad mode, so operators can save unconditionally.
    fn forward(&self, ctx: &mut Context<T>, inputs: &[T]) -> Result<T, AutogradError>;

    /// Computes \( \frac{dL}{d\text{Input}_i} = \frac{dL}{d\text{Output}} \cdot \frac{d\text{Output}}{d\text{Input}_i} \)
    /// for each input.
    ///
    /// # Returns
    /// One derivative per input. The order **must** match the order of the inputs
    /// the function was applied to.
    fn backward(&self, ctx: &Context<T>, d_output: T) -> Result<Vec<T>, AutogradError>;
}
