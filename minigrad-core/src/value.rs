use crate::autograd::backprop::backpropagate;
use crate::autograd::grad_mode::is_grad_enabled;
use crate::autograd::{Context, Function, NodeId, NodeKind, Variable};
use crate::error::AutogradError;
use crate::numeric::GradNumeric;
use log::trace;
use std::fmt;
use std::sync::{Arc, RwLock};

/// How a `Value` came to exist.
enum History<T> {
    Leaf,
    Constant,
    Operation {
        function: Arc<dyn Function<T>>,
        ctx: Context<T>,
        inputs: Vec<Value<T>>,
    },
}

struct ValueData<T> {
    id: NodeId,
    data: T,
    name: Option<String>,
    history: History<T>,
    /// Persistent accumulator, only ever written for leaves.
    grad: RwLock<Option<T>>,
}

impl<T> Drop for ValueData<T> {
    /// Unlinks the history with a worklist. Dropping a long chain through the nested
    /// `Arc`s would otherwise recurse once per node and overflow the stack.
    fn drop(&mut self) {
        let mut pending = match &mut self.history {
            History::Operation { inputs, .. } => std::mem::take(inputs),
            _ => return,
        };
        while let Some(value) = pending.pop() {
            // Shared inputs stay alive; only the last handle is unlinked further.
            if let Ok(mut data) = Arc::try_unwrap(value.0) {
                if let History::Operation { inputs, .. } = &mut data.history {
                    pending.append(inputs);
                }
            }
        }
    }
}

/// A differentiable scalar node.
///
/// `Value` is a reference-counted handle: cloning it is cheap and shares the node, which
/// is how one sub-expression feeds several operations. Nodes are immutable apart from the
/// gradient accumulator of leaves.
///
/// Graphs are built with [`Value::apply`] from operators implementing [`Function`].
pub struct Value<T>(Arc<ValueData<T>>);

impl<T> Clone for Value<T> {
    fn clone(&self) -> Self {
        Value(Arc::clone(&self.0))
    }
}

impl<T: GradNumeric> Value<T> {
    fn from_parts(data: T, history: History<T>) -> Self {
        Value(Arc::new(ValueData {
            id: NodeId::next(),
            data,
            name: None,
            history,
            grad: RwLock::new(None),
        }))
    }

    /// Creates an input we want derivatives with respect to.
    pub fn leaf(data: T) -> Self {
        Self::from_parts(data, History::Leaf)
    }

    /// Creates a value excluded from differentiation.
    pub fn constant(data: T) -> Self {
        Self::from_parts(data, History::Constant)
    }

    /// Attaches a debug name. Must be called before the value is shared.
    pub fn with_name(self, name: impl Into<String>) -> Self {
        match Arc::try_unwrap(self.0) {
            Ok(mut inner) => {
                inner.name = Some(name.into());
                Value(Arc::new(inner))
            }
            Err(shared) => {
                log::warn!(
                    "Value::with_name: node {} is already shared, name ignored",
                    shared.id
                );
                Value(shared)
            }
        }
    }

    /// Applies `function` to `inputs`, recording history when a derivative may be requested.
    ///
    /// The result is an operation node if gradient mode is enabled and at least one input
    /// is not constant. Otherwise the result is a constant and the function ran with a
    /// no-grad context, so nothing was saved for a backward step.
    ///
    /// # Errors
    /// Whatever `function.forward` returns.
    pub fn apply(function: Arc<dyn Function<T>>, inputs: &[Value<T>]) -> Result<Value<T>, AutogradError> {
        let needs_grad = is_grad_enabled() && inputs.iter().any(|v| !v.is_constant());
        let mut ctx = Context::new(!needs_grad);
        let input_data: Vec<T> = inputs.iter().map(|v| v.data()).collect();
        let data = function.forward(&mut ctx, &input_data)?;

        let history = if needs_grad {
            History::Operation {
                function,
                ctx,
                inputs: inputs.to_vec(),
            }
        } else {
            History::Constant
        };
        let out = Self::from_parts(data, history);
        trace!(
            "Value::apply: created {} ({:?}) from {} inputs",
            out.id(),
            out.kind(),
            inputs.len()
        );
        Ok(out)
    }

    pub fn id(&self) -> NodeId {
        self.0.id
    }

    pub fn data(&self) -> T {
        self.0.data
    }

    pub fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    /// Name of the producing operator, for operation nodes.
    pub fn op_name(&self) -> Option<&'static str> {
        match &self.0.history {
            History::Operation { function, .. } => Some(function.name()),
            _ => None,
        }
    }

    /// Inputs of the producing operation; empty for leaves and constants.
    pub fn inputs(&self) -> &[Value<T>] {
        match &self.0.history {
            History::Operation { inputs, .. } => inputs,
            _ => &[],
        }
    }

    /// `true` unless the value is a constant.
    pub fn requires_grad(&self) -> bool {
        !self.is_constant()
    }

    /// Returns the accumulated gradient, if any backward pass reached this leaf.
    pub fn grad(&self) -> Option<T> {
        match self.0.grad.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Clears the gradient accumulator.
    pub fn zero_grad(&self) -> Result<(), AutogradError> {
        let mut guard = self
            .0
            .grad
            .write()
            .map_err(|e| AutogradError::LockPoisoned(e.to_string()))?;
        *guard = None;
        Ok(())
    }

    /// Returns a constant holding the same data, cut off from this value's history.
    pub fn detach(&self) -> Value<T> {
        Self::constant(self.data())
    }

    /// Backpropagates a seed of one from this value.
    pub fn backward(&self) -> Result<(), AutogradError> {
        backpropagate(self, T::one())
    }

    /// Backpropagates `seed` from this value.
    pub fn backward_with(&self, seed: T) -> Result<(), AutogradError> {
        backpropagate(self, seed)
    }
}

impl<T: GradNumeric> Variable for Value<T> {
    type Derivative = T;

    fn unique_id(&self) -> NodeId {
        self.0.id
    }

    fn kind(&self) -> NodeKind {
        match self.0.history {
            History::Leaf => NodeKind::Leaf,
            History::Constant => NodeKind::Constant,
            History::Operation { .. } => NodeKind::Operation,
        }
    }

    fn parents(&self) -> Vec<Self> {
        self.inputs().to_vec()
    }

    fn chain_rule(&self, d_output: T) -> Result<Vec<(Self, T)>, AutogradError> {
        let History::Operation { function, ctx, inputs } = &self.0.history else {
            return Ok(Vec::new());
        };
        let local = function.backward(ctx, d_output)?;
        if local.len() != inputs.len() {
            return Err(AutogradError::GradientCountMismatch {
                node: self.0.id,
                expected: inputs.len(),
                actual: local.len(),
            });
        }
        Ok(inputs.iter().cloned().zip(local).collect())
    }

    fn accumulate_derivative(&self, d: T) -> Result<(), AutogradError> {
        if !self.is_leaf() {
            return Err(AutogradError::NotALeaf(self.0.id));
        }
        let mut guard = self
            .0
            .grad
            .write()
            .map_err(|e| AutogradError::LockPoisoned(e.to_string()))?;
        *guard = Some(match *guard {
            Some(existing) => existing + d,
            None => d,
        });
        Ok(())
    }
}

impl<T: GradNumeric> fmt::Debug for Value<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Value");
        s.field("id", &self.0.id)
            .field("data", &self.0.data)
            .field("kind", &self.kind());
        if let Some(name) = &self.0.name {
            s.field("name", name);
        }
        if let Some(op) = self.op_name() {
            s.field("op", &op);
        }
        s.field("grad", &self.grad()).finish()
    }
}

impl<T: GradNumeric + fmt::Display> fmt::Display for Value<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.grad() {
            Some(g) => write!(f, "Value(data={}, grad={})", self.0.data, g),
            None => write!(f, "Value(data={})", self.0.data),
        }
    }
}

#[cfg(test)]
#[path = "value_test.rs"]
mod tests;
