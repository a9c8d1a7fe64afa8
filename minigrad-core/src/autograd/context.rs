/// Scratch record pairing a forward operation with the values its backward step needs.
///
/// A context created with `no_grad = true` drops everything handed to
/// [`Context::save_for_backward`]: nothing will ever read it back, so nothing is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct Context<V> {
    no_grad: bool,
    saved_values: Vec<V>,
}

impl<V> Context<V> {
    pub fn new(no_grad: bool) -> Self {
        Context {
            no_grad,
            saved_values: Vec::new(),
        }
    }

    pub fn is_no_grad(&self) -> bool {
        self.no_grad
    }

    /// Stores `values` for the backward step, replacing anything saved before.
    /// Silently does nothing in no-grad mode.
    pub fn save_for_backward<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = V>,
    {
        if self.no_grad {
            return;
        }
        self.saved_values = values.into_iter().collect();
    }

    /// Values from the last [`Context::save_for_backward`] call, or an empty slice.
    pub fn saved_tensors(&self) -> &[V] {
        &self.saved_values
    }
}

impl<V> Default for Context<V> {
    fn default() -> Self {
        Context::new(false)
    }
}

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;
