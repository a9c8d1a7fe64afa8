//! Per-thread switch controlling whether operations record history.
//!
//! While gradients are disabled, [`crate::Value::apply`] produces constants whose
//! contexts save nothing, which is what inference code wants.

use std::cell::Cell;

thread_local! {
    static GRAD_ENABLED: Cell<bool> = Cell::new(true);
}

pub fn is_grad_enabled() -> bool {
    GRAD_ENABLED.with(|flag| flag.get())
}

/// Sets the flag for the current thread and returns the previous value.
pub fn set_grad_enabled(enabled: bool) -> bool {
    GRAD_ENABLED.with(|flag| flag.replace(enabled))
}

/// Disables gradient recording until dropped, then restores the previous state.
#[derive(Debug)]
pub struct NoGradGuard {
    previous: bool,
}

impl NoGradGuard {
    pub fn new() -> Self {
        NoGradGuard {
            previous: set_grad_enabled(false),
        }
    }
}

impl Default for NoGradGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for NoGradGuard {
    fn drop(&mut self) {
        set_grad_enabled(self.previous);
    }
}

/// Runs `f` with gradient recording disabled.
pub fn no_grad<R, F: FnOnce() -> R>(f: F) -> R {
    let _guard = NoGradGuard::new();
    f()
}
