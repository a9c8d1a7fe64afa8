use crate::error::AutogradError;
use crate::numeric::GradNumeric;
use crate::Value;
use approx::{abs_diff_eq, relative_eq};
use log::debug;
use num_traits::Float;
use thiserror::Error;

/// Error type specifically for gradient checking failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GradCheckError {
    #[error("Gradient check failed for argument {arg_index}: analytical grad {analytical:?} != numerical grad {numerical:?}")]
    GradientMismatch {
        arg_index: usize,
        analytical: f64,
        numerical: f64,
    },
    #[error("Argument index {arg_index} out of bounds for {len} arguments")]
    ArgIndexOutOfBounds { arg_index: usize, len: usize },
    #[error("Argument {arg_index} received no gradient during the backward pass")]
    MissingAnalyticalGrad { arg_index: usize },
    #[error("Numerical gradient is NaN or infinite for argument {arg_index}")]
    NumericalGradNonFinite { arg_index: usize },
    #[error("Autograd error during gradient check: {0}")]
    Autograd(#[from] AutogradError),
}

/// Step size and tolerance used by [`check_gradients`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradCheckConfig {
    /// Central-difference step. Never smaller than the square root of the machine
    /// epsilon of the checked float type (about `3.5e-4` for `f32`).
    pub epsilon: f64,
    /// Used both as absolute and relative tolerance.
    pub tolerance: f64,
}

impl Default for GradCheckConfig {
    fn default() -> Self {
        GradCheckConfig {
            epsilon: 1e-6,
            tolerance: 1e-2,
        }
    }
}

impl GradCheckConfig {
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// Approximates \( \frac{\partial f}{\partial x_i} \) at `args` with a central difference.
///
/// Evaluates `f` with `args[arg_index]` shifted by `+epsilon/2` and `-epsilon/2`, every
/// other argument held fixed, and returns `(f(plus) - f(minus)) / epsilon`.
///
/// # Example
/// ```
/// use minigrad_core::autograd::central_difference;
///
/// // f(x, y) = x * y + x, df/dx = y + 1
/// let f = |v: &[f64]| v[0] * v[1] + v[0];
/// let d = central_difference(f, &[2.0, 3.0], 0, 1e-6).unwrap();
/// assert!((d - 4.0).abs() < 1e-2);
/// ```
pub fn central_difference<T, F>(f: F, args: &[T], arg_index: usize, epsilon: T) -> Result<T, GradCheckError>
where
    T: Float,
    F: Fn(&[T]) -> T,
{
    if arg_index >= args.len() {
        return Err(GradCheckError::ArgIndexOutOfBounds {
            arg_index,
            len: args.len(),
        });
    }
    let half = epsilon / (T::one() + T::one());

    let mut plus = args.to_vec();
    plus[arg_index] = plus[arg_index] + half;
    let mut minus = args.to_vec();
    minus[arg_index] = minus[arg_index] - half;

    Ok((f(&plus) - f(&minus)) / epsilon)
}

/// Checks backpropagated gradients against central differences.
///
/// `build` maps a slice of leaves to the output of the graph under test. It is called
/// once on fresh leaves for the analytical pass (seed one), then repeatedly on constants
/// for the numerical evaluations, so the numerical side never touches the accumulators.
///
/// # Errors
/// * `GradientMismatch` when an analytical and a numerical gradient differ by more than
///   `config.tolerance`, both absolutely and relatively.
/// * `MissingAnalyticalGrad` when a leaf the output depends on was never reached.
/// * `Autograd` for any error raised by `build` or the backward pass.
pub fn check_gradients<T, F>(build: F, point: &[T], config: GradCheckConfig) -> Result<(), GradCheckError>
where
    T: GradNumeric,
    F: Fn(&[Value<T>]) -> Result<Value<T>, AutogradError>,
{
    let leaves: Vec<Value<T>> = point.iter().map(|&x| Value::leaf(x)).collect();
    let output = build(&leaves)?;
    output.backward()?;

    // Errors from `build` cannot escape the closure below, so they are parked here.
    let forward_error = std::cell::RefCell::new(None);
    let forward = |args: &[T]| -> T {
        let constants: Vec<Value<T>> = args.iter().map(|&x| Value::constant(x)).collect();
        match build(&constants) {
            Ok(out) => out.data(),
            Err(e) => {
                forward_error.borrow_mut().get_or_insert(e);
                T::nan()
            }
        }
    };
    let configured: T = num_traits::cast(config.epsilon).unwrap_or_else(T::epsilon);
    let epsilon = configured.max(T::epsilon().sqrt());
    if epsilon > configured {
        debug!(
            "check_gradients: step {} too fine for this float type, using {:?}",
            config.epsilon, epsilon
        );
    }

    for (arg_index, leaf) in leaves.iter().enumerate() {
        let numerical = central_difference(&forward, point, arg_index, epsilon)?;
        if let Some(e) = forward_error.borrow_mut().take() {
            return Err(GradCheckError::Autograd(e));
        }
        let numerical = numerical.to_f64().unwrap_or(f64::NAN);
        if !numerical.is_finite() {
            return Err(GradCheckError::NumericalGradNonFinite { arg_index });
        }

        let analytical = match leaf.grad() {
            Some(g) => g.to_f64().unwrap_or(f64::NAN),
            // Never reached: only fine if the output does not depend on this argument.
            None if abs_diff_eq!(numerical, 0.0, epsilon = config.tolerance) => 0.0,
            None => return Err(GradCheckError::MissingAnalyticalGrad { arg_index }),
        };

        debug!(
            "check_gradients: arg {} analytical={} numerical={}",
            arg_index, analytical, numerical
        );
        let close = abs_diff_eq!(analytical, numerical, epsilon = config.tolerance)
            || relative_eq!(analytical, numerical, max_relative = config.tolerance);
        if !close {
            return Err(GradCheckError::GradientMismatch {
                arg_index,
                analytical,
                numerical,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "grad_check_test.rs"]
mod tests;
