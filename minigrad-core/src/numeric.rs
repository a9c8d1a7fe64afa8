use num_traits::{Float, NumAssignOps};
use std::fmt::Debug;

/// A trait representing numeric types that can flow through a differentiable graph.
///
/// Forward values and derivatives share this type, so derivative accumulation
/// happens at the same precision as the forward pass.
pub trait GradNumeric:
    Float // Includes Num + Copy + Zero + One + etc.
    + NumAssignOps // AddAssign is what the backprop driver accumulates with
    + Debug
    + Send
    + Sync
    + 'static
{
}

impl GradNumeric for f32 {}
impl GradNumeric for f64 {}
