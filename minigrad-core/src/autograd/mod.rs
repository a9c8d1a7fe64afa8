//! The graph engine: node identity, the capability contract every differentiable node
//! implements, topological ordering and the backpropagation driver.

pub mod backprop;
pub mod context;
pub mod function;
pub mod grad_check;
pub mod grad_mode;
pub mod graph;
pub mod node_id;
pub mod variable;

pub use backprop::backpropagate;
pub use context::Context;
pub use function::Function;
pub use grad_check::{central_difference, check_gradients, GradCheckConfig, GradCheckError};
pub use grad_mode::{is_grad_enabled, no_grad, set_grad_enabled, NoGradGuard};
pub use graph::topological_sort;
pub use node_id::NodeId;
pub use variable::{NodeKind, Variable};
