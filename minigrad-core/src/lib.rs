// Declares the main modules of the crate
pub mod autograd;
pub mod error;
pub mod numeric;
pub mod value;


// Re-export the node type so it is reachable directly via `minigrad_core::Value`
pub use value::Value;
// Re-export traits required by public functions/structs
pub use num_traits;

pub use autograd::{backpropagate, topological_sort, Context, Function, NodeId, NodeKind, Variable};
pub use error::AutogradError;
pub use numeric::GradNumeric;
