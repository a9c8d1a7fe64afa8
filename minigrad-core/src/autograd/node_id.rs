use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide counter handing out node identifiers. Never reset.
static NODE_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Unique identifier of a node in the computation graph.
///
/// Identifiers are only meaningful as map keys: two nodes never share one,
/// but the numeric order carries no graph semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

impl NodeId {
    /// Allocates the next identifier.
    pub fn next() -> Self {
        NodeId(NODE_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value, for logging.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
