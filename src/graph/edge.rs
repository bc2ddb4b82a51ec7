// Edge identity - Derived key for a directed parent -> child relationship

use super::node::NodeId;
use std::fmt;

/// Identifies a directed edge
///
/// Edges are not stored as entities; the key is derived from node ids on
/// demand, never from node positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    pub parent: NodeId,
    pub child: NodeId,
}

impl EdgeKey {
    pub fn new(parent: NodeId, child: NodeId) -> Self {
        Self { parent, child }
    }

    /// Key of the edge running the other way
    pub fn reversed(&self) -> Self {
        Self::new(self.child, self.parent)
    }

    pub fn is_self_loop(&self) -> bool {
        self.parent == self.child
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.parent, self.child)
    }
}
