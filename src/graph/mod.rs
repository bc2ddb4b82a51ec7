// Graph - Node entities and the ordered graph container
// Edges are stored as child lists on their parent node (directed adjacency list)

pub mod container;
pub mod edge;
pub mod node;

pub use container::Graph;
pub use edge::EdgeKey;
pub use node::{Node, NodeId};

/// Default multiplier applied to the node radius when hit testing nodes
pub const DEFAULT_HIT_SCALE: f64 = 2.0;

/// Edge hit tolerance, as a multiple of the edge stroke width
pub const EDGE_HIT_TOLERANCE: f64 = 1.5;
