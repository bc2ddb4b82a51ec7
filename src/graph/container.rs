// Graph container - Ordered node collection with selection and hit testing

use super::edge::EdgeKey;
use super::node::{Node, NodeId};
use super::EDGE_HIT_TOLERANCE;
use crate::audio::NodeBehavior;
use crate::error::{GraphError, GraphResult};
use crate::geometry::{Point, distance_to_line, edge_endpoints, point_in_rect, segment_projection};

/// Ordered collection of nodes
///
/// Insertion order is significant: it decides hit-test priority and the
/// index labels drawn on each node.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    next_id: u64,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new node and return its id
    pub fn create_node(&mut self, position: Point, behavior: NodeBehavior) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.push(Node::new(id, position, behavior));
        id
    }

    /// Put a previously removed node back at `index` (clamped to the end)
    pub fn restore_node(&mut self, index: usize, node: Node) {
        self.next_id = self.next_id.max(node.id().0 + 1);
        let index = index.min(self.nodes.len());
        self.nodes.insert(index, node);
    }

    /// Remove a node and every edge pointing at it
    ///
    /// Returns the node and the index it occupied.
    pub fn remove_node(&mut self, id: NodeId) -> Option<(usize, Node)> {
        let index = self.index_of(id)?;
        let node = self.nodes.remove(index);
        for other in self.nodes.iter_mut() {
            other.remove_child(id);
        }
        Some((index, node))
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index_of(id).is_some()
    }

    /// Current position of a node in draw order (its display label)
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.nodes.iter().position(|n| n.id() == id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id() == id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id() == id)
    }

    fn require_mut(&mut self, id: NodeId) -> GraphResult<&mut Node> {
        self.node_mut(id).ok_or(GraphError::UnknownNode(id))
    }

    /// Add the edge `parent -> child`
    ///
    /// Returns `Ok(false)` without touching the graph if the edge exists.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> GraphResult<bool> {
        if !self.contains(child) {
            return Err(GraphError::UnknownNode(child));
        }

        let added = self.require_mut(parent)?.add_child(child);
        if !added {
            tracing::debug!(edge = %EdgeKey::new(parent, child), "child already exists");
        }
        Ok(added)
    }

    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        self.node_mut(parent)
            .map(|node| node.remove_child(child))
            .unwrap_or(false)
    }

    pub fn has_edge(&self, key: EdgeKey) -> bool {
        self.node(key.parent)
            .map(|node| node.has_child(key.child))
            .unwrap_or(false)
    }

    /// All edges, parents in graph order and children in insertion order
    pub fn edges(&self) -> impl Iterator<Item = EdgeKey> + '_ {
        self.nodes.iter().flat_map(|node| {
            node.children()
                .iter()
                .map(move |&child| EdgeKey::new(node.id(), child))
        })
    }

    pub fn toggle_selected(&mut self, id: NodeId) -> GraphResult<bool> {
        let node = self.require_mut(id)?;
        node.toggle_selected();
        Ok(node.selected)
    }

    pub fn select(&mut self, id: NodeId) -> GraphResult<()> {
        self.require_mut(id)?.selected = true;
        Ok(())
    }

    pub fn clear_selections(&mut self) {
        for node in self.nodes.iter_mut() {
            node.selected = false;
        }
    }

    pub fn has_selected(&self) -> bool {
        self.nodes.iter().any(|n| n.selected)
    }

    pub fn selected_ids(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.selected)
            .map(|n| n.id())
            .collect()
    }

    /// Replace the selection with the nodes whose centers lie in the rectangle
    pub fn select_in_rect(&mut self, corner1: Point, corner2: Point) {
        for node in self.nodes.iter_mut() {
            node.selected = point_in_rect(node.position, corner1, corner2);
        }
    }

    /// Translate every selected node; returns the ids that moved
    pub fn move_selected(&mut self, delta: Point) -> Vec<NodeId> {
        let mut moved = Vec::new();
        for node in self.nodes.iter_mut().filter(|n| n.selected) {
            node.position += delta;
            moved.push(node.id());
        }
        moved
    }

    /// Translate the given nodes, ignoring ids that no longer exist
    pub fn move_nodes(&mut self, ids: &[NodeId], delta: Point) {
        for node in self.nodes.iter_mut().filter(|n| ids.contains(&n.id())) {
            node.position += delta;
        }
    }

    /// First node in graph order whose circle of `radius * scale` contains `point`
    ///
    /// First match, not nearest: with overlapping circles the earlier node wins.
    pub fn hit_test_node(
        &self,
        point: Point,
        radius: f64,
        scale: f64,
        exclude: Option<NodeId>,
    ) -> Option<NodeId> {
        self.nodes
            .iter()
            .filter(|n| Some(n.id()) != exclude)
            .find(|n| n.is_hovering(point, radius * scale))
            .map(|n| n.id())
    }

    /// First edge in graph order that passes close to `point`
    ///
    /// The point must be within `1.5 * edge_width` of the line through the
    /// shrunk edge and project inside the shrunk segment.
    pub fn hit_test_edge(&self, point: Point, radius: f64, edge_width: f64) -> Option<EdgeKey> {
        let tolerance = EDGE_HIT_TOLERANCE * edge_width;

        self.edges().find(|key| {
            let (Some(parent), Some(child)) = (self.node(key.parent), self.node(key.child)) else {
                return false;
            };

            let shrunk = edge_endpoints(parent.position, child.position, radius);
            let within_extent = match segment_projection(point, shrunk.start, shrunk.end) {
                Some(t) => (0.0..=1.0).contains(&t),
                None => point.distance_to(shrunk.start) < tolerance,
            };

            within_extent && distance_to_line(point, shrunk.start, shrunk.end) < tolerance
        })
    }

    /// Zero every playing counter
    pub fn reset_playing(&mut self) {
        for node in self.nodes.iter_mut() {
            node.reset_playing();
        }
    }
}
