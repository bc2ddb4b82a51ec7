// Node - Positioned, selectable graph vertex with a trigger behavior

use crate::audio::NodeBehavior;
use crate::geometry::{Point, circular_hit_test};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable node identifier, assigned by the graph at creation time
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A vertex of the sequencer graph
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,

    /// Center of the node circle
    pub position: Point,

    /// Outgoing edges, in insertion order, without duplicates
    children: Vec<NodeId>,

    pub selected: bool,

    /// Number of cascade activations currently lighting this node
    playing: u32,

    /// Sound fired when a cascade reaches the node
    pub behavior: NodeBehavior,
}

impl Node {
    pub fn new(id: NodeId, position: Point, behavior: NodeBehavior) -> Self {
        Self {
            id,
            position,
            children: Vec::new(),
            selected: false,
            playing: 0,
            behavior,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn has_child(&self, child: NodeId) -> bool {
        self.children.contains(&child)
    }

    /// Append an outgoing edge; returns false if it already existed
    pub fn add_child(&mut self, child: NodeId) -> bool {
        if self.has_child(child) {
            return false;
        }
        self.children.push(child);
        true
    }

    /// Remove an outgoing edge; returns false if there was none
    pub fn remove_child(&mut self, child: NodeId) -> bool {
        let before = self.children.len();
        self.children.retain(|&c| c != child);
        self.children.len() < before
    }

    pub fn is_hovering(&self, point: Point, radius: f64) -> bool {
        circular_hit_test(point, self.position, radius)
    }

    pub fn toggle_selected(&mut self) {
        self.selected = !self.selected;
    }

    pub fn is_playing(&self) -> bool {
        self.playing > 0
    }

    pub fn playing_count(&self) -> u32 {
        self.playing
    }

    pub(crate) fn begin_playing(&mut self) {
        self.playing = self.playing.saturating_add(1);
    }

    pub(crate) fn end_playing(&mut self) {
        self.playing = self.playing.saturating_sub(1);
    }

    pub(crate) fn reset_playing(&mut self) {
        self.playing = 0;
    }
}
