// Concrete command implementations

use crate::audio::NodeBehavior;
use crate::command::trait_def::{CommandError, CommandResult, UndoableCommand};
use crate::geometry::Point;
use crate::graph::{Graph, Node, NodeId};
use std::any::Any;

/// Command to add a node
///
/// Undo removes the node (and any edge that points at it); redo puts the
/// same node back with the same id and position in graph order.
pub struct CreateNodeCommand {
    position: Point,
    behavior: Option<NodeBehavior>,
    id: Option<NodeId>,
    removed: Option<(usize, Node)>,
}

impl CreateNodeCommand {
    pub fn new(position: Point, behavior: NodeBehavior) -> Self {
        Self {
            position,
            behavior: Some(behavior),
            id: None,
            removed: None,
        }
    }

    /// Id of the created node, once executed
    pub fn id(&self) -> Option<NodeId> {
        self.id
    }
}

impl UndoableCommand for CreateNodeCommand {
    fn execute(&mut self, graph: &mut Graph) -> CommandResult<()> {
        if let Some((index, node)) = self.removed.take() {
            graph.restore_node(index, node);
            return Ok(());
        }

        let behavior = self
            .behavior
            .take()
            .ok_or_else(|| CommandError::InvalidState("Node already created".into()))?;
        self.id = Some(graph.create_node(self.position, behavior));
        Ok(())
    }

    fn undo(&mut self, graph: &mut Graph) -> CommandResult<()> {
        let id = self
            .id
            .ok_or_else(|| CommandError::UndoFailed("Node was never created".into()))?;
        let (index, mut node) = graph
            .remove_node(id)
            .ok_or_else(|| CommandError::UndoFailed(format!("Node {} no longer exists", id)))?;

        node.reset_playing();
        self.removed = Some((index, node));
        Ok(())
    }

    fn description(&self) -> String {
        "Create node".to_string()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Command to add a directed edge
pub struct AddEdgeCommand {
    parent: NodeId,
    child: NodeId,
}

impl AddEdgeCommand {
    pub fn new(parent: NodeId, child: NodeId) -> Self {
        Self { parent, child }
    }
}

impl UndoableCommand for AddEdgeCommand {
    fn execute(&mut self, graph: &mut Graph) -> CommandResult<()> {
        if graph.add_child(self.parent, self.child)? {
            Ok(())
        } else {
            Err(CommandError::InvalidState(format!(
                "Edge {}->{} already exists",
                self.parent, self.child
            )))
        }
    }

    fn undo(&mut self, graph: &mut Graph) -> CommandResult<()> {
        if graph.remove_child(self.parent, self.child) {
            Ok(())
        } else {
            Err(CommandError::UndoFailed(format!(
                "Edge {}->{} not found",
                self.parent, self.child
            )))
        }
    }

    fn description(&self) -> String {
        format!("Connect {} to {}", self.parent, self.child)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Command to translate a fixed set of nodes
///
/// Consecutive moves of the same nodes merge into one history entry, so a
/// drag undoes in one step.
pub struct MoveNodesCommand {
    ids: Vec<NodeId>,
    delta: Point,
}

impl MoveNodesCommand {
    pub fn new(ids: Vec<NodeId>, delta: Point) -> Self {
        Self { ids, delta }
    }

    pub fn delta(&self) -> Point {
        self.delta
    }
}

impl UndoableCommand for MoveNodesCommand {
    fn execute(&mut self, graph: &mut Graph) -> CommandResult<()> {
        graph.move_nodes(&self.ids, self.delta);
        Ok(())
    }

    fn undo(&mut self, graph: &mut Graph) -> CommandResult<()> {
        graph.move_nodes(&self.ids, -self.delta);
        Ok(())
    }

    fn description(&self) -> String {
        match self.ids.len() {
            1 => "Move node".to_string(),
            n => format!("Move {} nodes", n),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn can_merge_with(&self, other: &dyn UndoableCommand) -> bool {
        other
            .as_any()
            .downcast_ref::<MoveNodesCommand>()
            .is_some_and(|other| other.ids == self.ids)
    }

    fn merge_with(&mut self, other: Box<dyn UndoableCommand>) -> CommandResult<()> {
        let other = other
            .as_any()
            .downcast_ref::<MoveNodesCommand>()
            .ok_or_else(|| CommandError::InvalidState("Cannot merge non-move command".into()))?;
        self.delta += other.delta;
        Ok(())
    }
}
