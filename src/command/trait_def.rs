// UndoableCommand trait definition

use crate::error::GraphError;
use crate::graph::Graph;
use std::any::Any;
use std::fmt;

/// Result type for command operations
pub type CommandResult<T> = Result<T, CommandError>;

/// Errors that can occur during command execution
#[derive(Debug, Clone)]
pub enum CommandError {
    /// Command execution failed
    ExecutionFailed(String),
    /// Undo operation failed
    UndoFailed(String),
    /// Invalid state for this operation
    InvalidState(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::ExecutionFailed(msg) => write!(f, "Execution failed: {}", msg),
            CommandError::UndoFailed(msg) => write!(f, "Undo failed: {}", msg),
            CommandError::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<GraphError> for CommandError {
    fn from(err: GraphError) -> Self {
        CommandError::ExecutionFailed(err.to_string())
    }
}

/// Trait for graph edits that support undo/redo
///
/// A command records whatever it needs during `execute` so that `undo`
/// restores the graph exactly, and `execute` may run again after an undo
/// (redo).
///
/// # Example
/// ```no_run
/// use floodgraph::command::trait_def::{CommandResult, UndoableCommand};
/// use floodgraph::geometry::Point;
/// use floodgraph::graph::Graph;
/// use std::any::Any;
///
/// struct ClearSelection {
///     previous: Vec<floodgraph::graph::NodeId>,
/// }
///
/// impl UndoableCommand for ClearSelection {
///     fn execute(&mut self, graph: &mut Graph) -> CommandResult<()> {
///         self.previous = graph.selected_ids();
///         graph.clear_selections();
///         Ok(())
///     }
///
///     fn undo(&mut self, graph: &mut Graph) -> CommandResult<()> {
///         for id in &self.previous {
///             graph.select(*id)?;
///         }
///         Ok(())
///     }
///
///     fn description(&self) -> String {
///         "Clear selection".to_string()
///     }
///
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
/// }
/// ```
pub trait UndoableCommand: Send {
    /// Apply the edit, storing what undo needs
    fn execute(&mut self, graph: &mut Graph) -> CommandResult<()>;

    /// Revert a previous `execute`
    fn undo(&mut self, graph: &mut Graph) -> CommandResult<()>;

    /// Human-readable label (e.g. "Move 2 nodes")
    fn description(&self) -> String;

    /// Concrete type access, used for merging
    fn as_any(&self) -> &dyn Any;

    /// Whether `other` (already executed) can fold into this command
    fn can_merge_with(&self, _other: &dyn UndoableCommand) -> bool {
        false
    }

    /// Fold `other` into this command; only called after `can_merge_with`
    fn merge_with(&mut self, _other: Box<dyn UndoableCommand>) -> CommandResult<()> {
        Ok(())
    }
}
