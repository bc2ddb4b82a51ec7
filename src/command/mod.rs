// Command Pattern for Undo/Redo functionality
//
// Every structural graph edit (node creation, edge creation, moves) goes
// through an UndoableCommand executed by the CommandManager.
//
// Architecture:
// - UndoableCommand trait: execute(), undo(), description()
// - CommandManager: undo/redo stacks, merges consecutive moves
// - Concrete commands: CreateNodeCommand, AddEdgeCommand, MoveNodesCommand
//
// Selection and playing state are not part of the history.

pub mod commands;
pub mod manager;
pub mod trait_def;

pub use commands::{AddEdgeCommand, CreateNodeCommand, MoveNodesCommand};
pub use manager::CommandManager;
pub use trait_def::{CommandError, CommandResult, UndoableCommand};
