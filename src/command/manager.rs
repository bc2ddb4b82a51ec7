// CommandManager - Manages undo/redo stacks

use crate::command::trait_def::{CommandError, CommandResult, UndoableCommand};
use crate::graph::Graph;
use std::collections::VecDeque;

/// Default maximum number of commands to keep in history
const DEFAULT_MAX_HISTORY: usize = 100;

/// Manages command execution and undo/redo functionality
///
/// The CommandManager maintains two stacks:
/// - Undo stack: Commands that have been executed and can be undone
/// - Redo stack: Commands that have been undone and can be redone
///
/// When a new command is executed:
/// 1. Execute the command
/// 2. Merge it into the previous command if both allow it, else push it
/// 3. Clear the redo stack (since we're on a new timeline)
///
/// # Memory Management
/// The undo stack holds at most `max_history` commands; the oldest one is
/// dropped when the limit is reached.
pub struct CommandManager {
    /// Stack of commands that can be undone (most recent at the back)
    undo_stack: VecDeque<Box<dyn UndoableCommand>>,

    /// Stack of commands that can be redone (most recent at the back)
    redo_stack: VecDeque<Box<dyn UndoableCommand>>,

    /// Maximum number of commands to keep in history
    max_history: usize,

    /// When set, the next command never merges into the previous one
    sealed: bool,
}

impl CommandManager {
    /// Create a new CommandManager with default settings
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_HISTORY)
    }

    /// Create a new CommandManager with a custom history limit
    pub fn with_capacity(max_history: usize) -> Self {
        Self {
            undo_stack: VecDeque::with_capacity(max_history),
            redo_stack: VecDeque::with_capacity(max_history),
            max_history,
            sealed: false,
        }
    }

    /// Execute a command and record it for undo
    ///
    /// # Errors
    /// Returns an error if the command execution fails; nothing is recorded.
    pub fn execute(
        &mut self,
        mut command: Box<dyn UndoableCommand>,
        graph: &mut Graph,
    ) -> CommandResult<()> {
        command.execute(graph)?;

        self.redo_stack.clear();

        let sealed = std::mem::take(&mut self.sealed);
        if !sealed {
            if let Some(last) = self.undo_stack.back_mut() {
                if last.can_merge_with(command.as_ref()) {
                    return last.merge_with(command);
                }
            }
        }

        self.undo_stack.push_back(command);

        if self.undo_stack.len() > self.max_history {
            self.undo_stack.pop_front();
        }

        Ok(())
    }

    /// Keep the next command as its own history entry (e.g. at the end of a drag)
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    /// Undo the last command
    ///
    /// # Errors
    /// Returns an error if there is nothing to undo or the undo fails.
    pub fn undo(&mut self, graph: &mut Graph) -> CommandResult<String> {
        let mut command = self
            .undo_stack
            .pop_back()
            .ok_or_else(|| CommandError::UndoFailed("Nothing to undo".into()))?;

        let description = command.description();
        command.undo(graph)?;

        self.redo_stack.push_back(command);
        self.sealed = true;

        Ok(description)
    }

    /// Redo the last undone command
    ///
    /// # Errors
    /// Returns an error if there is nothing to redo or the execution fails.
    pub fn redo(&mut self, graph: &mut Graph) -> CommandResult<String> {
        let mut command = self
            .redo_stack
            .pop_back()
            .ok_or_else(|| CommandError::ExecutionFailed("Nothing to redo".into()))?;

        let description = command.description();
        command.execute(graph)?;

        self.undo_stack.push_back(command);
        self.sealed = true;

        Ok(description)
    }

    /// Check if there are commands that can be undone
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if there are commands that can be redone
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get a description of the command that would be undone
    pub fn undo_description(&self) -> Option<String> {
        self.undo_stack.back().map(|cmd| cmd.description())
    }

    /// Get a description of the command that would be redone
    pub fn redo_description(&self) -> Option<String> {
        self.redo_stack.back().map(|cmd| cmd.description())
    }

    /// Get the number of commands in the undo stack
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the number of commands in the redo stack
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}

impl Default for CommandManager {
    fn default() -> Self {
        Self::new()
    }
}
