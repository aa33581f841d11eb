//! The per-session undo/redo command log.
use crate::action::Action;

/// Two stacks of reversible actions, most recent last.
///
/// Actions leave a stack through `take_for_*` and must come back through
/// exactly one of `confirm_*` (the remote call succeeded) or `restore_*`
/// (it failed). With at most one action in flight, restoring puts the stacks
/// back exactly as they were before the attempt.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CommandLog {
    undo_stack: Vec<Action>,
    redo_stack: Vec<Action>,
}

impl CommandLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a freshly applied action. Any redo history is discarded.
    pub fn record(&mut self, action: Action) {
        self.undo_stack.push(action);
        self.redo_stack.clear();
    }

    /// Removes the most recent action for reversal.
    pub fn take_for_undo(&mut self) -> Option<Action> {
        self.undo_stack.pop()
    }

    /// Removes the most recently reversed action for reapplication.
    pub fn take_for_redo(&mut self) -> Option<Action> {
        self.redo_stack.pop()
    }

    /// An undone action becomes available to redo.
    pub fn confirm_undo(&mut self, action: Action) {
        self.redo_stack.push(action);
    }

    /// A redone action becomes available to undo again.
    pub fn confirm_redo(&mut self, action: Action) {
        self.undo_stack.push(action);
    }

    /// Puts back an action whose reversal failed.
    pub fn restore_undo(&mut self, action: Action) {
        self.undo_stack.push(action);
    }

    /// Puts back an action whose reapplication failed.
    pub fn restore_redo(&mut self, action: Action) {
        self.redo_stack.push(action);
    }

    pub fn peek_undo(&self) -> Option<&Action> {
        self.undo_stack.last()
    }

    pub fn peek_redo(&self) -> Option<&Action> {
        self.redo_stack.last()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty() && self.redo_stack.is_empty()
    }

    /// Undoable actions, oldest first.
    pub fn undo_history(&self) -> &[Action] {
        &self.undo_stack
    }

    /// Redoable actions, oldest first.
    pub fn redo_history(&self) -> &[Action] {
        &self.redo_stack
    }
}
