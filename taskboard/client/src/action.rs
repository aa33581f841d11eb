//! Reversible actions and the table mapping each one to its remote calls.
//!
//! Adding a new reversible action means adding an `Action` variant and one
//! row to [`Action::remote_call`] and [`Action::describe`]; the compiler points
//! at every other place that has to learn about it.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use taskboard_core::{Task, TaskId};

/// One successfully applied mutation, as recorded by the command log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// A task was created; carries the full record as it was sent.
    AddTask { task: Task },
    /// A task was marked complete.
    MarkComplete { task_id: TaskId },
}

/// Which way an action is being driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// The first application of a user's intent.
    Forward,
    /// Undo.
    Reverse,
    /// Redo.
    Reapply,
}

/// A single call against a collaborator service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteCall<'a> {
    /// `TaskStore::create` with the full record, original id included.
    CreateTask(&'a Task),
    /// `TaskStore::delete`.
    DeleteTask(TaskId),
    /// `TaskStore::update` resetting `completed` to false.
    ReopenTask(TaskId),
    /// `CompletionService::mark_complete`.
    MarkComplete(TaskId),
}

impl Action {
    pub fn task_id(&self) -> TaskId {
        match self {
            Action::AddTask { task } => task.id,
            Action::MarkComplete { task_id } => *task_id,
        }
    }

    /// The remote call that drives this action in `direction`.
    ///
    /// Undoing a completion goes straight to the task store; redoing it goes
    /// back through the completion service so its timestamping applies again.
    pub fn remote_call(&self, direction: Direction) -> RemoteCall<'_> {
        match (self, direction) {
            (Action::AddTask { task }, Direction::Forward | Direction::Reapply) => {
                RemoteCall::CreateTask(task)
            }
            (Action::AddTask { task }, Direction::Reverse) => RemoteCall::DeleteTask(task.id),
            (Action::MarkComplete { task_id }, Direction::Forward | Direction::Reapply) => {
                RemoteCall::MarkComplete(*task_id)
            }
            (Action::MarkComplete { task_id }, Direction::Reverse) => {
                RemoteCall::ReopenTask(*task_id)
            }
        }
    }

    /// Status text for a successful `direction`. Forward completions prefer
    /// the message returned by the completion service.
    pub fn success_message(&self, direction: Direction, remote_message: Option<&str>) -> String {
        match (self, direction) {
            (Action::AddTask { task }, Direction::Forward) => {
                format!("Task '{}' added successfully!", task.title)
            }
            (Action::MarkComplete { .. }, Direction::Forward) => remote_message
                .unwrap_or("Task marked as complete!")
                .to_string(),
            (_, Direction::Reverse) => format!("Undo: {} has been reverted.", self.describe()),
            (_, Direction::Reapply) => format!("Redo: {} has been reapplied.", self.describe()),
        }
    }

    /// Status text prefix for a failed `direction`.
    pub fn failure_message(&self, direction: Direction) -> &'static str {
        match (self, direction) {
            (Action::AddTask { .. }, Direction::Forward) => "Error adding task",
            (Action::AddTask { .. }, Direction::Reverse) => "Error undoing add task action",
            (Action::AddTask { .. }, Direction::Reapply) => "Error redoing add task action",
            (Action::MarkComplete { .. }, Direction::Forward) => "Error marking task as complete",
            (Action::MarkComplete { .. }, Direction::Reverse) => {
                "Error undoing mark complete action"
            }
            (Action::MarkComplete { .. }, Direction::Reapply) => {
                "Error redoing mark complete action"
            }
        }
    }

    fn describe(&self) -> String {
        match self {
            Action::AddTask { task } => format!("Addition of task '{}'", task.title),
            Action::MarkComplete { task_id } => format!("Completion of task ID '{}'", task_id),
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::AddTask { task } => write!(f, "add task '{}' ({})", task.title, task.id),
            Action::MarkComplete { task_id } => write!(f, "mark {} complete", task_id),
        }
    }
}
