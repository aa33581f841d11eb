//! A client session: the command log plus the connectors it drives.
use crate::action::{Action, Direction};
use crate::completion::CompletionService;
use crate::dispatch::{DispatchError, Dispatcher};
use crate::log::CommandLog;
use chrono::{NaiveDate, Utc};
use std::fmt::{Display, Formatter};
use taskboard_core::{Priority, Task, TaskId, TaskStore};

/// The single terminal outcome of a session operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Done(String),
    NothingToDo(String),
    Failed(String),
}

impl Status {
    pub fn message(&self) -> &str {
        match self {
            Status::Done(message) | Status::NothingToDo(message) | Status::Failed(message) => {
                message
            }
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Status::Done(_))
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// User-entered fields of a task that has not been created yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    pub priority: Priority,
}

impl TaskDraft {
    /// A title-only draft: due today, low priority, no description.
    pub fn quick(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            due_date: Utc::now().date_naive(),
            priority: Priority::Low,
        }
    }

    fn into_task(self) -> Result<Task, &'static str> {
        if self.title.trim().is_empty() {
            return Err("Task title cannot be empty.");
        }
        Ok(Task::new(
            self.title,
            self.description,
            self.due_date,
            self.priority,
        ))
    }
}

/// A forward mutation requested by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    AddTask(TaskDraft),
    MarkComplete(TaskId),
}

/// One user's session. Owns its command log; nothing is shared between sessions.
///
/// Every operation takes `&mut self`, so a session never has more than one
/// undo or redo in flight.
pub struct Session<S: TaskStore, C: CompletionService> {
    log: CommandLog,
    task_store: S,
    completion: C,
}

impl<S: TaskStore, C: CompletionService> Session<S, C> {
    pub fn new(task_store: S, completion: C) -> Self {
        Self {
            log: CommandLog::new(),
            task_store,
            completion,
        }
    }

    pub fn log(&self) -> &CommandLog {
        &self.log
    }

    fn dispatcher(&self) -> Dispatcher<'_, S, C> {
        Dispatcher::new(&self.task_store, &self.completion)
    }

    /// Applies `intent` remotely and, only once that succeeded, records it.
    #[tracing::instrument(skip(self))]
    pub async fn apply_and_record(&mut self, intent: Intent) -> Status {
        let action = match intent {
            Intent::AddTask(draft) => match draft.into_task() {
                Ok(task) => Action::AddTask { task },
                Err(message) => return Status::Failed(message.to_string()),
            },
            Intent::MarkComplete(task_id) => Action::MarkComplete { task_id },
        };

        match self.dispatcher().execute(&action, Direction::Forward).await {
            Ok(receipt) => {
                let message = action.success_message(Direction::Forward, receipt.message.as_deref());
                tracing::info!("Recorded {}", action);
                self.log.record(action);
                Status::Done(message)
            }
            Err(err) => Status::Failed(failure(&action, Direction::Forward, &err)),
        }
    }

    /// Reverses the most recent action.
    #[tracing::instrument(skip(self))]
    pub async fn undo(&mut self) -> Status {
        let Some(action) = self.log.take_for_undo() else {
            return Status::NothingToDo("No actions to undo.".to_string());
        };

        match self.dispatcher().execute(&action, Direction::Reverse).await {
            Ok(receipt) => {
                let message = action.success_message(Direction::Reverse, receipt.message.as_deref());
                self.log.confirm_undo(action);
                Status::Done(message)
            }
            Err(err) => {
                let message = failure(&action, Direction::Reverse, &err);
                self.log.restore_undo(action);
                Status::Failed(message)
            }
        }
    }

    /// Reapplies the most recently undone action.
    #[tracing::instrument(skip(self))]
    pub async fn redo(&mut self) -> Status {
        let Some(action) = self.log.take_for_redo() else {
            return Status::NothingToDo("No actions to redo.".to_string());
        };

        match self.dispatcher().execute(&action, Direction::Reapply).await {
            Ok(receipt) => {
                let message = action.success_message(Direction::Reapply, receipt.message.as_deref());
                self.log.confirm_redo(action);
                Status::Done(message)
            }
            Err(err) => {
                let message = failure(&action, Direction::Reapply, &err);
                self.log.restore_redo(action);
                Status::Failed(message)
            }
        }
    }

    /// Every task currently held by the task store.
    pub async fn tasks(&self) -> Result<Vec<Task>, taskboard_core::Error> {
        self.task_store.list_all().await
    }
}

fn failure(action: &Action, direction: Direction, err: &DispatchError) -> String {
    tracing::warn!("Failed to apply {} ({:?}): {}", action, direction, err);
    let prefix = action.failure_message(direction);
    if err.is_logical() {
        format!("{prefix}: {err}.")
    } else {
        format!("{prefix}.")
    }
}
