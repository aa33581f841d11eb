//! Executes actions against the collaborator services.
use crate::action::{Action, Direction, RemoteCall};
use crate::completion::CompletionService;
use taskboard_core::{TaskId, TaskPatch, TaskStore};
use thiserror::Error;

/// Why an action could not be driven in the requested direction.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The target task is no longer known to the service.
    #[error("task '{0}' not found")]
    NotFound(TaskId),
    /// Re-creating a task collided with a live task of the same id.
    #[error("task '{0}' already exists")]
    AlreadyExists(TaskId),
    /// Transport failure or unexpected status from the named service.
    #[error("{service} call failed: {source}")]
    Remote {
        service: &'static str,
        #[source]
        source: taskboard_core::Error,
    },
}

impl DispatchError {
    fn from_remote(service: &'static str, source: taskboard_core::Error) -> Self {
        match source {
            taskboard_core::Error::NotFound(id) => DispatchError::NotFound(id),
            taskboard_core::Error::AlreadyExists(id) => DispatchError::AlreadyExists(id),
            source => DispatchError::Remote { service, source },
        }
    }

    /// Whether the failure is a logical outcome worth reporting on its own,
    /// rather than a transport or server problem.
    pub fn is_logical(&self) -> bool {
        matches!(
            self,
            DispatchError::NotFound(_) | DispatchError::AlreadyExists(_)
        )
    }
}

/// What a successful remote call reported back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Receipt {
    /// Confirmation text from the service, when it sends one.
    pub message: Option<String>,
}

/// Translates an action plus a direction into remote calls.
///
/// The dispatcher never touches the command log: callers decide what to do
/// with the action based on the returned result.
pub struct Dispatcher<'a, S: TaskStore, C: CompletionService> {
    task_store: &'a S,
    completion: &'a C,
}

impl<'a, S: TaskStore, C: CompletionService> Dispatcher<'a, S, C> {
    pub fn new(task_store: &'a S, completion: &'a C) -> Self {
        Self {
            task_store,
            completion,
        }
    }

    #[tracing::instrument(skip(self), fields(action = %action))]
    pub async fn execute(
        &self,
        action: &Action,
        direction: Direction,
    ) -> Result<Receipt, DispatchError> {
        match action.remote_call(direction) {
            RemoteCall::CreateTask(task) => {
                self.task_store
                    .create(task)
                    .await
                    .map_err(|err| DispatchError::from_remote("task store", err))?;
                Ok(Receipt::default())
            }
            RemoteCall::DeleteTask(id) => {
                self.task_store
                    .delete(&id)
                    .await
                    .map_err(|err| DispatchError::from_remote("task store", err))?;
                Ok(Receipt::default())
            }
            RemoteCall::ReopenTask(id) => {
                self.task_store
                    .update(&id, &TaskPatch::reopen())
                    .await
                    .map_err(|err| DispatchError::from_remote("task store", err))?;
                Ok(Receipt::default())
            }
            RemoteCall::MarkComplete(id) => {
                let message = self
                    .completion
                    .mark_complete(&id)
                    .await
                    .map_err(|err| DispatchError::from_remote("completion service", err))?;
                Ok(Receipt { message })
            }
        }
    }
}
