//! Completion and reminder service.
//!
//! Owns no data: every operation reads from the task store, and marking a task
//! complete is a read-modify-write against it.
use chrono::{DateTime, Days, Utc};
use taskboard_core::{Task, TaskId, TaskPatch, TaskStore};

pub mod api;

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("Task not found!")]
    TaskNotFound(TaskId),
    #[error("Error fetching tasks from task store")]
    FetchTasks(#[source] taskboard_core::Error),
    #[error("Error updating task in task store")]
    UpdateTask(#[source] taskboard_core::Error),
}

pub struct CompletionService<'a> {
    task_store: &'a dyn TaskStore,
}

impl<'a> CompletionService<'a> {
    pub fn new(task_store: &'a dyn TaskStore) -> Self {
        Self { task_store }
    }

    /// Marks a task complete, stamping `stopped_at` with `now`.
    ///
    /// # Returns
    ///
    /// The task as written back to the store.
    #[tracing::instrument(skip(self))]
    pub async fn mark_complete(
        &self,
        id: TaskId,
        now: DateTime<Utc>,
    ) -> Result<Task, CompletionError> {
        let tasks = self
            .task_store
            .list_all()
            .await
            .map_err(CompletionError::FetchTasks)?;
        let mut task = tasks
            .into_iter()
            .find(|task| task.id == id)
            .ok_or(CompletionError::TaskNotFound(id))?;

        let patch = TaskPatch::complete_at(now);
        self.task_store
            .update(&id, &patch)
            .await
            .map_err(|err| match err {
                taskboard_core::Error::NotFound(id) => CompletionError::TaskNotFound(id),
                other => CompletionError::UpdateTask(other),
            })?;
        task.apply(&patch);
        Ok(task)
    }

    /// Tasks due on or before the day after `now`.
    #[tracing::instrument(skip(self))]
    pub async fn upcoming_tasks(&self, now: DateTime<Utc>) -> Result<Vec<Task>, CompletionError> {
        let horizon = now.date_naive() + Days::new(1);
        let tasks = self
            .task_store
            .list_all()
            .await
            .map_err(CompletionError::FetchTasks)?;
        Ok(tasks
            .into_iter()
            .filter(|task| task.due_date <= horizon)
            .collect())
    }
}
