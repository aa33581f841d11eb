//! The task store: the authoritative in-memory collection of task records.
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use taskboard_core::{Priority, Task, TaskId, TaskPatch};
use tokio::sync::RwLock;

pub use taskboard_core::wire::TaskStats;

pub mod api;

/// Error type for TaskService operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TaskServiceError {
    /// A task with the same id is already live.
    #[error("Task with ID {0} already exists")]
    DuplicateTask(TaskId),
    /// No task with this id is live.
    #[error("Task with ID {0} not found")]
    TaskNotFound(TaskId),
}

/// Shared handle to the task collection.
///
/// Every write takes the collection's write lock, so create, update and delete
/// against the same id never interleave.
#[derive(Clone, Debug, Default)]
pub struct TaskState {
    pub tasks: Arc<RwLock<Vec<Task>>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrioritySummary {
    pub completed: usize,
    pub not_completed: usize,
}

/// Completion counts per priority, served by `GET /task_summary`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSummary {
    pub low: PrioritySummary,
    pub medium: PrioritySummary,
    pub high: PrioritySummary,
}

impl TaskSummary {
    fn entry(&mut self, priority: Priority) -> &mut PrioritySummary {
        match priority {
            Priority::Low => &mut self.low,
            Priority::Medium => &mut self.medium,
            Priority::High => &mut self.high,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionTime {
    /// Seconds between creation and completion.
    pub completion_time: f64,
}

pub struct TaskService<'a> {
    tasks: &'a RwLock<Vec<Task>>,
}

impl TaskService<'_> {
    pub fn new(tasks: &RwLock<Vec<Task>>) -> TaskService<'_> {
        TaskService { tasks }
    }

    /// Inserts a task under its own id.
    ///
    /// # Returns
    ///
    /// The stored task, or `DuplicateTask` if the id is already live.
    #[tracing::instrument(skip(self, task), fields(task_id = %task.id))]
    pub async fn create_task(&self, task: Task) -> Result<Task, TaskServiceError> {
        let mut tasks = self.tasks.write().await;
        if tasks.iter().any(|existing| existing.id == task.id) {
            return Err(TaskServiceError::DuplicateTask(task.id));
        }
        tasks.push(task.clone());
        Ok(task)
    }

    /// Retrieves all tasks in insertion order.
    #[tracing::instrument(skip(self))]
    pub async fn get_all_tasks(&self) -> Vec<Task> {
        self.tasks.read().await.clone()
    }

    /// Merges `patch` into the task with the given id.
    ///
    /// # Returns
    ///
    /// The updated task, or `TaskNotFound` if the id is not live.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update_task_by_id(
        &self,
        id: TaskId,
        patch: &TaskPatch,
    ) -> Result<Task, TaskServiceError> {
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or(TaskServiceError::TaskNotFound(id))?;
        task.apply(patch);
        Ok(task.clone())
    }

    /// Deletes the task with the given id, returning it if it was present.
    #[tracing::instrument(skip(self))]
    pub async fn delete_task_by_id(&self, id: TaskId) -> Option<Task> {
        let mut tasks = self.tasks.write().await;
        let position = tasks.iter().position(|task| task.id == id)?;
        Some(tasks.remove(position))
    }

    /// Counts tasks and averages the completion time of completed ones.
    #[tracing::instrument(skip(self))]
    pub async fn get_stats(&self) -> TaskStats {
        let tasks = self.tasks.read().await;
        let total_tasks = tasks.len();
        let completed_tasks = tasks.iter().filter(|task| task.completed).count();
        let times = completion_seconds(&tasks);
        let average = if times.is_empty() {
            0.0
        } else {
            times.iter().sum::<f64>() / times.len() as f64
        };

        TaskStats {
            total_tasks,
            completed_tasks,
            pending_tasks: total_tasks - completed_tasks,
            avg_completion_time: format_minutes_seconds(average),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_summary(&self) -> TaskSummary {
        let tasks = self.tasks.read().await;
        let mut summary = TaskSummary::default();
        for task in tasks.iter() {
            let entry = summary.entry(task.priority);
            if task.completed {
                entry.completed += 1;
            } else {
                entry.not_completed += 1;
            }
        }
        summary
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_completion_times(&self) -> Vec<CompletionTime> {
        let tasks = self.tasks.read().await;
        completion_seconds(&tasks)
            .into_iter()
            .map(|completion_time| CompletionTime { completion_time })
            .collect()
    }
}

fn completion_seconds(tasks: &[Task]) -> Vec<f64> {
    tasks
        .iter()
        .filter_map(Task::completion_time)
        .map(|duration| duration.num_milliseconds() as f64 / 1000.0)
        .collect()
}

/// Formats a number of seconds as `"<m> min <s> sec"`, dropping fractions.
fn format_minutes_seconds(seconds: f64) -> String {
    let whole = seconds.max(0.0) as u64;
    format!("{} min {} sec", whole / 60, whole % 60)
}
