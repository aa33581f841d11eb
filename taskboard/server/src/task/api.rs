use crate::task::{
    CompletionTime, TaskService, TaskServiceError, TaskState, TaskStats, TaskSummary,
};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use taskboard_core::Task;
use taskboard_core::wire::{
    ErrorResponse, MessageResponse, TaskIdRequest, TasksResponse, UpdateTaskRequest,
};

impl IntoResponse for TaskServiceError {
    fn into_response(self) -> Response {
        let (status_code, error) = match &self {
            TaskServiceError::DuplicateTask(_) => (StatusCode::CONFLICT, self.to_string()),
            TaskServiceError::TaskNotFound(_) => {
                (StatusCode::NOT_FOUND, "Task not found!".to_string())
            }
        };
        (status_code, Json(ErrorResponse::new(error))).into_response()
    }
}

/// Handler for POST /add_task.
#[tracing::instrument(skip(state, task), fields(task_id = %task.id))]
pub async fn add_task_handler(
    State(state): State<TaskState>,
    Json(task): Json<Task>,
) -> Result<Json<MessageResponse>, TaskServiceError> {
    let service = TaskService::new(&state.tasks);
    service
        .create_task(task)
        .await
        .inspect_err(|err| tracing::warn!("Rejected task: {}", err))?;
    Ok(Json(MessageResponse::new("Task added successfully!")))
}

/// Handler for GET /view_tasks.
#[tracing::instrument(skip(state))]
pub async fn view_tasks_handler(State(state): State<TaskState>) -> Json<TasksResponse> {
    let service = TaskService::new(&state.tasks);
    Json(TasksResponse {
        tasks: service.get_all_tasks().await,
    })
}

/// Handler for POST /update_task.
#[tracing::instrument(skip(state, request), fields(task_id = %request.id))]
pub async fn update_task_handler(
    State(state): State<TaskState>,
    Json(request): Json<UpdateTaskRequest>,
) -> Result<Json<MessageResponse>, TaskServiceError> {
    let service = TaskService::new(&state.tasks);
    service
        .update_task_by_id(request.id, &request.patch)
        .await?;
    Ok(Json(MessageResponse::new("Task updated successfully!")))
}

/// Handler for POST /delete_task. Succeeds whether or not the task exists.
#[tracing::instrument(skip(state))]
pub async fn delete_task_handler(
    State(state): State<TaskState>,
    Json(request): Json<TaskIdRequest>,
) -> Json<MessageResponse> {
    let service = TaskService::new(&state.tasks);
    if service.delete_task_by_id(request.id).await.is_none() {
        tracing::debug!("Task {} was already absent", request.id);
    }
    Json(MessageResponse::new("Task deleted successfully!"))
}

#[tracing::instrument(skip(state))]
pub async fn stats_handler(State(state): State<TaskState>) -> Json<TaskStats> {
    Json(TaskService::new(&state.tasks).get_stats().await)
}

#[tracing::instrument(skip(state))]
pub async fn task_summary_handler(State(state): State<TaskState>) -> Json<TaskSummary> {
    Json(TaskService::new(&state.tasks).get_summary().await)
}

#[tracing::instrument(skip(state))]
pub async fn completion_times_handler(
    State(state): State<TaskState>,
) -> Json<Vec<CompletionTime>> {
    Json(TaskService::new(&state.tasks).get_completion_times().await)
}

/// Creates and returns the task store router.
pub fn create_task_router(state: TaskState) -> Router {
    Router::new()
        .route("/add_task", post(add_task_handler))
        .route("/view_tasks", get(view_tasks_handler))
        .route("/update_task", post(update_task_handler))
        .route("/delete_task", post(delete_task_handler))
        .route("/stats", get(stats_handler))
        .route("/task_summary", get(task_summary_handler))
        .route("/completion_times", get(completion_times_handler))
        .with_state(state)
}
