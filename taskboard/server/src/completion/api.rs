use crate::completion::{CompletionError, CompletionService};
use crate::web::UpstreamState;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use taskboard_core::wire::{ErrorResponse, MessageResponse, TaskIdRequest};

pub use taskboard_core::wire::RemindersResponse;

impl IntoResponse for CompletionError {
    fn into_response(self) -> Response {
        match self {
            CompletionError::TaskNotFound(_) => (
                StatusCode::NOT_FOUND,
                Json(MessageResponse::new(self.to_string())),
            )
                .into_response(),
            CompletionError::FetchTasks(ref source) | CompletionError::UpdateTask(ref source) => {
                tracing::error!("{}: {}", self, source);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new(self.to_string())),
                )
                    .into_response()
            }
        }
    }
}

/// Handler for POST /mark_complete.
#[tracing::instrument(skip(state))]
pub async fn mark_complete_handler(
    State(state): State<UpstreamState>,
    Json(request): Json<TaskIdRequest>,
) -> Result<Json<MessageResponse>, CompletionError> {
    let service = CompletionService::new(state.task_store.as_ref());
    service.mark_complete(request.id, chrono::Utc::now()).await?;
    Ok(Json(MessageResponse::new("Task marked as complete!")))
}

/// Handler for GET /reminders.
#[tracing::instrument(skip(state))]
pub async fn reminders_handler(
    State(state): State<UpstreamState>,
) -> Result<Json<RemindersResponse>, CompletionError> {
    let service = CompletionService::new(state.task_store.as_ref());
    let upcoming_tasks = service.upcoming_tasks(chrono::Utc::now()).await?;
    Ok(Json(RemindersResponse { upcoming_tasks }))
}

/// Creates and returns the completion service router.
pub fn create_completion_router(state: UpstreamState) -> Router {
    Router::new()
        .route("/mark_complete", post(mark_complete_handler))
        .route("/reminders", get(reminders_handler))
        .with_state(state)
}
