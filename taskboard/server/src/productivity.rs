use crate::web::{UpstreamError, UpstreamState};
use axum::{Json, Router, extract::State, routing::get};
use taskboard_core::Task;

pub use taskboard_core::wire::ProductivityResponse;

/// Share of completed tasks, as a percentage. Zero when there are no tasks.
pub fn productivity_percentage(tasks: &[Task]) -> f64 {
    if tasks.is_empty() {
        return 0.0;
    }
    let completed = tasks.iter().filter(|task| task.completed).count();
    completed as f64 / tasks.len() as f64 * 100.0
}

/// Handler for GET /productivity.
#[tracing::instrument(skip(state))]
pub async fn productivity_handler(
    State(state): State<UpstreamState>,
) -> Result<Json<ProductivityResponse>, UpstreamError> {
    let tasks = state.task_store.list_all().await?;
    Ok(Json(ProductivityResponse {
        productivity_percentage: productivity_percentage(&tasks),
    }))
}

/// Creates and returns the productivity service router.
pub fn create_productivity_router(state: UpstreamState) -> Router {
    Router::new()
        .route("/productivity", get(productivity_handler))
        .with_state(state)
}
