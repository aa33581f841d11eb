//! Task filter service: a read-only projection over the task store.
use crate::web::{UpstreamError, UpstreamState};
use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

pub use taskboard_core::wire::{FilterQuery, FilteredTasksResponse};

/// Handler for GET /filter_tasks.
#[tracing::instrument(skip(state))]
pub async fn filter_tasks_handler(
    State(state): State<UpstreamState>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<FilteredTasksResponse>, UpstreamError> {
    let tasks = state.task_store.list_all().await?;
    let filtered_tasks = tasks.into_iter().filter(|task| query.matches(task)).collect();
    Ok(Json(FilteredTasksResponse { filtered_tasks }))
}

/// Creates and returns the filter service router.
pub fn create_filter_router(state: UpstreamState) -> Router {
    Router::new()
        .route("/filter_tasks", get(filter_tasks_handler))
        .with_state(state)
}
