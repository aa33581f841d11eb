use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use std::sync::Arc;
use taskboard_core::wire::ErrorResponse;
use taskboard_core::{HttpTaskStore, TaskStore};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::completion::api::create_completion_router;
use crate::config::{Config, ServiceKind};
use crate::filter::create_filter_router;
use crate::productivity::create_productivity_router;
use crate::task::TaskState;
use crate::task::api::create_task_router;
use crate::user::{UserState, create_user_router};

/// State for services that read their tasks from a task store.
#[derive(Clone)]
pub struct UpstreamState {
    pub task_store: Arc<dyn TaskStore>,
}

impl UpstreamState {
    pub fn new(task_store: Arc<dyn TaskStore>) -> Self {
        Self { task_store }
    }
}

/// The task store could not be read.
#[derive(Debug, thiserror::Error)]
#[error("Error fetching tasks from task store")]
pub struct UpstreamError(#[from] taskboard_core::Error);

impl IntoResponse for UpstreamError {
    fn into_response(self) -> Response {
        tracing::error!("{}: {}", self, self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(self.to_string())),
        )
            .into_response()
    }
}

/// Builds the router for the service selected in `config`, with health check and layers.
pub fn create_service_router(config: &Config) -> anyhow::Result<Router> {
    let service_router = match config.service {
        ServiceKind::TaskStore => create_task_router(TaskState::default()),
        ServiceKind::Completion => create_completion_router(upstream_state(config)?),
        ServiceKind::Filter => create_filter_router(upstream_state(config)?),
        ServiceKind::Productivity => create_productivity_router(upstream_state(config)?),
        ServiceKind::Users => create_user_router(UserState::default()),
    };

    Ok(Router::new()
        .route("/health", axum::routing::get(health_check_handler))
        .merge(service_router)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        ))
}

fn upstream_state(config: &Config) -> anyhow::Result<UpstreamState> {
    let task_store = HttpTaskStore::new(&config.task_store_url, config.request_timeout())?;
    tracing::info!("Reading tasks from {}", task_store.base_url());
    Ok(UpstreamState::new(Arc::new(task_store)))
}

#[tracing::instrument(skip(config), fields(service = ?config.service))]
pub async fn start_web_server(config: Config) -> anyhow::Result<()> {
    let server_address = format!("0.0.0.0:{}", config.port());
    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    tracing::info!("Web server running on http://{}", server_address);

    let app = create_service_router(&config)?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[tracing::instrument]
pub async fn health_check_handler() -> &'static str {
    "OK"
}
