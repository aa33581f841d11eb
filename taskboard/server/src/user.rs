//! User store: a keyed collection of free-form user records.
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use taskboard_core::wire::MessageResponse;
use tokio::sync::RwLock;

/// A user record. Only `id` is interpreted; every other field is stored as given.
///
/// The id may be any JSON value. Records are keyed by its path form: a string
/// id as is, anything else as its JSON text (`42`, `true`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Value,
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, Value>,
}

impl User {
    pub fn key(&self) -> String {
        match &self.id {
            Value::String(id) => id.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct UserState {
    pub users: Arc<RwLock<HashMap<String, User>>>,
}

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("User not found!")]
    UserNotFound(String),
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        (
            StatusCode::NOT_FOUND,
            Json(MessageResponse::new(self.to_string())),
        )
            .into_response()
    }
}

/// Handler for POST /users. Replaces any existing user with the same id.
#[tracing::instrument(skip(state, user), fields(user_id = %user.key()))]
pub async fn create_user_handler(
    State(state): State<UserState>,
    Json(user): Json<User>,
) -> (StatusCode, Json<MessageResponse>) {
    state.users.write().await.insert(user.key(), user);
    (
        StatusCode::CREATED,
        Json(MessageResponse::new("User created successfully!")),
    )
}

/// Handler for GET /users/{id}.
#[tracing::instrument(skip(state))]
pub async fn get_user_handler(
    State(state): State<UserState>,
    Path(id): Path<String>,
) -> Result<Json<User>, UserError> {
    state
        .users
        .read()
        .await
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(UserError::UserNotFound(id))
}

/// Handler for PUT /users/{id}. The stored id wins over any id in the body.
#[tracing::instrument(skip(state, user))]
pub async fn update_user_handler(
    State(state): State<UserState>,
    Path(id): Path<String>,
    Json(mut user): Json<User>,
) -> Result<Json<MessageResponse>, UserError> {
    let mut users = state.users.write().await;
    let entry = users.get_mut(&id).ok_or(UserError::UserNotFound(id))?;
    user.id = std::mem::take(&mut entry.id);
    *entry = user;
    Ok(Json(MessageResponse::new("User updated successfully!")))
}

/// Handler for DELETE /users/{id}.
#[tracing::instrument(skip(state))]
pub async fn delete_user_handler(
    State(state): State<UserState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, UserError> {
    state
        .users
        .write()
        .await
        .remove(&id)
        .map(|_| Json(MessageResponse::new("User deleted successfully!")))
        .ok_or(UserError::UserNotFound(id))
}

/// Creates and returns the user store router.
pub fn create_user_router(state: UserState) -> Router {
    Router::new()
        .route("/users", post(create_user_handler))
        .route(
            "/users/{id}",
            get(get_user_handler)
                .put(update_user_handler)
                .delete(delete_user_handler),
        )
        .with_state(state)
}
