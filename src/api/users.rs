//! User API handlers

use crate::api::extract::Payload;
use crate::error::AppError;
use crate::exercise::UserSummary;
use crate::state::AppState;
use axum::{extract::State, response::Json};
use serde::Deserialize;

/// Create user request
#[derive(Debug, Deserialize)]
pub struct NewUserRequest {
    /// Username to register
    pub username: Option<String>,
}

/// POST /api/exercise/new-user - Register a user
pub async fn create_user(
    State(state): State<AppState>,
    Payload(request): Payload<NewUserRequest>,
) -> Result<Json<UserSummary>, AppError> {
    let user = state
        .exercises
        .create_user(request.username.as_deref())
        .await?;
    Ok(Json(user))
}

/// GET /api/exercise/users - List all users
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserSummary>>, AppError> {
    Ok(Json(state.exercises.list_users().await?))
}
