//! Exercise log API handlers

use crate::api::extract::{FieldValue, Payload};
use crate::error::AppError;
use crate::exercise::{AddExerciseInput, AddedExercise, ExerciseLog, LogQuery};
use crate::state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::Json,
};
use serde::Deserialize;

/// Add exercise request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddExerciseRequest {
    /// Owner of the exercise
    pub user_id: Option<String>,
    /// What was done
    pub description: Option<String>,
    /// Minutes, as a number or a numeric string
    pub duration: Option<FieldValue>,
    /// Optional `YYYY-MM-DD` date
    pub date: Option<String>,
}

impl From<AddExerciseRequest> for AddExerciseInput {
    fn from(request: AddExerciseRequest) -> Self {
        Self {
            user_id: request.user_id,
            description: request.description,
            duration: request.duration.map(FieldValue::into_text),
            date: request.date,
        }
    }
}

/// Log query parameters
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogParams {
    /// User whose log is requested
    pub user_id: Option<String>,
    /// Inclusive lower date bound
    pub from: Option<String>,
    /// Inclusive upper date bound
    pub to: Option<String>,
    /// Maximum number of entries
    pub limit: Option<String>,
}

impl From<LogParams> for LogQuery {
    fn from(params: LogParams) -> Self {
        Self {
            user_id: params.user_id,
            from: params.from,
            to: params.to,
            limit: params.limit,
        }
    }
}

/// POST /api/exercise/add - Append an exercise to a user's log
pub async fn add_exercise(
    State(state): State<AppState>,
    Payload(request): Payload<AddExerciseRequest>,
) -> Result<Json<AddedExercise>, AppError> {
    let added = state.exercises.add_exercise(request.into()).await?;
    Ok(Json(added))
}

/// GET /api/exercise/log - Read a user's filtered log
pub async fn get_log(
    State(state): State<AppState>,
    params: Result<Query<LogParams>, QueryRejection>,
) -> Result<Json<ExerciseLog>, AppError> {
    let Query(params) = params?;
    let log = state.exercises.get_log(params.into()).await?;
    Ok(Json(log))
}
