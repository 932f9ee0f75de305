//! Exercise service
//!
//! The four operations of the tracker: register a user, list users, append
//! an exercise, and read a filtered log. Every input is validated here,
//! before the store is touched.

use crate::error::AppError;
use crate::exercise::db::ExerciseDb;
use crate::exercise::models::{
    parse_calendar_date, AddExerciseInput, AddedExercise, Exercise, ExerciseLog, LogFilter,
    LogQuery, NewExercise, UserSummary,
};
use chrono::{Local, NaiveDate};
use tracing::{debug, info};

const INVALID_USER_ID: &str = "Invalid UserId";

/// Exercise tracker operations over an injected store
#[derive(Debug, Clone)]
pub struct ExerciseService {
    db: ExerciseDb,
}

impl ExerciseService {
    /// Create a service backed by the given store
    pub fn new(db: ExerciseDb) -> Self {
        Self { db }
    }

    /// Register a new user
    ///
    /// Fails with `Conflict` if the username is taken.
    pub async fn create_user(&self, username: Option<&str>) -> Result<UserSummary, AppError> {
        let username = required(username, "username")?;

        if self.db.find_user_by_username(username).await?.is_some() {
            return Err(AppError::Conflict("Username already taken".to_string()));
        }

        let user = self.db.insert_user(username).await?;
        info!(user_id = %user.id, username = %user.username, "User created");
        Ok(user)
    }

    /// All registered users
    pub async fn list_users(&self) -> Result<Vec<UserSummary>, AppError> {
        self.db.list_users().await
    }

    /// Append one exercise to a user's log
    pub async fn add_exercise(&self, input: AddExerciseInput) -> Result<AddedExercise, AppError> {
        let user_id = input
            .user_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| AppError::NotFound(INVALID_USER_ID.to_string()))?;
        let user = self
            .db
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(INVALID_USER_ID.to_string()))?;

        let exercise = validate_exercise(&input, Local::now().date_naive())?;

        if !self.db.append_exercise(&user.id, &exercise).await? {
            return Err(AppError::NotFound(INVALID_USER_ID.to_string()));
        }

        debug!(user_id = %user.id, description = %exercise.description, "Exercise added");
        Ok(AddedExercise {
            user,
            exercise: Exercise::from(exercise),
        })
    }

    /// A user's log, filtered by date range and truncated to `limit`
    pub async fn get_log(&self, query: LogQuery) -> Result<ExerciseLog, AppError> {
        let user_id = query
            .user_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| AppError::NotFound(INVALID_USER_ID.to_string()))?;
        let user = self
            .db
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(INVALID_USER_ID.to_string()))?;

        let filter = parse_log_filter(&query)?;
        let summary = user.summary();
        let log = filter.apply(user.exercises);

        Ok(ExerciseLog {
            user: summary,
            count: log.len(),
            log,
        })
    }
}

/// A present, non-blank field value
fn required<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, AppError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Validation(format!("{} is required", field)))
}

/// Treat empty strings the same as missing parameters
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Check an add-exercise request and build the record to append
///
/// `today` is used when no date is supplied.
fn validate_exercise(input: &AddExerciseInput, today: NaiveDate) -> Result<NewExercise, AppError> {
    let description = required(input.description.as_deref(), "description")?;
    let duration = required(input.duration.as_deref(), "duration")?;
    let duration = duration.trim().parse::<u32>().map_err(|_| {
        AppError::Validation("Invalid duration value. Please use integer values only".to_string())
    })?;
    let date = match non_empty(&input.date) {
        Some(raw) => parse_calendar_date(raw).ok_or_else(|| {
            AppError::Validation("Invalid date value. Please use yyyy-mm-dd".to_string())
        })?,
        None => today,
    };

    Ok(NewExercise {
        description: description.to_string(),
        duration,
        date,
    })
}

/// Parse the optional `from`, `to` and `limit` parameters of a log query
fn parse_log_filter(query: &LogQuery) -> Result<LogFilter, AppError> {
    let bound = |value: &Option<String>, name: &str| -> Result<Option<NaiveDate>, AppError> {
        non_empty(value)
            .map(|raw| {
                parse_calendar_date(raw).ok_or_else(|| {
                    AppError::Validation(format!(
                        "Invalid {} value. Please use yyyy-mm-dd",
                        name
                    ))
                })
            })
            .transpose()
    };

    let from = bound(&query.from, "from")?;
    let to = bound(&query.to, "to")?;
    let limit = non_empty(&query.limit)
        .map(|raw| {
            raw.parse::<usize>().map_err(|_| {
                AppError::Validation(
                    "Invalid limit value. Please use integer values only".to_string(),
                )
            })
        })
        .transpose()?;

    Ok(LogFilter { from, to, limit })
}
