//! Exercise tracker data models
//!
//! Users own an ordered, append-only log of exercises. The types here are
//! shared by the store, the service and the HTTP responses.

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use sqlx::FromRow;

/// Unique identifier for a user (UUID v4 string)
pub type UserId = String;

/// Date layout accepted from clients
pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

/// Date layout used when rendering a logged exercise: `Wed Jan 15`
pub const DATE_DISPLAY_FORMAT: &str = "%a %b %d";

/// The public face of a user: id and username
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct UserSummary {
    /// Unique identifier assigned on creation
    pub id: UserId,
    /// Username, unique across all users
    pub username: String,
}

/// A user together with their full exercise log
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// Unique identifier assigned on creation
    pub id: UserId,
    /// Username, unique across all users
    pub username: String,
    /// Exercises in insertion order
    pub exercises: Vec<Exercise>,
}

impl User {
    /// Id and username only
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.clone(),
            username: self.username.clone(),
        }
    }
}

/// A single logged exercise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Exercise {
    /// What was done
    pub description: String,
    /// Duration in minutes
    pub duration: u32,
    /// Calendar date the exercise took place
    #[serde(serialize_with = "serialize_display_date")]
    pub date: NaiveDate,
}

impl From<NewExercise> for Exercise {
    fn from(new: NewExercise) -> Self {
        Self {
            description: new.description,
            duration: new.duration,
            date: new.date,
        }
    }
}

/// A validated exercise ready to be appended to a user's log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExercise {
    /// What was done
    pub description: String,
    /// Duration in minutes
    pub duration: u32,
    /// Calendar date the exercise took place
    pub date: NaiveDate,
}

/// Raw add-exercise input as received from a client, before validation
#[derive(Debug, Clone, Default)]
pub struct AddExerciseInput {
    /// Owner of the new exercise
    pub user_id: Option<String>,
    /// What was done
    pub description: Option<String>,
    /// Duration in minutes, still unparsed
    pub duration: Option<String>,
    /// Optional `YYYY-MM-DD` date; today when absent
    pub date: Option<String>,
}

/// Raw log query as received from a client, before validation
#[derive(Debug, Clone, Default)]
pub struct LogQuery {
    /// User whose log is requested
    pub user_id: Option<String>,
    /// Inclusive lower date bound (`YYYY-MM-DD`)
    pub from: Option<String>,
    /// Inclusive upper date bound (`YYYY-MM-DD`)
    pub to: Option<String>,
    /// Maximum number of entries to return
    pub limit: Option<String>,
}

/// Response for a freshly appended exercise
#[derive(Debug, Clone, Serialize)]
pub struct AddedExercise {
    /// Owning user
    #[serde(flatten)]
    pub user: UserSummary,
    /// The exercise that was appended
    #[serde(flatten)]
    pub exercise: Exercise,
}

/// A user's filtered exercise log
#[derive(Debug, Clone, Serialize)]
pub struct ExerciseLog {
    /// Owning user
    #[serde(flatten)]
    pub user: UserSummary,
    /// Number of entries in `log`
    pub count: usize,
    /// Matching exercises in insertion order
    pub log: Vec<Exercise>,
}

/// Date range and limit applied to a user's log
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogFilter {
    /// Keep exercises on or after this date
    pub from: Option<NaiveDate>,
    /// Keep exercises on or before this date
    pub to: Option<NaiveDate>,
    /// Keep at most this many entries
    pub limit: Option<usize>,
}

impl LogFilter {
    /// Filter by date range, then truncate to `limit`. Order is preserved.
    pub fn apply(&self, exercises: Vec<Exercise>) -> Vec<Exercise> {
        let limit = self.limit.unwrap_or(exercises.len());
        exercises
            .into_iter()
            .filter(|e| self.from.map_or(true, |from| e.date >= from))
            .filter(|e| self.to.map_or(true, |to| e.date <= to))
            .take(limit)
            .collect()
    }
}

/// Parse a strict `YYYY-MM-DD` calendar date
///
/// Returns `None` unless the input is exactly four digits, dash, two digits,
/// dash, two digits, and names a real day.
pub fn parse_calendar_date(input: &str) -> Option<NaiveDate> {
    let bytes = input.as_bytes();
    if bytes.len() != 10 {
        return None;
    }
    let shape_ok = bytes.iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        _ => b.is_ascii_digit(),
    });
    if !shape_ok {
        return None;
    }
    NaiveDate::parse_from_str(input, DATE_INPUT_FORMAT).ok()
}

/// Render a date the way logged exercises show it, e.g. `Wed Jan 15`
pub fn format_display_date(date: NaiveDate) -> String {
    date.format(DATE_DISPLAY_FORMAT).to_string()
}

fn serialize_display_date<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_display_date(*date))
}
