//! Exercise database operations
//!
//! Handles all database interactions for users and their exercise logs.
//! Exercise rows are only ever read or written through their owning user.

use crate::error::AppError;
use crate::exercise::models::{Exercise, NewExercise, User, UserSummary};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info};
use uuid::Uuid;

/// Database connection pool for the exercise tracker
#[derive(Debug, Clone)]
pub struct ExerciseDb {
    pool: SqlitePool,
}

impl ExerciseDb {
    /// Open (creating if needed) the database and run migrations
    ///
    /// # Arguments
    /// * `db_path` - Path to the SQLite database file, or a `sqlite:` URL
    ///
    /// # Returns
    /// * `Ok(ExerciseDb)` if successful
    /// * `Err(AppError)` if connection failed
    pub async fn connect(db_path: &str) -> Result<Self, AppError> {
        // SQLite connection string format: sqlite://path/to/db.db
        let connection_string = if db_path.starts_with("sqlite:") {
            db_path.to_string()
        } else {
            // Ensure parent directory exists
            if let Some(parent) = PathBuf::from(db_path).parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AppError::Internal(anyhow::anyhow!("Failed to create db directory: {}", e))
                })?;
            }
            format!("sqlite:{}", db_path)
        };

        let options = SqliteConnectOptions::from_str(&connection_string)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid database path: {}", e)))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!("Failed to connect to database: {}", e))
            })?;

        info!("Connected to SQLite database at: {}", db_path);

        let db = Self { pool };
        db.run_migrations().await?;

        Ok(db)
    }

    /// Run database migrations
    async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations...");

        let migration_sql = include_str!("../../migrations/001_create_exercise_tracker.sql");

        for statement in migration_statements(migration_sql) {
            sqlx::query(&statement)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::Internal(anyhow::anyhow!(
                        "Migration failed: {} - Statement: {}",
                        e,
                        statement.chars().take(100).collect::<String>()
                    ))
                })?;
        }

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Close every pooled connection. The handle is unusable afterwards.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database connections closed");
    }

    /// Find a user by exact username
    pub async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserSummary>, AppError> {
        let user = sqlx::query_as::<_, UserSummary>(
            "SELECT id, username FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to fetch user: {}", e)))?;

        Ok(user)
    }

    /// Find a user by ID
    pub async fn find_user(&self, id: &str) -> Result<Option<UserSummary>, AppError> {
        let user = sqlx::query_as::<_, UserSummary>("SELECT id, username FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to fetch user: {}", e)))?;

        Ok(user)
    }

    /// Create a new user with an empty log
    ///
    /// A duplicate username is reported as `AppError::Conflict`.
    pub async fn insert_user(&self, username: &str) -> Result<UserSummary, AppError> {
        let user = UserSummary {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
        };

        sqlx::query("INSERT INTO users (id, username, created_at) VALUES (?, ?, ?)")
            .bind(&user.id)
            .bind(&user.username)
            .bind(chrono::Utc::now().timestamp())
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                    AppError::Conflict("Username already taken".to_string())
                }
                e => AppError::Internal(anyhow::anyhow!("Failed to create user: {}", e)),
            })?;

        debug!("Created user: {} ({})", user.username, user.id);
        Ok(user)
    }

    /// Get all users, in creation order
    pub async fn list_users(&self) -> Result<Vec<UserSummary>, AppError> {
        let users = sqlx::query_as::<_, UserSummary>(
            "SELECT id, username FROM users ORDER BY created_at ASC, rowid ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to fetch users: {}", e)))?;

        Ok(users)
    }

    /// Append one exercise to a user's log
    ///
    /// The insert only happens if the user exists, in a single statement, so
    /// concurrent appends to the same user never overwrite each other.
    ///
    /// # Returns
    /// * `Ok(true)` if the exercise was appended
    /// * `Ok(false)` if no user has the given ID
    pub async fn append_exercise(
        &self,
        user_id: &str,
        exercise: &NewExercise,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "INSERT INTO exercises (user_id, description, duration, date) \
             SELECT id, ?, ?, ? FROM users WHERE id = ?",
        )
        .bind(&exercise.description)
        .bind(exercise.duration)
        .bind(exercise.date)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to add exercise: {}", e)))?;

        let appended = result.rows_affected() == 1;
        if appended {
            debug!("Added exercise '{}' to user {}", exercise.description, user_id);
        }
        Ok(appended)
    }

    /// Get all exercises for a user, in insertion order
    pub async fn get_exercises(&self, user_id: &str) -> Result<Vec<Exercise>, AppError> {
        let exercises = sqlx::query_as::<_, Exercise>(
            "SELECT description, duration, date FROM exercises WHERE user_id = ? ORDER BY id ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to fetch exercises: {}", e)))?;

        Ok(exercises)
    }

    /// Get a user together with their whole log
    pub async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        let Some(summary) = self.find_user(id).await? else {
            return Ok(None);
        };
        let exercises = self.get_exercises(&summary.id).await?;

        Ok(Some(User {
            id: summary.id,
            username: summary.username,
            exercises,
        }))
    }
}

/// Split a migration script into executable statements
///
/// Comment lines and trailing `--` comments are dropped and statements are
/// split on `;`.
fn migration_statements(sql: &str) -> Vec<String> {
    let mut cleaned_sql = String::new();
    for line in sql.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("--") {
            continue;
        }
        let without_comments = match trimmed.find("--") {
            Some(comment_pos) => &trimmed[..comment_pos],
            None => trimmed,
        };
        cleaned_sql.push_str(without_comments.trim());
        cleaned_sql.push(' ');
    }

    cleaned_sql
        .split(';')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
