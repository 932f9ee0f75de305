//! Error types and error handling for the application
//!
//! Every failure a request can hit is one of the `AppError` variants below.
//! The single boundary that turns them into HTTP responses is the
//! `IntoResponse` impl, which always answers with a plain-text body.

use axum::{
    extract::rejection::{FormRejection, JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// The username is already registered
    #[error("{0}")]
    Conflict(String),

    /// A referenced user does not exist
    #[error("{0}")]
    NotFound(String),

    /// Request input was malformed or a required field was missing
    #[error("{0}")]
    Validation(String),

    /// Internal server error (catch-all for store and unexpected failures)
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Internal(anyhow::Error::new(err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::Conflict(msg) | AppError::NotFound(msg) | AppError::Validation(msg) => msg,
            AppError::Internal(err) => {
                tracing::error!(error = ?err, "Request failed with internal error");
                "Internal Server Error".to_string()
            }
        };

        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_validation_error_is_plain_text_400() {
        let response =
            AppError::Validation("Invalid limit value. Please use integer values only".into())
                .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()["content-type"],
            "text/plain; charset=utf-8"
        );
        assert_eq!(
            body_text(response).await,
            "Invalid limit value. Please use integer values only"
        );
    }

    #[tokio::test]
    async fn test_status_mapping() {
        assert_eq!(
            AppError::Conflict("Username already taken".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::NotFound("Invalid UserId".into()).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let response = AppError::Internal(anyhow::anyhow!("disk on fire")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, "Internal Server Error");
    }
}
