//! Request body extraction
//!
//! Clients post either JSON or urlencoded forms. `Payload<T>` accepts both,
//! picking the decoder from the `Content-Type` header.

use crate::error::AppError;
use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::header,
    Form, Json,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// A request body decoded from JSON or an urlencoded form
#[derive(Debug, Clone)]
pub struct Payload<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map_or(false, |content_type| {
                content_type.starts_with("application/json")
            });

        if is_json {
            let Json(value) = Json::<T>::from_request(req, state).await?;
            Ok(Payload(value))
        } else {
            let Form(value) = Form::<T>::from_request(req, state).await?;
            Ok(Payload(value))
        }
    }
}

/// A scalar field that may arrive as a JSON number or as text
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// JSON integer
    Integer(i64),
    /// Text, as every form field is
    Text(String),
}

impl FieldValue {
    /// The value as text, ready for parsing
    pub fn into_text(self) -> String {
        match self {
            FieldValue::Integer(n) => n.to_string(),
            FieldValue::Text(s) => s,
        }
    }
}
