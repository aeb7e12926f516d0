//! HTTP error envelope.
//!
//! Every failure is rendered as `{"error": "<message>"}` with a status code
//! derived from the underlying store error.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde_json::json;
use std::fmt::{Display, Formatter};
use todo_core::StoreError;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound,
    Conflict,
    /// Store failure; the message is the public context, the detail is logged.
    Internal(&'static str),
}

impl ApiError {
    /// Maps a store failure, logging anything that becomes a 500.
    pub fn from_store(context: &'static str, err: StoreError) -> Self {
        match err {
            StoreError::Validation(err) => Self::BadRequest(err.to_string()),
            StoreError::NotFound(_) => Self::NotFound,
            StoreError::Conflict(_) => Self::Conflict,
            other => {
                error!("event=http_store module=server status=error context=\"{context}\" error={other}");
                Self::Internal(context)
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadRequest(message) => f.write_str(message),
            Self::NotFound => f.write_str("Todo not found"),
            Self::Conflict => f.write_str("Todo already exists"),
            Self::Internal(context) => f.write_str(context),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
