//! Error types for the activities API.

use activity_store::StoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
    pub code: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Store(e) => match e {
                StoreError::NotFound(_) => (StatusCode::NOT_FOUND, "ACTIVITY_NOT_FOUND"),
                StoreError::AlreadySignedUp { .. } => {
                    (StatusCode::BAD_REQUEST, "ALREADY_SIGNED_UP")
                }
                StoreError::NotRegistered { .. } => (StatusCode::BAD_REQUEST, "NOT_REGISTERED"),
                StoreError::InvalidEmail => (StatusCode::BAD_REQUEST, "INVALID_EMAIL"),
                StoreError::Unavailable(_) => {
                    (StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE")
                }
                StoreError::InvalidRecord(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "INVALID_RECORD")
                }
            },
            ApiError::RateLimitExceeded => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMIT_EXCEEDED"),
        }
    }

    /// Message shown to the caller.
    pub fn detail(&self) -> String {
        match self {
            ApiError::Store(StoreError::NotFound(_)) => "Activity not found".to_string(),
            ApiError::Store(StoreError::AlreadySignedUp { .. }) => {
                "Student already signed up for this activity".to_string()
            }
            ApiError::Store(StoreError::NotRegistered { .. }) => {
                "Student not registered for this activity".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let body = ErrorResponse {
            detail: self.detail(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
