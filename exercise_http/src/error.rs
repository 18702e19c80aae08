//! Error type for HTTP handlers.
//!
//! Core errors are translated to status codes here and nowhere else. Error
//! bodies are plain text.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Error returned by HTTP handlers
#[derive(Debug)]
pub enum ApiError {
    /// Error raised by a core operation
    Core(exercise_core::Error),
    /// Body or parameters could not be decoded
    BadRequest(String),
}

impl ApiError {
    /// Status code and client-facing message
    pub fn status_and_message(&self) -> (StatusCode, String) {
        use exercise_core::Error;

        match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone()),
            ApiError::Core(err @ Error::Validation(_)) => (StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::Core(err @ Error::InvalidId(_)) => (StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::Core(err @ Error::NotFound(_)) => (StatusCode::NOT_FOUND, err.to_string()),
            ApiError::Core(err) => {
                let message = err.to_string();
                let message = if message.is_empty() {
                    "Internal Server Error".to_string()
                } else {
                    message
                };
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        }
    }
}

impl From<exercise_core::Error> for ApiError {
    fn from(err: exercise_core::Error) -> Self {
        ApiError::Core(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", message);
        } else {
            tracing::debug!("Request rejected ({}): {}", status, message);
        }
        (status, message).into_response()
    }
}
