//! HTTP transport
//!
//! `GET /` returns the usage text, `POST /` resolves a document. Validation
//! errors map to `400`, an expired request timeout to `504`.

pub mod app;
pub mod state;

pub use app::build_router;
pub use state::AppState;

use crate::core::BatchError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug)]
pub enum WebError {
    Batch(BatchError),
    Input(String),
    Timeout,
}

impl From<BatchError> for WebError {
    fn from(err: BatchError) -> Self {
        WebError::Batch(err)
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, message, code) = match self {
            WebError::Batch(err @ BatchError::MalformedNode { .. }) => (
                StatusCode::BAD_REQUEST,
                err.to_string(),
                "malformed_node".to_string(),
            ),
            WebError::Batch(err @ BatchError::InvalidQuery { .. }) => (
                StatusCode::BAD_REQUEST,
                err.to_string(),
                "invalid_query".to_string(),
            ),
            WebError::Input(msg) => (StatusCode::BAD_REQUEST, msg, "input_error".to_string()),
            WebError::Timeout => (
                StatusCode::GATEWAY_TIMEOUT,
                "Queries did not complete in time".to_string(),
                "timeout".to_string(),
            ),
        };

        let body = Json(ErrorResponse {
            error: message,
            code,
        });

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, WebError>;
