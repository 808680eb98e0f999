//! Common response builders for API handlers.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use crate::errors::TodoError;

/// Returns an error response with the given status code and message.
#[must_use]
pub fn err_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Returns an error response carrying a diagnostic `details` field.
#[must_use]
pub fn err_response_with_details(status: StatusCode, message: &str, details: &str) -> Response {
    (
        status,
        Json(json!({ "error": message, "details": details })),
    )
        .into_response()
}

#[must_use]
pub fn status_for(error: &TodoError) -> StatusCode {
    match error {
        TodoError::ValidationError(_) => StatusCode::BAD_REQUEST,
        TodoError::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for TodoError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        match self {
            TodoError::ValidationError(message) => err_response(status, &message),
            TodoError::NotFound(_) => err_response(status, "Todo not found"),
            other => {
                error!("Request failed: {}", other);
                err_response_with_details(status, "Internal server error", &other.to_string())
            }
        }
    }
}
