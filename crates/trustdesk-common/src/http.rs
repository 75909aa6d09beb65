use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::api::error_body;
use crate::error::ErrorCode;

/// Build a JSON error response carrying the shared [`crate::api::ErrorBody`]
/// envelope, with the status derived from the code.
pub fn error_response(code: ErrorCode, message: impl Into<String>) -> axum::response::Response {
    let status =
        StatusCode::from_u16(code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(error_body(code, message))).into_response()
}
