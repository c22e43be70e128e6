use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use folio_derive::api_model;

/// Error payload returned by every endpoint.
#[api_model]
pub struct ErrorBody {
    /// Machine-readable error kind.
    pub kind: String,
    /// Human-readable description.
    pub message: String,
}

/// Builds a JSON error response with the given status.
pub fn error_response(status: StatusCode, kind: &str, message: impl Into<String>) -> Response {
    (status, Json(ErrorBody { kind: kind.to_owned(), message: message.into() })).into_response()
}
