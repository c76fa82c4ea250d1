pub(crate) mod auth;
pub(crate) mod desk;
pub(crate) mod proxy;

use axum::body::Bytes;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

pub(crate) async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `{"error": message}` with the given status
pub(crate) fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

pub(crate) fn missing_token() -> Response {
    error_response(StatusCode::UNAUTHORIZED, "Access token not found")
}

/// Request body as JSON; an empty body is `None`
pub(crate) fn json_body(body: &Bytes) -> Result<Option<Value>, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body).map(Some)
}
