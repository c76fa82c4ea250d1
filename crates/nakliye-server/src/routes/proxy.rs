//! Pass-through routes: `/api/{resource}` and `/api/{resource}/{id}`
//!
//! The token is taken from the cookie and nothing is sent upstream without
//! one. Upstream failures are collapsed into one generic error.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, MethodRouter};
use axum::Json;
use serde_json::Value;
use tracing::warn;

use nakliye_infra::Resource;

use super::{error_response, json_body, missing_token};
use crate::cookie::access_token;
use crate::state::AppState;

pub(crate) fn collection_route(resource: Resource) -> MethodRouter<AppState> {
    any(
        move |State(state): State<AppState>, method: Method, headers: HeaderMap, body: Bytes| async move {
            let status = match method {
                Method::GET => StatusCode::OK,
                Method::POST => StatusCode::CREATED,
                _ => return method_not_allowed(),
            };
            forward(&state, method, resource.upstream_path().to_string(), &headers, &body, status).await
        },
    )
}

pub(crate) fn item_route(resource: Resource) -> MethodRouter<AppState> {
    any(
        move |State(state): State<AppState>,
              Path(id): Path<String>,
              method: Method,
              headers: HeaderMap,
              body: Bytes| async move {
            let status = match method {
                Method::GET | Method::PATCH => StatusCode::OK,
                Method::DELETE => StatusCode::NO_CONTENT,
                _ => return method_not_allowed(),
            };
            forward(&state, method, resource.item_path(&id), &headers, &body, status).await
        },
    )
}

fn method_not_allowed() -> Response {
    error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

fn upstream_failed() -> Response {
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "An error occurred")
}

async fn forward(
    state: &AppState,
    method: Method,
    path: String,
    headers: &HeaderMap,
    body: &Bytes,
    success: StatusCode,
) -> Response {
    let Some(token) = access_token(headers) else {
        return missing_token();
    };
    let body = match method {
        Method::POST | Method::PATCH => match json_body(body) {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "unreadable request body");
                return upstream_failed();
            }
        },
        _ => None,
    };

    match state
        .client
        .forward(method.clone(), &path, &token, body.as_ref())
        .await
    {
        Ok(_) if success == StatusCode::NO_CONTENT => StatusCode::NO_CONTENT.into_response(),
        Ok(value) => (success, Json(value.unwrap_or(Value::Null))).into_response(),
        Err(e) => {
            warn!(%method, %path, error = %e, "proxied request failed");
            upstream_failed()
        }
    }
}
