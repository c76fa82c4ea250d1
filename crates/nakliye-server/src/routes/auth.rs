use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use nakliye_types::Error;

use crate::cookie::{access_token, clear_access_token, jwt_payload, set_access_token};
use crate::state::AppState;

#[derive(Deserialize)]
pub(crate) struct LoginRequest {
    email: String,
    password: String,
}

fn message(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "message": text }))).into_response()
}

pub(crate) async fn login(State(state): State<AppState>, body: axum::body::Bytes) -> Response {
    let request: LoginRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "unreadable login request");
            return message(StatusCode::INTERNAL_SERVER_ERROR, "Login failed");
        }
    };

    match state.client.sign_in(&request.email, &request.password).await {
        Ok(token) => {
            info!("login successful");
            (
                [(SET_COOKIE, set_access_token(&token))],
                Json(json!({ "message": "Login successful" })),
            )
                .into_response()
        }
        Err(Error::Upstream { status, .. }) => {
            warn!(status, "backend rejected credentials");
            message(StatusCode::UNAUTHORIZED, "Authentication failed")
        }
        Err(e) => {
            warn!(error = %e, "login failed");
            message(StatusCode::INTERNAL_SERVER_ERROR, "Login failed")
        }
    }
}

pub(crate) async fn check_auth(headers: HeaderMap) -> Json<Value> {
    match access_token(&headers) {
        Some(token) => Json(json!({
            "isAuthenticated": true,
            "user": jwt_payload(token.as_str()),
        })),
        None => Json(json!({ "isAuthenticated": false })),
    }
}

pub(crate) async fn logout() -> Response {
    (
        [(SET_COOKIE, clear_access_token())],
        Json(json!({ "message": "Logout successful" })),
    )
        .into_response()
}
