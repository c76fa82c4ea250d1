//! Coordinated ticket routes and the ticket board
//!
//! Ticket writes here go through `TicketService`, so truck occupancy is
//! written alongside the ticket. Each route answers with one notice.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::warn;

use nakliye_app::app::{
    ticket_board, Notice, Subject, TicketService, TicketServiceError, WriteAction,
};
use nakliye_domain::model::{TicketPatch, TicketWrite};
use nakliye_domain::repository::TicketRepository;
use nakliye_infra::ApiSession;
use nakliye_types::Error;

use super::{error_response, missing_token};
use crate::cookie::access_token;
use crate::state::AppState;

fn session(state: &AppState, headers: &HeaderMap) -> Option<Arc<ApiSession>> {
    access_token(headers).map(|token| Arc::new(state.client.session(token)))
}

fn service(state: &AppState, session: Arc<ApiSession>) -> TicketService<ApiSession> {
    TicketService::with_flights(session, Arc::clone(&state.flights))
}

fn parse_body<T: serde::de::DeserializeOwned>(body: &Bytes) -> Result<T, Response> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, "unreadable ticket payload");
        error_response(StatusCode::BAD_REQUEST, &e.to_string())
    })
}

fn failure_response(err: &TicketServiceError) -> Response {
    let notice = err.notice();
    match err {
        TicketServiceError::Busy(key) => (
            StatusCode::CONFLICT,
            Json(json!({
                "title": notice.title,
                "message": notice.message,
                "error": err.to_string(),
                "inFlight": key.to_string(),
            })),
        )
            .into_response(),
        TicketServiceError::Failed(failure) => (
            StatusCode::BAD_GATEWAY,
            Json(json!({
                "title": notice.title,
                "message": notice.message,
                "step": failure.step,
                "completed": failure.completed,
                "error": failure.source.to_string(),
            })),
        )
            .into_response(),
    }
}

/// Failure reading the current ticket, before any write was attempted
fn lookup_failed(action: WriteAction, err: &Error) -> Response {
    let notice = Notice::failure(Subject::Ticket, action);
    let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::BAD_GATEWAY);
    (
        status,
        Json(json!({
            "title": notice.title,
            "message": notice.message,
            "error": err.to_string(),
        })),
    )
        .into_response()
}

pub(crate) async fn create_ticket(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(session) = session(&state, &headers) else {
        return missing_token();
    };
    let write: TicketWrite = match parse_body(&body) {
        Ok(write) => write,
        Err(response) => return response,
    };

    match service(&state, session).create(write).await {
        Ok(ticket) => (
            StatusCode::CREATED,
            Json(json!({
                "notice": Notice::success(Subject::Ticket, WriteAction::Create),
                "ticket": ticket,
            })),
        )
            .into_response(),
        Err(e) => failure_response(&e),
    }
}

pub(crate) async fn update_ticket(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(session) = session(&state, &headers) else {
        return missing_token();
    };
    let patch: TicketPatch = match parse_body(&body) {
        Ok(patch) => patch,
        Err(response) => return response,
    };
    let current = match TicketRepository::get(&*session, &id).await {
        Ok(ticket) => ticket,
        Err(e) => return lookup_failed(WriteAction::Update, &e),
    };

    // Fields left out of the body keep the ticket's current values
    let write = patch.apply_to(&current);
    match service(&state, session).update(&current, write).await {
        Ok(ticket) => Json(json!({
            "notice": Notice::success(Subject::Ticket, WriteAction::Update),
            "ticket": ticket,
        }))
        .into_response(),
        Err(e) => failure_response(&e),
    }
}

pub(crate) async fn delete_ticket(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let Some(session) = session(&state, &headers) else {
        return missing_token();
    };
    let current = match TicketRepository::get(&*session, &id).await {
        Ok(ticket) => ticket,
        Err(e) => return lookup_failed(WriteAction::Delete, &e),
    };

    match service(&state, session).delete(&current).await {
        Ok(()) => Json(json!({
            "notice": Notice::success(Subject::Ticket, WriteAction::Delete),
        }))
        .into_response(),
        Err(e) => failure_response(&e),
    }
}

pub(crate) async fn board(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some(session) = session(&state, &headers) else {
        return missing_token();
    };
    match TicketRepository::list(&*session).await {
        Ok(tickets) => Json(ticket_board(&tickets, &state.pricing, state.clock.now())).into_response(),
        Err(e) => {
            warn!(error = %e, "board query failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "An error occurred")
        }
    }
}
