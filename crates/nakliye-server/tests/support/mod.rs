#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use nakliye_domain::service::PricingPolicy;
use nakliye_domain::FixedClock;
use nakliye_infra::BackendClient;
use nakliye_server::{build_router, AppState};

/// Stand-in for the external backend; records every request it receives
#[derive(Clone, Default)]
pub struct Upstream {
    calls: Arc<Mutex<Vec<String>>>,
    auth: Arc<Mutex<Vec<String>>>,
    fail_truck: Arc<Mutex<Option<String>>>,
    fail_lists: Arc<AtomicBool>,
    ticket_updates: Arc<Mutex<Vec<Value>>>,
}

impl Upstream {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn auth_headers(&self) -> Vec<String> {
        self.auth.lock().unwrap().clone()
    }

    pub fn fail_truck_updates(&self, id: &str) {
        *self.fail_truck.lock().unwrap() = Some(id.to_string());
    }

    /// Bodies of the `PATCH /tickets/{id}` calls, in order
    pub fn ticket_updates(&self) -> Vec<Value> {
        self.ticket_updates.lock().unwrap().clone()
    }

    pub fn fail_lists(&self) {
        self.fail_lists.store(true, Ordering::SeqCst);
    }
}

pub fn jwt(claims: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{}.{}.sig", header, body)
}

pub fn truck_json(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "plateNumber": format!("34 {} 01", id.to_uppercase()),
        "driverName": "Ali",
        "driverPhone": "05550000000",
        "capacity": "22",
        "status": status,
        "createdAt": "2024-01-01T00:00:00.000Z",
        "updatedAt": "2024-01-01T00:00:00.000Z"
    })
}

pub fn ticket_json(id: &str, truck_id: Option<&str>) -> Value {
    json!({
        "id": id,
        "containerNumber": "MSCU1234567",
        "entryTime": "2024-01-01T08:00:00.000Z",
        "exitTime": null,
        "facilityId": null,
        "organizationId": null,
        "truckId": truck_id,
        "isInvoiceCreated": false,
        "createdAt": "2024-01-01T08:00:00.000Z",
        "updatedAt": "2024-01-01T08:00:00.000Z",
        "truck": truck_id.map(|t| truck_json(t, "LOADED")),
    })
}

async fn record(State(upstream): State<Upstream>, request: Request<Body>, next: Next) -> Response {
    upstream
        .calls
        .lock()
        .unwrap()
        .push(format!("{} {}", request.method(), request.uri().path()));
    if let Some(auth) = request.headers().get("authorization").and_then(|v| v.to_str().ok()) {
        upstream.auth.lock().unwrap().push(auth.to_string());
    }
    next.run(request).await
}

fn upstream_router(upstream: Upstream) -> Router {
    Router::new()
        .route(
            "/auth/signin",
            post(|Json(body): Json<Value>| async move {
                if body["password"] == "secret" {
                    let token = jwt(&json!({"sub": "u1", "email": body["email"]}));
                    (StatusCode::CREATED, Json(json!({ "access_token": token })))
                } else {
                    (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Unauthorized" })))
                }
            }),
        )
        .route(
            "/tickets",
            get(|State(u): State<Upstream>| async move {
                if u.fail_lists.load(Ordering::SeqCst) {
                    return StatusCode::INTERNAL_SERVER_ERROR.into_response();
                }
                Json(json!([ticket_json("tk1", Some("t1"))])).into_response()
            })
            .post(|Json(body): Json<Value>| async move {
                let mut ticket = ticket_json("tk-new", body["truckId"].as_str());
                // a freshly created ticket comes back without embeds
                ticket["truck"] = Value::Null;
                (StatusCode::CREATED, Json(ticket))
            }),
        )
        .route(
            "/tickets/{id}",
            get(|Path(id): Path<String>| async move {
                if id == "missing" {
                    return (StatusCode::NOT_FOUND, Json(json!({"message": "Ticket not found"})))
                        .into_response();
                }
                Json(ticket_json(&id, Some("t1"))).into_response()
            })
            .patch(
                |State(u): State<Upstream>, Path(id): Path<String>, Json(body): Json<Value>| async move {
                    u.ticket_updates.lock().unwrap().push(body.clone());
                    let mut ticket = ticket_json(&id, body["truckId"].as_str());
                    ticket["isInvoiceCreated"] = body["isInvoiceCreated"].clone();
                    Json(ticket)
                },
            )
            .delete(|| async { StatusCode::NO_CONTENT }),
        )
        .route(
            "/trucks",
            get(|| async { Json(json!([truck_json("t1", "LOADED"), truck_json("t2", "UNLOADED")])) }),
        )
        .route(
            "/trucks/{id}",
            get(|Path(id): Path<String>| async move { Json(truck_json(&id, "UNLOADED")) }).patch(
                |State(u): State<Upstream>, Path(id): Path<String>, Json(body): Json<Value>| async move {
                    if u.fail_truck.lock().unwrap().as_deref() == Some(id.as_str()) {
                        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
                    }
                    let status = body["status"].as_str().unwrap_or("UNLOADED").to_string();
                    Json(truck_json(&id, &status)).into_response()
                },
            ),
        )
        .route("/facility", get(|| async { Json(json!([])) }))
        .route(
            "/organizations",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        )
        .layer(axum::middleware::from_fn_with_state(upstream.clone(), record))
        .with_state(upstream)
}

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve") });
    format!("http://{}", addr)
}

pub struct Harness {
    pub base: String,
    pub upstream: Upstream,
    pub http: reqwest::Client,
}

impl Harness {
    pub async fn start(now: DateTime<Utc>) -> Self {
        let upstream = Upstream::default();
        let upstream_base = spawn(upstream_router(upstream.clone())).await;

        let client = BackendClient::new(upstream_base, Duration::from_secs(5)).expect("client");
        let state = AppState::new(client, PricingPolicy::default(), Arc::new(FixedClock(now)));
        let base = spawn(build_router(state)).await;

        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("http client");
        Self { base, upstream, http }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn authed(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, self.url(path))
            .header("cookie", "access_token=tok-1")
    }
}
