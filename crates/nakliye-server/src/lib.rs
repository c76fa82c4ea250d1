//! HTTP front for the nakliye backend
//!
//! Browser-facing routes under `/api` that keep the bearer token in an
//! HttpOnly cookie and forward to the backend, plus coordinated ticket
//! routes that keep truck occupancy in step.

pub mod cookie;
mod request_tracing;
mod routes;
mod state;

use axum::routing::{get, patch, post};
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use nakliye_app::config::Config;
use nakliye_infra::Resource;
use nakliye_types::Result;

pub use state::AppState;

/// Install the global subscriber; `RUST_LOG` overrides `default_level`
pub fn init_tracing(log_json: bool, default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let registry = tracing_subscriber::registry().with(filter);
    let result = if log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };
    if let Err(e) = result {
        eprintln!("tracing already initialised: {}", e);
    }
}

/// Bind `config.bind` and serve until the process is stopped
pub async fn serve(config: &Config) -> Result<()> {
    let state = AppState::from_config(config)?;
    let listener = TcpListener::bind(&config.bind).await?;
    info!(addr = %listener.local_addr()?, upstream = %config.api_url, "nakliye server listening");
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/healthz", get(routes::healthz))
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/auth/check-auth", get(routes::auth::check_auth))
        .route("/api/auth/logout", post(routes::auth::logout))
        .route("/api/desk/board", get(routes::desk::board))
        .route("/api/desk/tickets", post(routes::desk::create_ticket))
        .route(
            "/api/desk/tickets/{id}",
            patch(routes::desk::update_ticket).delete(routes::desk::delete_ticket),
        );

    for resource in Resource::ALL {
        router = router
            .route(
                &format!("/api/{}", resource.route_segment()),
                routes::proxy::collection_route(resource),
            )
            .route(
                &format!("/api/{}/{{id}}", resource.route_segment()),
                routes::proxy::item_route(resource),
            );
    }

    router
        .layer(axum::middleware::from_fn(request_tracing::request_tracing_middleware))
        .with_state(state)
}
