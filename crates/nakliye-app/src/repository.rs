//! Repository adapters for the backend

use std::sync::Arc;

use chrono::{DateTime, Utc};
use nakliye_infra::{ApiSession, BackendClient};
use nakliye_types::{BearerToken, Result};

use crate::config::Config;
use crate::session::SessionStore;

/// Unauthenticated client for the configured backend
pub fn backend_client(config: &Config) -> Result<BackendClient> {
    BackendClient::new(config.api_url.clone(), config.request_timeout())
}

/// Authorized session from the stored login
///
/// Fails with `MissingCredential` before anything is sent when no valid
/// login is stored.
pub fn open_session(
    config: &Config,
    sessions: &SessionStore,
    now: DateTime<Utc>,
) -> Result<Arc<ApiSession>> {
    let token = sessions.credential(now)?;
    open_session_with(config, token)
}

/// Authorized session for an explicit token
pub fn open_session_with(config: &Config, token: BearerToken) -> Result<Arc<ApiSession>> {
    Ok(Arc::new(backend_client(config)?.session(token)))
}
