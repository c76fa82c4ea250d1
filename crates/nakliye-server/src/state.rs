use std::sync::Arc;

use nakliye_app::app::InFlight;
use nakliye_app::config::Config;
use nakliye_domain::service::PricingPolicy;
use nakliye_domain::{Clock, SystemClock};
use nakliye_infra::BackendClient;
use nakliye_types::Result;

/// Shared per-process state; cheap to clone into handlers
#[derive(Clone)]
pub struct AppState {
    pub client: BackendClient,
    pub pricing: PricingPolicy,
    /// Ticket writes currently running, across all requests
    pub flights: Arc<InFlight>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(client: BackendClient, pricing: PricingPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            client,
            pricing,
            flights: InFlight::new(),
            clock,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let client = BackendClient::new(config.api_url.clone(), config.request_timeout())?;
        Ok(Self::new(client, config.pricing, Arc::new(SystemClock)))
    }
}
