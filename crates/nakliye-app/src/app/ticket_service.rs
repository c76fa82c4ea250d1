//! Ticket Service - ticket writes that keep truck occupancy in step
//!
//! The backend has no multi-record transactions, so each operation is run
//! as an ordered sequence of single writes:
//! - create: ticket write, then occupy the assigned truck
//! - update: release the old truck, occupy the new one, then the ticket write
//! - delete: ticket delete, then release its truck
//!
//! Nothing is rolled back. A failure reports the step that failed together
//! with the steps that had already been written.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use nakliye_domain::model::{Ticket, TicketWrite, Truck, TruckStatus, TruckWrite};
use nakliye_domain::repository::{TicketRepository, TruckRepository};
use nakliye_domain::service::{plan_create, plan_delete, plan_update, TruckStatusChange};
use nakliye_types::Error;

use super::in_flight::{FlightAction, FlightGuard, FlightKey, InFlight};
use super::notice::{Notice, Subject, WriteAction};

/// One step of a ticket operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum SagaStep {
    CreateTicket,
    UpdateTicket(String),
    DeleteTicket(String),
    /// Reading the truck record whose other fields the status write carries
    ResolveTruck(String),
    OccupyTruck(String),
    ReleaseTruck(String),
}

impl std::fmt::Display for SagaStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SagaStep::CreateTicket => write!(f, "create ticket"),
            SagaStep::UpdateTicket(id) => write!(f, "update ticket {}", id),
            SagaStep::DeleteTicket(id) => write!(f, "delete ticket {}", id),
            SagaStep::ResolveTruck(id) => write!(f, "read truck {}", id),
            SagaStep::OccupyTruck(id) => write!(f, "occupy truck {}", id),
            SagaStep::ReleaseTruck(id) => write!(f, "release truck {}", id),
        }
    }
}

#[derive(Debug, Error)]
#[error("{step} failed: {source}")]
pub struct SagaFailure {
    pub action: WriteAction,
    pub step: SagaStep,
    /// Writes that succeeded before the failure and were left in place
    pub completed: Vec<SagaStep>,
    #[source]
    pub source: Error,
}

impl SagaFailure {
    /// True when earlier writes succeeded, i.e. the records may now disagree
    pub fn is_partial(&self) -> bool {
        !self.completed.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum TicketServiceError {
    #[error("Operation already in progress: {0}")]
    Busy(FlightKey),

    #[error(transparent)]
    Failed(#[from] SagaFailure),
}

impl TicketServiceError {
    pub fn action(&self) -> WriteAction {
        match self {
            TicketServiceError::Busy(key) => match key.action {
                FlightAction::CreateTicket => WriteAction::Create,
                FlightAction::UpdateTicket => WriteAction::Update,
                FlightAction::DeleteTicket => WriteAction::Delete,
            },
            TicketServiceError::Failed(failure) => failure.action,
        }
    }

    /// The single notice shown for this failure
    pub fn notice(&self) -> Notice {
        Notice::failure(Subject::Ticket, self.action())
    }
}

impl From<TicketServiceError> for Error {
    fn from(err: TicketServiceError) -> Self {
        match err {
            TicketServiceError::Busy(key) => Error::AlreadyInFlight(key.to_string()),
            TicketServiceError::Failed(failure) => failure.source,
        }
    }
}

/// Flight target for a create, built from every field of the payload
fn fingerprint(ticket: &TicketWrite) -> String {
    let text = |v: &Option<String>| v.clone().unwrap_or_default();
    let instant = |v: Option<DateTime<Utc>>| v.map(|t| t.to_rfc3339()).unwrap_or_default();
    [
        text(&ticket.container_number),
        instant(ticket.entry_time),
        instant(ticket.exit_time),
        text(&ticket.facility_id),
        text(&ticket.organization_id),
        text(&ticket.truck_id),
        ticket.is_invoice_created.to_string(),
    ]
    .join("|")
}

/// Progress of one operation
struct Saga {
    action: WriteAction,
    completed: Vec<SagaStep>,
}

impl Saga {
    fn new(action: WriteAction) -> Self {
        Self {
            action,
            completed: Vec::new(),
        }
    }

    fn done(&mut self, step: SagaStep) {
        self.completed.push(step);
    }

    fn fail(&self, step: SagaStep, source: Error) -> SagaFailure {
        warn!(%step, completed = self.completed.len(), error = %source, "ticket operation step failed");
        SagaFailure {
            action: self.action,
            step,
            completed: self.completed.clone(),
            source,
        }
    }
}

pub struct TicketService<S> {
    store: Arc<S>,
    flights: Arc<InFlight>,
}

impl<S> TicketService<S>
where
    S: TicketRepository + TruckRepository,
{
    pub fn new(store: Arc<S>) -> Self {
        Self::with_flights(store, InFlight::new())
    }

    /// Share the in-flight set with other services (one per request on the server)
    pub fn with_flights(store: Arc<S>, flights: Arc<InFlight>) -> Self {
        Self { store, flights }
    }

    fn enter(&self, action: FlightAction, target: &str) -> Result<FlightGuard, TicketServiceError> {
        let key = FlightKey::new(action, target);
        self.flights.try_enter(key.clone()).ok_or_else(|| {
            warn!(%key, "refusing duplicate submit");
            TicketServiceError::Busy(key)
        })
    }

    /// Create a ticket and occupy its truck
    pub async fn create(&self, ticket: TicketWrite) -> Result<Ticket, TicketServiceError> {
        // Identical payloads submitted twice are the same action
        let _guard = self.enter(FlightAction::CreateTicket, &fingerprint(&ticket))?;
        let mut saga = Saga::new(WriteAction::Create);

        let mut created = TicketRepository::create(&*self.store, &ticket)
            .await
            .map_err(|e| saga.fail(SagaStep::CreateTicket, e))?;
        saga.done(SagaStep::CreateTicket);
        info!(ticket_id = %created.id, "ticket created");

        for change in plan_create(created.truck_id.as_deref()) {
            let known = created.assigned_truck().cloned();
            let truck = self.apply(&mut saga, &change, known.as_ref()).await?;
            created.truck = Some(truck);
        }
        Ok(created)
    }

    /// Update `current`, moving truck occupancy if the assigned truck changes
    pub async fn update(
        &self,
        current: &Ticket,
        ticket: TicketWrite,
    ) -> Result<Ticket, TicketServiceError> {
        let _guard = self.enter(FlightAction::UpdateTicket, &current.id)?;
        let mut saga = Saga::new(WriteAction::Update);

        let plan = plan_update(current.truck_id.as_deref(), ticket.truck_id.as_deref());
        let mut occupied = None;
        for change in &plan {
            let truck = self.apply(&mut saga, change, current.assigned_truck()).await?;
            if change.status == TruckStatus::Loaded {
                occupied = Some(truck);
            }
        }

        let step = SagaStep::UpdateTicket(current.id.clone());
        let mut updated = TicketRepository::update(&*self.store, &current.id, &ticket)
            .await
            .map_err(|e| saga.fail(step.clone(), e))?;
        saga.done(step);
        info!(ticket_id = %updated.id, truck_writes = plan.len(), "ticket updated");

        if let Some(truck) = occupied {
            updated.truck = Some(truck);
        }
        Ok(updated)
    }

    /// Delete a ticket and release the truck it held
    pub async fn delete(&self, ticket: &Ticket) -> Result<(), TicketServiceError> {
        let _guard = self.enter(FlightAction::DeleteTicket, &ticket.id)?;
        let mut saga = Saga::new(WriteAction::Delete);

        let step = SagaStep::DeleteTicket(ticket.id.clone());
        TicketRepository::delete(&*self.store, &ticket.id)
            .await
            .map_err(|e| saga.fail(step.clone(), e))?;
        saga.done(step);
        info!(ticket_id = %ticket.id, "ticket deleted");

        for change in plan_delete(ticket.truck_id.as_deref()) {
            self.apply(&mut saga, &change, ticket.assigned_truck()).await?;
        }
        Ok(())
    }

    /// Write one truck status change, carrying the truck's other fields along
    async fn apply(
        &self,
        saga: &mut Saga,
        change: &TruckStatusChange,
        known: Option<&Truck>,
    ) -> Result<Truck, SagaFailure> {
        let truck = match known.filter(|t| t.id == change.truck_id) {
            Some(truck) => truck.clone(),
            None => TruckRepository::get(&*self.store, &change.truck_id)
                .await
                .map_err(|e| saga.fail(SagaStep::ResolveTruck(change.truck_id.clone()), e))?,
        };

        let step = match change.status {
            TruckStatus::Loaded => SagaStep::OccupyTruck(change.truck_id.clone()),
            TruckStatus::Unloaded => SagaStep::ReleaseTruck(change.truck_id.clone()),
        };
        let payload = TruckWrite::with_status(&truck, change.status);
        let updated = TruckRepository::update(&*self.store, &change.truck_id, &payload)
            .await
            .map_err(|e| saga.fail(step.clone(), e))?;
        info!(truck_id = %change.truck_id, status = %change.status, "truck status written");
        saga.done(step);
        Ok(updated)
    }
}
