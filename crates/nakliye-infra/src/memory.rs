//! In-process store implementing every repository trait
//!
//! Keeps a log of the writes it receives and can be told to fail specific
//! writes, so multi-step ticket operations can be exercised step by step.

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use nakliye_domain::model::{
    Facility, FacilityWrite, Organization, OrganizationWrite, Ticket, TicketWrite, Truck,
    TruckStatus, TruckWrite,
};
use nakliye_domain::repository::{
    FacilityRepository, OrganizationRepository, TicketRepository, TruckRepository,
};
use nakliye_types::{Error, Result};

/// A write received by the store, in arrival order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteCall {
    CreateTicket,
    UpdateTicket(String),
    DeleteTicket(String),
    CreateTruck,
    UpdateTruck { id: String, status: TruckStatus },
    DeleteTruck(String),
    CreateFacility,
    UpdateFacility(String),
    DeleteFacility(String),
    CreateOrganization,
    UpdateOrganization(String),
    DeleteOrganization(String),
}

#[derive(Default)]
struct State {
    tickets: BTreeMap<String, Ticket>,
    trucks: BTreeMap<String, Truck>,
    facilities: BTreeMap<String, Facility>,
    organizations: BTreeMap<String, Organization>,
    writes: Vec<WriteCall>,
    failing_trucks: HashSet<String>,
    fail_ticket_writes: bool,
}

impl State {
    /// Ticket with its related records embedded, as the backend returns it
    fn hydrate(&self, ticket: &Ticket) -> Ticket {
        let mut ticket = ticket.clone();
        ticket.truck = ticket.truck_id.as_ref().and_then(|id| self.trucks.get(id).cloned());
        ticket.facility = ticket
            .facility_id
            .as_ref()
            .and_then(|id| self.facilities.get(id).cloned());
        ticket.organization = ticket
            .organization_id
            .as_ref()
            .and_then(|id| self.organizations.get(id).cloned());
        ticket
    }

    fn check_ticket_write(&self) -> Result<()> {
        if self.fail_ticket_writes {
            return Err(Error::Upstream {
                status: 500,
                message: "ticket write rejected".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn not_found(kind: &str, id: &str) -> Error {
    Error::NotFound(format!("{} {}", kind, id))
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_truck(&self, truck: Truck) {
        self.state.lock().await.trucks.insert(truck.id.clone(), truck);
    }

    pub async fn insert_ticket(&self, ticket: Ticket) {
        self.state.lock().await.tickets.insert(ticket.id.clone(), ticket);
    }

    pub async fn insert_facility(&self, facility: Facility) {
        self.state
            .lock()
            .await
            .facilities
            .insert(facility.id.clone(), facility);
    }

    pub async fn insert_organization(&self, organization: Organization) {
        self.state
            .lock()
            .await
            .organizations
            .insert(organization.id.clone(), organization);
    }

    /// Make every update of the given truck fail
    pub async fn fail_truck_updates(&self, truck_id: &str) {
        self.state
            .lock()
            .await
            .failing_trucks
            .insert(truck_id.to_string());
    }

    /// Make every ticket create/update/delete fail
    pub async fn fail_ticket_writes(&self, fail: bool) {
        self.state.lock().await.fail_ticket_writes = fail;
    }

    pub async fn writes(&self) -> Vec<WriteCall> {
        self.state.lock().await.writes.clone()
    }

    pub async fn truck_status(&self, truck_id: &str) -> Option<TruckStatus> {
        self.state.lock().await.trucks.get(truck_id).map(|t| t.status)
    }

    pub async fn contains_ticket(&self, ticket_id: &str) -> bool {
        self.state.lock().await.tickets.contains_key(ticket_id)
    }
}

#[async_trait]
impl TicketRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Ticket>> {
        let state = self.state.lock().await;
        let mut tickets: Vec<_> = state.tickets.values().map(|t| state.hydrate(t)).collect();
        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tickets)
    }

    async fn get(&self, id: &str) -> Result<Ticket> {
        let state = self.state.lock().await;
        state
            .tickets
            .get(id)
            .map(|t| state.hydrate(t))
            .ok_or_else(|| not_found("ticket", id))
    }

    async fn create(&self, ticket: &TicketWrite) -> Result<Ticket> {
        let mut state = self.state.lock().await;
        state.writes.push(WriteCall::CreateTicket);
        state.check_ticket_write()?;
        let now = Utc::now();
        let record = Ticket {
            id: new_id(),
            container_number: ticket.container_number.clone(),
            entry_time: ticket.entry_time,
            exit_time: ticket.exit_time,
            facility_id: ticket.facility_id.clone(),
            organization_id: ticket.organization_id.clone(),
            truck_id: ticket.truck_id.clone(),
            is_invoice_created: ticket.is_invoice_created,
            created_by_id: None,
            created_at: now,
            updated_at: now,
            truck: None,
            facility: None,
            organization: None,
        };
        state.tickets.insert(record.id.clone(), record.clone());
        Ok(state.hydrate(&record))
    }

    async fn update(&self, id: &str, ticket: &TicketWrite) -> Result<Ticket> {
        let mut state = self.state.lock().await;
        state.writes.push(WriteCall::UpdateTicket(id.to_string()));
        state.check_ticket_write()?;
        let record = state.tickets.get_mut(id).ok_or_else(|| not_found("ticket", id))?;
        record.container_number = ticket.container_number.clone();
        record.entry_time = ticket.entry_time;
        record.exit_time = ticket.exit_time;
        record.facility_id = ticket.facility_id.clone();
        record.organization_id = ticket.organization_id.clone();
        record.truck_id = ticket.truck_id.clone();
        record.is_invoice_created = ticket.is_invoice_created;
        record.updated_at = Utc::now();
        let record = record.clone();
        Ok(state.hydrate(&record))
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        state.writes.push(WriteCall::DeleteTicket(id.to_string()));
        state.check_ticket_write()?;
        state
            .tickets
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| not_found("ticket", id))
    }
}

#[async_trait]
impl TruckRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Truck>> {
        Ok(self.state.lock().await.trucks.values().cloned().collect())
    }

    async fn get(&self, id: &str) -> Result<Truck> {
        self.state
            .lock()
            .await
            .trucks
            .get(id)
            .cloned()
            .ok_or_else(|| not_found("truck", id))
    }

    async fn create(&self, truck: &TruckWrite) -> Result<Truck> {
        let mut state = self.state.lock().await;
        state.writes.push(WriteCall::CreateTruck);
        let now = Utc::now();
        let record = Truck {
            id: new_id(),
            plate_number: truck.plate_number.clone(),
            driver_name: truck.driver_name.clone(),
            driver_phone: truck.driver_phone.clone(),
            capacity: truck.capacity,
            status: truck.status,
            created_by_id: None,
            created_at: Some(now),
            updated_at: Some(now),
        };
        state.trucks.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn update(&self, id: &str, truck: &TruckWrite) -> Result<Truck> {
        let mut state = self.state.lock().await;
        state.writes.push(WriteCall::UpdateTruck {
            id: id.to_string(),
            status: truck.status,
        });
        if state.failing_trucks.contains(id) {
            return Err(Error::Upstream {
                status: 500,
                message: format!("truck {} update rejected", id),
            });
        }
        let record = state.trucks.get_mut(id).ok_or_else(|| not_found("truck", id))?;
        record.plate_number = truck.plate_number.clone();
        record.driver_name = truck.driver_name.clone();
        record.driver_phone = truck.driver_phone.clone();
        record.capacity = truck.capacity;
        record.status = truck.status;
        record.updated_at = Some(Utc::now());
        Ok(record.clone())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        state.writes.push(WriteCall::DeleteTruck(id.to_string()));
        state
            .trucks
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| not_found("truck", id))
    }
}

#[async_trait]
impl FacilityRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Facility>> {
        Ok(self.state.lock().await.facilities.values().cloned().collect())
    }

    async fn get(&self, id: &str) -> Result<Facility> {
        self.state
            .lock()
            .await
            .facilities
            .get(id)
            .cloned()
            .ok_or_else(|| not_found("facility", id))
    }

    async fn create(&self, facility: &FacilityWrite) -> Result<Facility> {
        let mut state = self.state.lock().await;
        state.writes.push(WriteCall::CreateFacility);
        let record = Facility {
            id: new_id(),
            name: facility.name.clone(),
            address: facility.address.clone(),
            city: facility.city.clone(),
            country: facility.country.clone(),
            created_by_id: None,
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        };
        state.facilities.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn update(&self, id: &str, facility: &FacilityWrite) -> Result<Facility> {
        let mut state = self.state.lock().await;
        state.writes.push(WriteCall::UpdateFacility(id.to_string()));
        let record = state
            .facilities
            .get_mut(id)
            .ok_or_else(|| not_found("facility", id))?;
        record.name = facility.name.clone();
        record.address = facility.address.clone();
        record.city = facility.city.clone();
        record.country = facility.country.clone();
        record.updated_at = Some(Utc::now());
        Ok(record.clone())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        state.writes.push(WriteCall::DeleteFacility(id.to_string()));
        state
            .facilities
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| not_found("facility", id))
    }
}

#[async_trait]
impl OrganizationRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Organization>> {
        Ok(self
            .state
            .lock()
            .await
            .organizations
            .values()
            .cloned()
            .collect())
    }

    async fn get(&self, id: &str) -> Result<Organization> {
        self.state
            .lock()
            .await
            .organizations
            .get(id)
            .cloned()
            .ok_or_else(|| not_found("organization", id))
    }

    async fn create(&self, organization: &OrganizationWrite) -> Result<Organization> {
        let mut state = self.state.lock().await;
        state.writes.push(WriteCall::CreateOrganization);
        let record = Organization {
            id: new_id(),
            name: organization.name.clone(),
            address: organization.address.clone(),
            tax_number: organization.tax_number.clone(),
            tax_office: organization.tax_office.clone(),
            invoice_address: organization.invoice_address.clone(),
            created_by_id: None,
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        };
        state.organizations.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn update(&self, id: &str, organization: &OrganizationWrite) -> Result<Organization> {
        let mut state = self.state.lock().await;
        state.writes.push(WriteCall::UpdateOrganization(id.to_string()));
        let record = state
            .organizations
            .get_mut(id)
            .ok_or_else(|| not_found("organization", id))?;
        record.name = organization.name.clone();
        record.address = organization.address.clone();
        record.tax_number = organization.tax_number.clone();
        record.tax_office = organization.tax_office.clone();
        record.invoice_address = organization.invoice_address.clone();
        record.updated_at = Some(Utc::now());
        Ok(record.clone())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        state.writes.push(WriteCall::DeleteOrganization(id.to_string()));
        state
            .organizations
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| not_found("organization", id))
    }
}
