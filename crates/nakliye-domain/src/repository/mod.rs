//! Repository trait definitions for the external data store

use async_trait::async_trait;

use crate::model::{
    Facility, FacilityWrite, Organization, OrganizationWrite, Ticket, TicketWrite, Truck,
    TruckWrite,
};
use nakliye_types::Result;

/// Repository for tickets
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// List all tickets
    async fn list(&self) -> Result<Vec<Ticket>>;

    /// Get a ticket by ID
    async fn get(&self, id: &str) -> Result<Ticket>;

    /// Create a ticket
    async fn create(&self, ticket: &TicketWrite) -> Result<Ticket>;

    /// Update a ticket
    async fn update(&self, id: &str, ticket: &TicketWrite) -> Result<Ticket>;

    /// Delete a ticket
    async fn delete(&self, id: &str) -> Result<()>;
}

/// Repository for trucks
#[async_trait]
pub trait TruckRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Truck>>;

    async fn get(&self, id: &str) -> Result<Truck>;

    async fn create(&self, truck: &TruckWrite) -> Result<Truck>;

    /// Rewrite a truck; the payload always carries every field
    async fn update(&self, id: &str, truck: &TruckWrite) -> Result<Truck>;

    async fn delete(&self, id: &str) -> Result<()>;
}

/// Repository for facilities
#[async_trait]
pub trait FacilityRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Facility>>;

    async fn get(&self, id: &str) -> Result<Facility>;

    async fn create(&self, facility: &FacilityWrite) -> Result<Facility>;

    async fn update(&self, id: &str, facility: &FacilityWrite) -> Result<Facility>;

    async fn delete(&self, id: &str) -> Result<()>;
}

/// Repository for organizations
#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Organization>>;

    async fn get(&self, id: &str) -> Result<Organization>;

    async fn create(&self, organization: &OrganizationWrite) -> Result<Organization>;

    async fn update(&self, id: &str, organization: &OrganizationWrite) -> Result<Organization>;

    async fn delete(&self, id: &str) -> Result<()>;
}
