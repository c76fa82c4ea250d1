//! Repository implementations over the backend API

use async_trait::async_trait;
use reqwest::Method;

use super::{ApiSession, Resource};
use nakliye_domain::model::{
    Facility, FacilityWrite, Organization, OrganizationWrite, Ticket, TicketWrite, Truck,
    TruckWrite,
};
use nakliye_domain::repository::{
    FacilityRepository, OrganizationRepository, TicketRepository, TruckRepository,
};
use nakliye_types::Result;

#[async_trait]
impl TicketRepository for ApiSession {
    async fn list(&self) -> Result<Vec<Ticket>> {
        self.fetch(Resource::Tickets.upstream_path()).await
    }

    async fn get(&self, id: &str) -> Result<Ticket> {
        self.fetch(&Resource::Tickets.item_path(id)).await
    }

    async fn create(&self, ticket: &TicketWrite) -> Result<Ticket> {
        self.write(Method::POST, Resource::Tickets.upstream_path(), ticket)
            .await
    }

    async fn update(&self, id: &str, ticket: &TicketWrite) -> Result<Ticket> {
        self.write(Method::PATCH, &Resource::Tickets.item_path(id), ticket)
            .await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.remove(&Resource::Tickets.item_path(id)).await
    }
}

#[async_trait]
impl TruckRepository for ApiSession {
    async fn list(&self) -> Result<Vec<Truck>> {
        self.fetch(Resource::Trucks.upstream_path()).await
    }

    async fn get(&self, id: &str) -> Result<Truck> {
        self.fetch(&Resource::Trucks.item_path(id)).await
    }

    async fn create(&self, truck: &TruckWrite) -> Result<Truck> {
        self.write(Method::POST, Resource::Trucks.upstream_path(), truck)
            .await
    }

    async fn update(&self, id: &str, truck: &TruckWrite) -> Result<Truck> {
        self.write(Method::PATCH, &Resource::Trucks.item_path(id), truck)
            .await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.remove(&Resource::Trucks.item_path(id)).await
    }
}

#[async_trait]
impl FacilityRepository for ApiSession {
    async fn list(&self) -> Result<Vec<Facility>> {
        self.fetch(Resource::Facilities.upstream_path()).await
    }

    async fn get(&self, id: &str) -> Result<Facility> {
        self.fetch(&Resource::Facilities.item_path(id)).await
    }

    async fn create(&self, facility: &FacilityWrite) -> Result<Facility> {
        self.write(Method::POST, Resource::Facilities.upstream_path(), facility)
            .await
    }

    async fn update(&self, id: &str, facility: &FacilityWrite) -> Result<Facility> {
        self.write(Method::PATCH, &Resource::Facilities.item_path(id), facility)
            .await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.remove(&Resource::Facilities.item_path(id)).await
    }
}

#[async_trait]
impl OrganizationRepository for ApiSession {
    async fn list(&self) -> Result<Vec<Organization>> {
        self.fetch(Resource::Organizations.upstream_path()).await
    }

    async fn get(&self, id: &str) -> Result<Organization> {
        self.fetch(&Resource::Organizations.item_path(id)).await
    }

    async fn create(&self, organization: &OrganizationWrite) -> Result<Organization> {
        self.write(
            Method::POST,
            Resource::Organizations.upstream_path(),
            organization,
        )
        .await
    }

    async fn update(&self, id: &str, organization: &OrganizationWrite) -> Result<Organization> {
        self.write(
            Method::PATCH,
            &Resource::Organizations.item_path(id),
            organization,
        )
        .await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.remove(&Resource::Organizations.item_path(id)).await
    }
}
