//! Client for the external backend API

mod client;
mod repos;

pub use client::{ApiSession, BackendClient};

/// Backend collections and their upstream paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Tickets,
    Trucks,
    Facilities,
    Organizations,
}

impl Resource {
    pub const ALL: [Resource; 4] = [
        Resource::Tickets,
        Resource::Trucks,
        Resource::Facilities,
        Resource::Organizations,
    ];

    /// Path segment on the backend (the backend names facilities in the singular)
    pub fn upstream_path(&self) -> &'static str {
        match self {
            Resource::Tickets => "/tickets",
            Resource::Trucks => "/trucks",
            Resource::Facilities => "/facility",
            Resource::Organizations => "/organizations",
        }
    }

    /// Public route segment under `/api`
    pub fn route_segment(&self) -> &'static str {
        match self {
            Resource::Tickets => "tickets",
            Resource::Trucks => "trucks",
            Resource::Facilities => "facilities",
            Resource::Organizations => "organizations",
        }
    }

    pub fn item_path(&self, id: &str) -> String {
        format!("{}/{}", self.upstream_path(), id)
    }
}
