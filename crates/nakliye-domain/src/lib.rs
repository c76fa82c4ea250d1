//! Domain layer for nakliye: models, repository traits and the pure
//! pricing/occupancy rules.

pub mod clock;
pub mod model;
pub mod repository;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use model::*;
pub use repository::{
    FacilityRepository, OrganizationRepository, TicketRepository, TruckRepository,
};
