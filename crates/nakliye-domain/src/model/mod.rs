//! Domain model types

pub mod facility;
pub mod organization;
pub mod ticket;
pub mod truck;

pub use facility::{Facility, FacilityPatch, FacilityWrite};
pub use organization::{Organization, OrganizationPatch, OrganizationWrite};
pub use ticket::{Ticket, TicketPatch, TicketWrite};
pub use truck::{Truck, TruckPatch, TruckStatus, TruckWrite};

use nakliye_types::{Error, Result};

/// Reject blank required form fields with the form's own message
pub(crate) fn require(value: &str, message: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(Error::Validation(message.to_string()))
    } else {
        Ok(())
    }
}
