//! Domain services

pub mod occupancy;
pub mod pricing;

pub use occupancy::{plan_create, plan_delete, plan_update, selectable_trucks, TruckStatusChange};
pub use pricing::{quote, quote_ticket, PricingPolicy, TicketQuote, TicketStatus};
