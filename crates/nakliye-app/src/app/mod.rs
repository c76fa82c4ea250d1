//! Application Layer
//!
//! Orchestrates between the front ends (CLI, HTTP server) and the
//! domain/infrastructure layers.
//!
//! - `ticket_service`: ticket create/update/delete with truck occupancy upkeep
//! - `entity_service`: validated writes for trucks, facilities, organizations
//! - `query_service`: ticket board and selection lists
//! - `ticket_form`: turns form-style input (names, plates, labels) into payloads

pub mod entity_service;
pub mod in_flight;
pub mod notice;
pub mod query_service;
pub mod ticket_form;
pub mod ticket_service;

pub use entity_service::{notice_for, EntityService};
pub use in_flight::{FlightAction, FlightGuard, FlightKey, InFlight};
pub use notice::{Notice, NoticeLevel, Subject, WriteAction};
pub use query_service::{ticket_board, ticket_board_in, TicketBoardRow};
pub use ticket_form::{parse_instant, FormChoices, TicketForm};
pub use ticket_service::{SagaFailure, SagaStep, TicketService, TicketServiceError};
