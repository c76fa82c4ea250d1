//! Core types for the nakliye back office

mod error;
mod types;

pub use error::*;
pub use types::*;
