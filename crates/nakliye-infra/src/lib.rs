//! Infrastructure layer
//!
//! Concrete implementations of the domain repository traits: the HTTP
//! client for the external backend, and an in-process store.

pub mod http;
pub mod memory;

pub use http::{ApiSession, BackendClient, Resource};
pub use memory::{MemoryStore, WriteCall};
