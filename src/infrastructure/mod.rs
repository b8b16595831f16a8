//! Infrastructure layer - adapters for the upstream services
//!
//! - `http`: reqwest clients for the villa and reservation services
//! - `memory`: in-process stand-ins for development and tests

pub mod http;
pub mod memory;

pub use http::{HttpReservationGateway, HttpVillaCatalog, ServiceClient};
pub use memory::{InMemoryReservationGateway, InMemoryVillaCatalog};
