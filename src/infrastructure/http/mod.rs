//! HTTP adapters for the upstream villa and reservation services

mod client;
mod reservations;
mod villas;

pub use client::ServiceClient;
pub use reservations::HttpReservationGateway;
pub use villas::HttpVillaCatalog;
