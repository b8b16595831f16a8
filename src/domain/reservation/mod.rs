//! Reservation aggregate
//!
//! Reservations as served by the reservation service, the normalized
//! creation payload, and the gateway port.

pub mod model;
pub mod repository;

pub use model::{Reservation, ReservationRequest};
pub use repository::ReservationGateway;
