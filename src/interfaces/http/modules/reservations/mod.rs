//! Reservations of the signed-in user

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
