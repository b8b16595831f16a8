//! Villa browsing, booking calendar and price quotes (public)

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
