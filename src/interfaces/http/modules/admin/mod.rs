//! Admin operations; the upstream services decide who is an admin

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
