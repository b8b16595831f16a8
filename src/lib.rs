//! # Villa Booking Gateway
//!
//! Backend-for-frontend for a villa rental platform: villa search,
//! availability calendars, stay price quotes and reservation submission on
//! top of the upstream villa and reservation services.
//!
//! ## Architecture
//!
//! - **domain**: villas, reservations, the booking calculator and the ports
//!   to the upstream services
//! - **application**: `BookingService`, which feeds the calculator and gates
//!   submissions
//! - **infrastructure**: reqwest adapters for the upstream services and
//!   in-memory stand-ins
//! - **interfaces**: REST API with Swagger documentation
//! - **auth**: bearer token session handling
//! - **server**: runtime used by the CLI binary

pub mod application;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};
pub use interfaces::http::{create_api_router, ApiState};
pub use server::{init_tracing, ServerHandle, ServerOptions};
