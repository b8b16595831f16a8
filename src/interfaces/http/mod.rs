//! HTTP REST API
//!
//! - `common`: response envelope and validated JSON extractor
//! - `modules`: handlers grouped by resource, plus request-id and metrics middleware
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod modules;
pub mod router;

pub use router::{create_api_router, ApiState};
