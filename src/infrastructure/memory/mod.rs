//! In-memory adapters
//!
//! Mirror the upstream services' server-side rules closely enough to run
//! the gateway without them.

mod reservations;
mod seed;
mod villas;

pub use reservations::InMemoryReservationGateway;
pub use seed::{demo_villas, DEMO_ADMIN_ID};
pub use villas::InMemoryVillaCatalog;

use dashmap::DashSet;

use crate::auth::decode_claims;
use crate::domain::{AppResult, Credentials, DomainError};

/// User ID carried by the credential's `sub` claim
pub(crate) fn user_id_of(credentials: &Credentials) -> AppResult<i64> {
    decode_claims(credentials.token())
        .and_then(|c| c.sub.parse().ok())
        .ok_or_else(|| DomainError::Unauthorized("Could not validate credentials".into()).into())
}

pub(crate) fn require_admin(admins: &DashSet<i64>, credentials: &Credentials) -> AppResult<i64> {
    let user_id = user_id_of(credentials)?;
    if admins.contains(&user_id) {
        Ok(user_id)
    } else {
        Err(DomainError::Forbidden("Admin access required".into()).into())
    }
}
