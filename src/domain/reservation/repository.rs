//! Reservation service interface

use async_trait::async_trait;

use super::model::{Reservation, ReservationRequest};
use crate::domain::booking::BookedInterval;
use crate::domain::{AppResult, Credentials};

#[async_trait]
pub trait ReservationGateway: Send + Sync {
    /// Date ranges of all reservations for a villa (no ordering guaranteed)
    async fn booked_intervals(&self, villa_id: i64) -> AppResult<Vec<BookedInterval>>;

    /// Create a reservation on behalf of the credential's user
    async fn create(
        &self,
        request: &ReservationRequest,
        credentials: &Credentials,
    ) -> AppResult<Reservation>;

    /// Reservations owned by the credential's user
    async fn list_mine(&self, credentials: &Credentials) -> AppResult<Vec<Reservation>>;

    /// One reservation owned by the credential's user
    async fn find_mine(&self, id: i64, credentials: &Credentials) -> AppResult<Option<Reservation>>;

    /// All reservations (admin)
    async fn list_all(&self, credentials: &Credentials) -> AppResult<Vec<Reservation>>;

    /// Reservations of a given user (admin)
    async fn list_for_user(
        &self,
        user_id: i64,
        credentials: &Credentials,
    ) -> AppResult<Vec<Reservation>>;

    /// Delete a reservation (admin)
    async fn delete(&self, id: i64, credentials: &Credentials) -> AppResult<()>;
}
