//! Reservation DTOs

use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::ProposedStay;

/// Reservation to create for the signed-in user
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReservationRequest {
    #[validate(range(min = 1, message = "must be a positive id"))]
    pub villa_id: i64,
    #[schema(example = "2024-03-01")]
    pub check_in_date: NaiveDate,
    #[schema(example = "2024-03-04")]
    pub check_out_date: NaiveDate,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub people_count: u32,
}

impl CreateReservationRequest {
    pub fn stay(&self) -> ProposedStay {
        ProposedStay::new(self.check_in_date, self.check_out_date, self.people_count)
    }
}
