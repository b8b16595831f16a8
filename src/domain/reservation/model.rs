//! Reservation domain entity

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::booking::{BookedInterval, ProposedStay};

/// A confirmed villa reservation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Reservation {
    pub id: i64,
    pub user_id: i64,
    pub villa_id: i64,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub people_count: u32,
    /// Price computed by the reservation service at booking time
    pub total_price: Decimal,
}

impl Reservation {
    pub fn stay(&self) -> ProposedStay {
        ProposedStay::new(self.check_in_date, self.check_out_date, self.people_count)
    }

    /// `None` for records whose dates are not a valid range
    pub fn interval(&self) -> Option<BookedInterval> {
        BookedInterval::new(self.check_in_date, self.check_out_date)
    }
}

/// Payload handed to the reservation service when a stay is submitted.
///
/// Dates serialize as `yyyy-MM-dd`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReservationRequest {
    pub villa_id: i64,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub people_count: u32,
}

impl ReservationRequest {
    pub fn from_stay(villa_id: i64, stay: &ProposedStay) -> Self {
        Self {
            villa_id,
            check_in_date: stay.check_in,
            check_out_date: stay.check_out,
            people_count: stay.occupant_count,
        }
    }
}
