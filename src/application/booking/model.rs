//! Read models produced by the booking service

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::StayEvaluation;

/// Price and availability of a proposed stay at one villa
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BookingQuote {
    pub villa_id: i64,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub people_count: u32,
    pub evaluation: StayEvaluation,
    /// `false` when the villa's booked dates could not be fetched and the
    /// stay was checked against an empty booking list
    pub availability_confirmed: bool,
}

impl BookingQuote {
    /// Submittable right now: bookable and checked against real bookings
    pub fn can_submit(&self) -> bool {
        self.availability_confirmed && self.evaluation.is_bookable()
    }
}

/// One day on the booking calendar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// Strictly inside an existing booking
    pub blocked: bool,
    /// Before today
    pub past: bool,
}

impl CalendarDay {
    pub fn selectable(&self) -> bool {
        !self.blocked && !self.past
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CalendarView {
    pub villa_id: i64,
    pub days: Vec<CalendarDay>,
    pub availability_confirmed: bool,
}
