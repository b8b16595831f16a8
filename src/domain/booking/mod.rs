//! Booking availability and price calculation
//!
//! Pure functions over the villa's pricing parameters, the villa's existing
//! bookings and the stay the user is proposing. Nothing here fails: invalid
//! stays yield a zero breakdown, overflowing totals are clamped and
//! conflicts are reported as a flag.

pub mod calculator;
pub mod model;

pub use calculator::{
    blocked_days, calculate_price, checked_price, evaluate, extra_persons, has_conflict,
    is_date_blocked, nights_between,
};
pub use model::{BookedInterval, PriceBreakdown, PricingParameters, ProposedStay, StayEvaluation};
