//! Conflict detection and price computation

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::model::{BookedInterval, PriceBreakdown, PricingParameters, ProposedStay, StayEvaluation};

/// Number of nights between two dates.
///
/// Non-positive when `check_out <= check_in`, which callers treat as an
/// invalid stay.
pub fn nights_between(check_in: NaiveDate, check_out: NaiveDate) -> i64 {
    (check_out - check_in).num_days()
}

/// Whether `proposed` overlaps any booked interval.
///
/// Intervals are half-open, so checking in on the day a previous guest
/// checks out is not a conflict.
pub fn has_conflict(proposed: &ProposedStay, booked: &[BookedInterval]) -> bool {
    booked
        .iter()
        .any(|b| proposed.check_in < b.check_out && proposed.check_out > b.check_in)
}

/// Whether the calendar should disable `date`.
///
/// Only days strictly inside a booking are blocked; its check-in and
/// check-out days stay selectable for back-to-back stays.
pub fn is_date_blocked(date: NaiveDate, booked: &[BookedInterval]) -> bool {
    booked
        .iter()
        .any(|b| date > b.check_in && date < b.check_out)
}

/// Occupants above the base capacity, never negative.
pub fn extra_persons(params: &PricingParameters, occupant_count: u32) -> u32 {
    occupant_count.saturating_sub(params.base_capacity)
}

/// Price of `proposed` under `params`, or `None` when a total does not fit
/// in a `Decimal`.
///
/// A stay with no nights prices to a zero breakdown.
pub fn checked_price(
    params: &PricingParameters,
    proposed: &ProposedStay,
) -> Option<PriceBreakdown> {
    let nights = nights_between(proposed.check_in, proposed.check_out);
    if nights <= 0 {
        return Some(PriceBreakdown::zero());
    }

    let nights_dec = Decimal::from(nights);
    let extra = Decimal::from(extra_persons(params, proposed.occupant_count));

    let base_total = params.base_price_per_night.checked_mul(nights_dec)?;
    let extra_person_total = extra
        .checked_mul(params.extra_person_price)?
        .checked_mul(nights_dec)?;

    Some(PriceBreakdown {
        nights,
        base_total,
        extra_person_total,
        grand_total: base_total.checked_add(extra_person_total)?,
    })
}

/// Price of `proposed` under `params`.
///
/// Returns a zero breakdown when the stay has no nights. The occupant count
/// is not checked against `maximum_capacity` here. Totals that overflow are
/// clamped to `Decimal::MAX`; [`evaluate`] reports such stays as not
/// bookable.
pub fn calculate_price(params: &PricingParameters, proposed: &ProposedStay) -> PriceBreakdown {
    checked_price(params, proposed).unwrap_or_else(|| {
        PriceBreakdown::saturated(nights_between(proposed.check_in, proposed.check_out))
    })
}

/// Price, conflict and capacity checks for one proposed stay.
pub fn evaluate(
    params: &PricingParameters,
    proposed: &ProposedStay,
    booked: &[BookedInterval],
) -> StayEvaluation {
    let priced = checked_price(params, proposed);
    StayEvaluation {
        price_in_range: priced.is_some(),
        breakdown: priced.unwrap_or_else(|| {
            PriceBreakdown::saturated(nights_between(proposed.check_in, proposed.check_out))
        }),
        conflict: has_conflict(proposed, booked),
        valid_stay: nights_between(proposed.check_in, proposed.check_out) > 0,
        within_capacity: proposed.occupant_count >= 1
            && proposed.occupant_count <= params.maximum_capacity,
        extra_persons: extra_persons(params, proposed.occupant_count),
    }
}

/// Blocked days within `[from, to]`, in ascending order.
pub fn blocked_days(from: NaiveDate, to: NaiveDate, booked: &[BookedInterval]) -> Vec<NaiveDate> {
    from.iter_days()
        .take_while(|d| *d <= to)
        .filter(|d| is_date_blocked(*d, booked))
        .collect()
}
