//! Booking value types

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Date range of an existing confirmed reservation.
///
/// Well-formed intervals satisfy `check_in < check_out`. The reservation
/// service ships them as `{ check_in_date, check_out_date }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BookedInterval {
    #[serde(rename = "check_in_date")]
    pub check_in: NaiveDate,
    #[serde(rename = "check_out_date")]
    pub check_out: NaiveDate,
}

impl BookedInterval {
    /// Returns `None` unless `check_in < check_out`.
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Option<Self> {
        let interval = Self {
            check_in,
            check_out,
        };
        interval.is_well_formed().then_some(interval)
    }

    pub fn is_well_formed(&self) -> bool {
        self.check_in < self.check_out
    }
}

/// A stay entered by the user on the booking form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedStay {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub occupant_count: u32,
}

impl ProposedStay {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate, occupant_count: u32) -> Self {
        Self {
            check_in,
            check_out,
            occupant_count,
        }
    }
}

/// Pricing and capacity attributes taken from the villa record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PricingParameters {
    pub base_capacity: u32,
    pub maximum_capacity: u32,
    pub base_price_per_night: Decimal,
    pub extra_person_price: Decimal,
}

impl PricingParameters {
    /// `1 <= base_capacity <= maximum_capacity` and neither price is negative.
    ///
    /// The calculator still runs on malformed parameters; callers decide
    /// whether to trust the result.
    pub fn is_well_formed(&self) -> bool {
        self.base_capacity >= 1
            && self.maximum_capacity >= self.base_capacity
            && !self.base_price_per_night.is_sign_negative()
            && !self.extra_person_price.is_sign_negative()
    }
}

/// Price of a stay, in the villa's currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PriceBreakdown {
    pub nights: i64,
    pub base_total: Decimal,
    pub extra_person_total: Decimal,
    pub grand_total: Decimal,
}

impl PriceBreakdown {
    pub fn zero() -> Self {
        Self {
            nights: 0,
            base_total: Decimal::ZERO,
            extra_person_total: Decimal::ZERO,
            grand_total: Decimal::ZERO,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }

    /// Breakdown for a stay whose totals do not fit in a `Decimal`.
    pub fn saturated(nights: i64) -> Self {
        Self {
            nights,
            base_total: Decimal::MAX,
            extra_person_total: Decimal::MAX,
            grand_total: Decimal::MAX,
        }
    }
}

impl Default for PriceBreakdown {
    fn default() -> Self {
        Self::zero()
    }
}

/// Everything the booking form renders for one proposed stay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct StayEvaluation {
    pub breakdown: PriceBreakdown,
    /// Overlaps an existing booking
    pub conflict: bool,
    /// Check-out is after check-in
    pub valid_stay: bool,
    /// `1 <= occupant_count <= maximum_capacity`
    pub within_capacity: bool,
    /// Occupants above the base capacity that are charged a surcharge
    pub extra_persons: u32,
    /// The totals fit in a `Decimal`. When false the breakdown is clamped to
    /// `Decimal::MAX`.
    pub price_in_range: bool,
}

impl StayEvaluation {
    /// Whether the stay may be submitted as a reservation.
    pub fn is_bookable(&self) -> bool {
        self.valid_stay && self.within_capacity && !self.conflict && self.price_in_range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn interval_rejects_empty_or_inverted_range() {
        assert!(BookedInterval::new(date(2024, 2, 10), date(2024, 2, 15)).is_some());
        assert!(BookedInterval::new(date(2024, 2, 10), date(2024, 2, 10)).is_none());
        assert!(BookedInterval::new(date(2024, 2, 15), date(2024, 2, 10)).is_none());
    }

    #[test]
    fn interval_deserializes_from_service_shape() {
        let json = r#"{"check_in_date":"2024-02-10","check_out_date":"2024-02-15"}"#;
        let interval: BookedInterval = serde_json::from_str(json).unwrap();
        assert_eq!(interval.check_in, date(2024, 2, 10));
        assert_eq!(interval.check_out, date(2024, 2, 15));
    }

    #[test]
    fn pricing_accepts_numeric_prices() {
        let json = r#"{"base_capacity":4,"maximum_capacity":8,
            "base_price_per_night":1000000.0,"extra_person_price":200000}"#;
        let params: PricingParameters = serde_json::from_str(json).unwrap();
        assert_eq!(params.base_price_per_night, Decimal::from(1_000_000));
        assert_eq!(params.extra_person_price, Decimal::from(200_000));
    }

    fn pricing() -> PricingParameters {
        PricingParameters {
            base_capacity: 4,
            maximum_capacity: 8,
            base_price_per_night: Decimal::from(1_000_000),
            extra_person_price: Decimal::from(200_000),
        }
    }

    #[test]
    fn pricing_well_formed_bounds() {
        assert!(pricing().is_well_formed());

        let mut free = pricing();
        free.base_price_per_night = Decimal::ZERO;
        free.extra_person_price = Decimal::ZERO;
        assert!(free.is_well_formed());

        let mut single = pricing();
        single.base_capacity = 1;
        single.maximum_capacity = 1;
        assert!(single.is_well_formed());

        let mut no_base = pricing();
        no_base.base_capacity = 0;
        assert!(!no_base.is_well_formed());

        let mut inverted = pricing();
        inverted.maximum_capacity = 3;
        assert!(!inverted.is_well_formed());

        let mut negative_night = pricing();
        negative_night.base_price_per_night = Decimal::from(-1);
        assert!(!negative_night.is_well_formed());

        let mut negative_extra = pricing();
        negative_extra.extra_person_price = Decimal::new(-5, 1);
        assert!(!negative_extra.is_well_formed());
    }

    #[test]
    fn zero_breakdown_is_default() {
        assert!(PriceBreakdown::default().is_zero());
    }
}
