//! Booking service: feeds the calculator from the villa and reservation
//! services and gates reservation submission.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use super::model::{BookingQuote, CalendarDay, CalendarView};
use crate::domain::booking::{self, BookedInterval, ProposedStay};
use crate::domain::{
    AppResult, Credentials, DomainError, Reservation, ReservationGateway, ReservationRequest,
    Villa, VillaCatalog, VillaFilter, VillaImage, VillaInput,
};

/// Longest calendar range served in one request
pub const MAX_CALENDAR_DAYS: i64 = 366;

pub struct BookingService {
    villas: Arc<dyn VillaCatalog>,
    reservations: Arc<dyn ReservationGateway>,
}

impl BookingService {
    pub fn new(villas: Arc<dyn VillaCatalog>, reservations: Arc<dyn ReservationGateway>) -> Self {
        Self {
            villas,
            reservations,
        }
    }

    // ── Villas ─────────────────────────────────────────────────

    pub async fn villas(&self, filter: &VillaFilter) -> AppResult<Vec<Villa>> {
        self.villas.list(filter).await
    }

    pub async fn villa(&self, id: i64) -> AppResult<Villa> {
        self.villas
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Villa", "id", id).into())
    }

    pub async fn create_villa(
        &self,
        input: &VillaInput,
        image: &VillaImage,
        credentials: &Credentials,
    ) -> AppResult<Villa> {
        let villa = self.villas.create(input, image, credentials).await?;
        info!(villa_id = villa.id, title = %villa.title, "Villa created");
        Ok(villa)
    }

    pub async fn update_villa(
        &self,
        id: i64,
        input: &VillaInput,
        image: Option<&VillaImage>,
        credentials: &Credentials,
    ) -> AppResult<Villa> {
        let villa = self.villas.update(id, input, image, credentials).await?;
        info!(villa_id = id, new_image = image.is_some(), "Villa updated");
        Ok(villa)
    }

    pub async fn delete_villa(&self, id: i64, credentials: &Credentials) -> AppResult<()> {
        self.villas.delete(id, credentials).await?;
        info!(villa_id = id, "Villa deleted");
        Ok(())
    }

    // ── Availability & price ───────────────────────────────────

    /// Well-formed booked intervals for a villa. Malformed records are
    /// skipped.
    async fn booked_intervals(&self, villa_id: i64) -> AppResult<Vec<BookedInterval>> {
        let intervals = self.reservations.booked_intervals(villa_id).await?;
        let total = intervals.len();
        let intervals: Vec<_> = intervals
            .into_iter()
            .filter(BookedInterval::is_well_formed)
            .collect();
        if intervals.len() != total {
            warn!(
                villa_id,
                skipped = total - intervals.len(),
                "Ignoring booked intervals with check-out not after check-in"
            );
        }
        Ok(intervals)
    }

    /// Booked intervals, or an empty list if they cannot be fetched.
    /// The flag tells whether the list is real.
    async fn booked_intervals_or_empty(&self, villa_id: i64) -> (Vec<BookedInterval>, bool) {
        match self.booked_intervals(villa_id).await {
            Ok(intervals) => (intervals, true),
            Err(e) => {
                warn!(villa_id, error = %e, "Booked dates unavailable, assuming no known bookings");
                (Vec::new(), false)
            }
        }
    }

    /// Price and conflict check for a stay. Never fails on the stay itself;
    /// only a missing villa is an error.
    pub async fn quote(&self, villa_id: i64, stay: &ProposedStay) -> AppResult<BookingQuote> {
        let villa = self.villa(villa_id).await?;
        let (booked, availability_confirmed) = self.booked_intervals_or_empty(villa_id).await;

        let pricing = villa.pricing();
        if !pricing.is_well_formed() {
            warn!(
                villa_id,
                base_capacity = pricing.base_capacity,
                maximum_capacity = pricing.maximum_capacity,
                base_price_per_night = %pricing.base_price_per_night,
                extra_person_price = %pricing.extra_person_price,
                "Villa has malformed pricing parameters"
            );
        }
        let evaluation = booking::evaluate(&pricing, stay, &booked);

        let outcome = if !evaluation.valid_stay {
            "invalid"
        } else if evaluation.conflict {
            "conflict"
        } else if !evaluation.price_in_range {
            "overflow"
        } else {
            "ok"
        };
        metrics::counter!("booking_quotes_total", "outcome" => outcome).increment(1);
        debug!(
            villa_id,
            nights = evaluation.breakdown.nights,
            grand_total = %evaluation.breakdown.grand_total,
            conflict = evaluation.conflict,
            "Stay evaluated"
        );

        Ok(BookingQuote {
            villa_id,
            check_in_date: stay.check_in,
            check_out_date: stay.check_out,
            people_count: stay.occupant_count,
            evaluation,
            availability_confirmed,
        })
    }

    /// Day-by-day calendar for `[from, to]`.
    pub async fn calendar(
        &self,
        villa_id: i64,
        from: NaiveDate,
        to: NaiveDate,
        today: NaiveDate,
    ) -> AppResult<CalendarView> {
        if to < from {
            return Err(DomainError::Validation("'to' must not be before 'from'".into()).into());
        }
        if booking::nights_between(from, to) >= MAX_CALENDAR_DAYS {
            return Err(DomainError::Validation(format!(
                "Calendar range is limited to {} days",
                MAX_CALENDAR_DAYS
            ))
            .into());
        }

        // 404 for unknown villas rather than an empty calendar
        self.villa(villa_id).await?;
        let (booked, availability_confirmed) = self.booked_intervals_or_empty(villa_id).await;

        let days = from
            .iter_days()
            .take_while(|d| *d <= to)
            .map(|date| CalendarDay {
                date,
                blocked: booking::is_date_blocked(date, &booked),
                past: date < today,
            })
            .collect();

        Ok(CalendarView {
            villa_id,
            days,
            availability_confirmed,
        })
    }

    // ── Reservations ───────────────────────────────────────────

    /// Validate a stay and hand it to the reservation service.
    ///
    /// Unlike [`quote`](Self::quote), this refuses to proceed when the
    /// villa's booked dates cannot be fetched.
    pub async fn submit(
        &self,
        villa_id: i64,
        stay: &ProposedStay,
        credentials: &Credentials,
    ) -> AppResult<Reservation> {
        let result = self.try_submit(villa_id, stay, credentials).await;
        let outcome = match &result {
            Ok(_) => "created",
            Err(_) => "rejected",
        };
        metrics::counter!("reservations_submitted_total", "outcome" => outcome).increment(1);
        result
    }

    async fn try_submit(
        &self,
        villa_id: i64,
        stay: &ProposedStay,
        credentials: &Credentials,
    ) -> AppResult<Reservation> {
        if booking::nights_between(stay.check_in, stay.check_out) <= 0 {
            return Err(DomainError::Validation(
                "Check-out date must be after check-in date".into(),
            )
            .into());
        }
        if stay.occupant_count < 1 {
            return Err(DomainError::Validation("People count must be at least 1".into()).into());
        }

        let villa = self.villa(villa_id).await?;
        if stay.occupant_count > villa.maximum_capacity {
            return Err(DomainError::Validation(format!(
                "People count {} exceeds maximum capacity {}",
                stay.occupant_count, villa.maximum_capacity
            ))
            .into());
        }
        if booking::checked_price(&villa.pricing(), stay).is_none() {
            return Err(
                DomainError::Validation("Stay total exceeds the supported price range".into())
                    .into(),
            );
        }

        let booked = self.booked_intervals(villa_id).await.map_err(|e| {
            warn!(villa_id, error = %e, "Cannot confirm availability, refusing to submit");
            e
        })?;
        if booking::has_conflict(stay, &booked) {
            return Err(DomainError::Conflict(
                "Selected dates overlap an existing reservation".into(),
            )
            .into());
        }

        let request = ReservationRequest::from_stay(villa_id, stay);
        let reservation = self.reservations.create(&request, credentials).await?;

        info!(
            reservation_id = reservation.id,
            villa_id,
            check_in = %reservation.check_in_date,
            check_out = %reservation.check_out_date,
            people_count = reservation.people_count,
            total_price = %reservation.total_price,
            "Reservation created"
        );

        Ok(reservation)
    }

    pub async fn my_trips(&self, credentials: &Credentials) -> AppResult<Vec<Reservation>> {
        self.reservations.list_mine(credentials).await
    }

    pub async fn my_trip(&self, id: i64, credentials: &Credentials) -> AppResult<Reservation> {
        self.reservations
            .find_mine(id, credentials)
            .await?
            .ok_or_else(|| DomainError::not_found("Reservation", "id", id).into())
    }

    // ── Admin ──────────────────────────────────────────────────

    pub async fn all_reservations(&self, credentials: &Credentials) -> AppResult<Vec<Reservation>> {
        self.reservations.list_all(credentials).await
    }

    pub async fn reservations_for_user(
        &self,
        user_id: i64,
        credentials: &Credentials,
    ) -> AppResult<Vec<Reservation>> {
        self.reservations.list_for_user(user_id, credentials).await
    }

    pub async fn delete_reservation(&self, id: i64, credentials: &Credentials) -> AppResult<()> {
        self.reservations.delete(id, credentials).await?;
        info!(reservation_id = id, "Reservation deleted");
        Ok(())
    }
}
