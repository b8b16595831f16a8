//! In-memory reservation service

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::{DashMap, DashSet};
use rust_decimal::Decimal;
use tokio::sync::Mutex;

use super::{require_admin, user_id_of};
use crate::domain::booking::{self, BookedInterval};
use crate::domain::{
    AppResult, Credentials, DomainError, Reservation, ReservationGateway, ReservationRequest,
    VillaCatalog,
};

pub struct InMemoryReservationGateway {
    villas: Arc<dyn VillaCatalog>,
    reservations: DashMap<i64, Reservation>,
    admins: DashSet<i64>,
    counter: AtomicI64,
    available: AtomicBool,
    /// Held across the overlap check and the insert in `create`
    write_lock: Mutex<()>,
}

impl InMemoryReservationGateway {
    pub fn new(villas: Arc<dyn VillaCatalog>) -> Self {
        Self {
            villas,
            reservations: DashMap::new(),
            admins: DashSet::new(),
            counter: AtomicI64::new(1),
            available: AtomicBool::new(true),
            write_lock: Mutex::new(()),
        }
    }

    pub fn grant_admin(&self, user_id: i64) {
        self.admins.insert(user_id);
    }

    /// Simulate the service going down (`false`) or coming back (`true`)
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Seed an existing reservation without any checks. The price is left
    /// at zero.
    pub fn insert_booking(
        &self,
        villa_id: i64,
        user_id: i64,
        check_in_date: NaiveDate,
        check_out_date: NaiveDate,
        people_count: u32,
    ) -> Reservation {
        let reservation = Reservation {
            id: self.next_id(),
            user_id,
            villa_id,
            check_in_date,
            check_out_date,
            people_count,
            total_price: Decimal::ZERO,
        };
        self.reservations.insert(reservation.id, reservation.clone());
        reservation
    }

    fn next_id(&self) -> i64 {
        self.counter.fetch_add(1, Ordering::SeqCst)
    }

    fn ensure_available(&self) -> AppResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DomainError::UpstreamUnavailable("reservation service is down".into()).into())
        }
    }

    fn sorted(&self, keep: impl Fn(&Reservation) -> bool) -> Vec<Reservation> {
        let mut list: Vec<Reservation> = self
            .reservations
            .iter()
            .filter(|entry| keep(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        list.sort_by_key(|r| r.id);
        list
    }
}

#[async_trait]
impl ReservationGateway for InMemoryReservationGateway {
    async fn booked_intervals(&self, villa_id: i64) -> AppResult<Vec<BookedInterval>> {
        self.ensure_available()?;
        if self.villas.find_by_id(villa_id).await?.is_none() {
            return Err(DomainError::not_found("Villa", "id", villa_id).into());
        }
        Ok(self
            .sorted(|r| r.villa_id == villa_id)
            .into_iter()
            .map(|r| BookedInterval {
                check_in: r.check_in_date,
                check_out: r.check_out_date,
            })
            .collect())
    }

    async fn create(
        &self,
        request: &ReservationRequest,
        credentials: &Credentials,
    ) -> AppResult<Reservation> {
        self.ensure_available()?;
        let user_id = user_id_of(credentials)?;

        if request.check_in_date >= request.check_out_date {
            return Err(DomainError::Validation(
                "Invalid dates: check-in must be before check-out".into(),
            )
            .into());
        }

        let villa = self
            .villas
            .find_by_id(request.villa_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Villa", "id", request.villa_id))?;

        if request.people_count > villa.maximum_capacity {
            return Err(
                DomainError::Validation("People count exceeds maximum capacity".into()).into(),
            );
        }

        let stay = booking::ProposedStay::new(
            request.check_in_date,
            request.check_out_date,
            request.people_count,
        );

        let _guard = self.write_lock.lock().await;
        let existing: Vec<BookedInterval> = self
            .sorted(|r| r.villa_id == request.villa_id)
            .iter()
            .filter_map(Reservation::interval)
            .collect();
        if booking::has_conflict(&stay, &existing) {
            return Err(DomainError::Conflict(
                "Reservation dates overlap with an existing reservation".into(),
            )
            .into());
        }

        let reservation = Reservation {
            id: self.next_id(),
            user_id,
            villa_id: request.villa_id,
            check_in_date: request.check_in_date,
            check_out_date: request.check_out_date,
            people_count: request.people_count,
            total_price: booking::calculate_price(&villa.pricing(), &stay).grand_total,
        };
        self.reservations.insert(reservation.id, reservation.clone());
        Ok(reservation)
    }

    async fn list_mine(&self, credentials: &Credentials) -> AppResult<Vec<Reservation>> {
        self.ensure_available()?;
        let user_id = user_id_of(credentials)?;
        Ok(self.sorted(|r| r.user_id == user_id))
    }

    async fn find_mine(&self, id: i64, credentials: &Credentials) -> AppResult<Option<Reservation>> {
        self.ensure_available()?;
        let user_id = user_id_of(credentials)?;
        Ok(self
            .reservations
            .get(&id)
            .filter(|r| r.user_id == user_id)
            .map(|r| r.clone()))
    }

    async fn list_all(&self, credentials: &Credentials) -> AppResult<Vec<Reservation>> {
        self.ensure_available()?;
        require_admin(&self.admins, credentials)?;
        Ok(self.sorted(|_| true))
    }

    async fn list_for_user(
        &self,
        user_id: i64,
        credentials: &Credentials,
    ) -> AppResult<Vec<Reservation>> {
        self.ensure_available()?;
        require_admin(&self.admins, credentials)?;
        Ok(self.sorted(|r| r.user_id == user_id))
    }

    async fn delete(&self, id: i64, credentials: &Credentials) -> AppResult<()> {
        self.ensure_available()?;
        require_admin(&self.admins, credentials)?;
        self.reservations
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("Reservation", "id", id).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::tests::make_token;
    use crate::domain::villa::model::tests::sample_villa;
    use crate::domain::AppError;
    use crate::infrastructure::memory::InMemoryVillaCatalog;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn creds(user_id: i64) -> Credentials {
        Credentials::bearer(make_token(&user_id.to_string(), i64::MAX / 2))
    }

    fn gateway() -> InMemoryReservationGateway {
        let catalog = Arc::new(InMemoryVillaCatalog::new(vec![sample_villa(1)]));
        let gateway = InMemoryReservationGateway::new(catalog);
        gateway.grant_admin(1);
        gateway
    }

    fn request(check_in: NaiveDate, check_out: NaiveDate, people: u32) -> ReservationRequest {
        ReservationRequest {
            villa_id: 1,
            check_in_date: check_in,
            check_out_date: check_out,
            people_count: people,
        }
    }

    #[tokio::test]
    async fn create_prices_and_rejects_overlap() {
        let g = gateway();
        let r = g
            .create(&request(date(2024, 1, 1), date(2024, 1, 4), 6), &creds(2))
            .await
            .unwrap();
        assert_eq!(r.total_price, Decimal::from(4_200_000));

        let err = g
            .create(&request(date(2024, 1, 3), date(2024, 1, 5), 1), &creds(3))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Domain(DomainError::Conflict(_))));

        // back-to-back is fine
        g.create(&request(date(2024, 1, 4), date(2024, 1, 5), 1), &creds(3))
            .await
            .unwrap();
        assert_eq!(g.booked_intervals(1).await.unwrap().len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_overlapping_creates_admit_one() {
        let g = Arc::new(gateway());
        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let g = Arc::clone(&g);
                tokio::spawn(async move {
                    g.create(&request(date(2024, 6, 1), date(2024, 6, 5), 2), &creds(10 + i))
                        .await
                })
            })
            .collect();

        let mut created = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => created += 1,
                Err(err) => assert!(matches!(err, AppError::Domain(DomainError::Conflict(_)))),
            }
        }
        assert_eq!(created, 1);
        assert_eq!(g.list_all(&creds(1)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn users_only_see_their_reservations() {
        let g = gateway();
        let mine = g.insert_booking(1, 2, date(2024, 3, 1), date(2024, 3, 3), 2);
        g.insert_booking(1, 3, date(2024, 4, 1), date(2024, 4, 3), 2);

        assert_eq!(g.list_mine(&creds(2)).await.unwrap(), vec![mine.clone()]);
        assert_eq!(g.find_mine(mine.id, &creds(2)).await.unwrap(), Some(mine.clone()));
        assert_eq!(g.find_mine(mine.id, &creds(3)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn admin_operations_require_admin() {
        let g = gateway();
        let r = g.insert_booking(1, 2, date(2024, 3, 1), date(2024, 3, 3), 2);

        assert!(matches!(
            g.list_all(&creds(2)).await.unwrap_err(),
            AppError::Domain(DomainError::Forbidden(_))
        ));
        assert_eq!(g.list_all(&creds(1)).await.unwrap().len(), 1);
        assert_eq!(g.list_for_user(2, &creds(1)).await.unwrap().len(), 1);
        g.delete(r.id, &creds(1)).await.unwrap();
        assert!(g.list_all(&creds(1)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unreadable_credentials_are_unauthorized() {
        let g = gateway();
        let err = g
            .list_mine(&Credentials::bearer("junk"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Domain(DomainError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn unknown_villa_has_no_dates() {
        let g = gateway();
        assert!(g.booked_intervals(77).await.is_err());
    }
}
