//! Reservation service client

use async_trait::async_trait;

use super::client::ServiceClient;
use crate::domain::booking::BookedInterval;
use crate::domain::{
    AppError, AppResult, Credentials, DomainError, Reservation, ReservationGateway,
    ReservationRequest,
};

pub struct HttpReservationGateway {
    client: ServiceClient,
}

impl HttpReservationGateway {
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ReservationGateway for HttpReservationGateway {
    async fn booked_intervals(&self, villa_id: i64) -> AppResult<Vec<BookedInterval>> {
        self.client
            .get_optional(&format!("/reservations/villa/{}/dates", villa_id), &[], None)
            .await?
            .ok_or_else(|| DomainError::not_found("Villa", "id", villa_id).into())
    }

    async fn create(
        &self,
        request: &ReservationRequest,
        credentials: &Credentials,
    ) -> AppResult<Reservation> {
        self.client
            .post("/reservations/", request, Some(credentials))
            .await
    }

    async fn list_mine(&self, credentials: &Credentials) -> AppResult<Vec<Reservation>> {
        self.client
            .get("/reservations/", &[], Some(credentials))
            .await
    }

    async fn find_mine(&self, id: i64, credentials: &Credentials) -> AppResult<Option<Reservation>> {
        self.client
            .get_optional(&format!("/reservations/{}", id), &[], Some(credentials))
            .await
    }

    async fn list_all(&self, credentials: &Credentials) -> AppResult<Vec<Reservation>> {
        self.client
            .get("/reservations/admin/all", &[], Some(credentials))
            .await
    }

    async fn list_for_user(
        &self,
        user_id: i64,
        credentials: &Credentials,
    ) -> AppResult<Vec<Reservation>> {
        self.client
            .get(
                &format!("/reservations/admin/user/{}", user_id),
                &[],
                Some(credentials),
            )
            .await
    }

    async fn delete(&self, id: i64, credentials: &Credentials) -> AppResult<()> {
        match self
            .client
            .delete(&format!("/reservations/admin/{}", id), Some(credentials))
            .await
        {
            Err(AppError::Domain(DomainError::NotFound { .. })) => {
                Err(DomainError::not_found("Reservation", "id", id).into())
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::extract::Path;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use serde_json::json;

    use crate::shared::retry::RetryConfig;

    /// Stand-in for the reservation service on an ephemeral port
    async fn spawn_upstream() -> String {
        async fn dates(Path(villa_id): Path<i64>) -> (StatusCode, Json<serde_json::Value>) {
            if villa_id == 1 {
                (
                    StatusCode::OK,
                    Json(json!([{"check_in_date":"2024-02-10","check_out_date":"2024-02-15"}])),
                )
            } else {
                (StatusCode::NOT_FOUND, Json(json!({"detail": "Villa not found"})))
            }
        }

        async fn create(
            headers: HeaderMap,
            Json(body): Json<serde_json::Value>,
        ) -> (StatusCode, Json<serde_json::Value>) {
            if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some("Bearer t0k") {
                return (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"detail": "Could not validate credentials"})),
                );
            }
            if body["check_in_date"] == "2024-02-12" {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"detail": "Reservation dates overlap with an existing reservation"})),
                );
            }
            (
                StatusCode::OK,
                Json(json!({
                    "id": 10, "user_id": 2, "villa_id": body["villa_id"],
                    "check_in_date": body["check_in_date"],
                    "check_out_date": body["check_out_date"],
                    "people_count": body["people_count"], "total_price": 4200000.0
                })),
            )
        }

        async fn broken() -> StatusCode {
            StatusCode::INTERNAL_SERVER_ERROR
        }

        let app = Router::new()
            .route("/reservations/villa/{villa_id}/dates", get(dates))
            .route("/reservations/", post(create))
            .route("/reservations/admin/all", get(broken));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn gateway(base_url: String) -> HttpReservationGateway {
        let retry = RetryConfig {
            max_attempts: 2,
            initial_delay: Duration::from_millis(1),
            backoff_multiplier: 1.0,
            max_delay: Duration::from_millis(1),
        };
        HttpReservationGateway::new(
            ServiceClient::new("reservation", base_url, Duration::from_secs(5), retry).unwrap(),
        )
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn fetches_booked_dates() {
        let g = gateway(spawn_upstream().await);
        let booked = g.booked_intervals(1).await.unwrap();
        assert_eq!(
            booked,
            vec![BookedInterval::new(date(2024, 2, 10), date(2024, 2, 15)).unwrap()]
        );

        let err = g.booked_intervals(2).await.unwrap_err();
        assert!(matches!(err, AppError::Domain(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn posts_normalized_payload_with_bearer() {
        let g = gateway(spawn_upstream().await);
        let request = ReservationRequest {
            villa_id: 1,
            check_in_date: date(2024, 1, 1),
            check_out_date: date(2024, 1, 4),
            people_count: 6,
        };

        let created = g
            .create(&request, &Credentials::bearer("t0k"))
            .await
            .unwrap();
        assert_eq!(created.id, 10);
        assert_eq!(created.check_in_date, date(2024, 1, 1));
        assert_eq!(created.total_price, Decimal::from(4_200_000));

        let err = g
            .create(&request, &Credentials::bearer("wrong"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Domain(DomainError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn maps_upstream_errors() {
        let g = gateway(spawn_upstream().await);
        let overlapping = ReservationRequest {
            villa_id: 1,
            check_in_date: date(2024, 2, 12),
            check_out_date: date(2024, 2, 20),
            people_count: 2,
        };
        match g.create(&overlapping, &Credentials::bearer("t0k")).await {
            Err(AppError::Domain(DomainError::Validation(msg))) => {
                assert!(msg.contains("overlap"))
            }
            other => panic!("unexpected: {:?}", other),
        }

        let err = g.list_all(&Credentials::bearer("t0k")).await.unwrap_err();
        assert!(err.is_transient());
    }
}
