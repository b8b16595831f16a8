//! Reservation HTTP handlers
//!
//! All routes sit behind `require_auth`; the caller's token is forwarded
//! to the reservation service unchanged.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use super::dto::CreateReservationRequest;
use crate::application::BookingService;
use crate::auth::AuthenticatedUser;
use crate::domain::{AppError, Reservation};
use crate::interfaces::http::common::{ApiResponse, ValidatedJson};

#[utoipa::path(
    post,
    path = "/api/v1/reservations",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Reservation created", body = ApiResponse<Reservation>),
        (status = 400, description = "Invalid stay"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Villa not found"),
        (status = 409, description = "Dates overlap an existing reservation"),
        (status = 422, description = "Validation failed"),
        (status = 502, description = "Reservation service unavailable")
    )
)]
pub async fn create_reservation(
    State(booking): State<Arc<BookingService>>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Reservation>>), AppError> {
    let reservation = booking
        .submit(request.villa_id, &request.stay(), &user.credentials)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(reservation))))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The caller's reservations", body = ApiResponse<Vec<Reservation>>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_my_reservations(
    State(booking): State<Arc<BookingService>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<Reservation>>>, AppError> {
    let trips = booking.my_trips(&user.credentials).await?;
    Ok(Json(ApiResponse::success(trips)))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/{id}",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation", body = ApiResponse<Reservation>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not found or not owned by the caller")
    )
)]
pub async fn get_my_reservation(
    State(booking): State<Arc<BookingService>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Reservation>>, AppError> {
    let trip = booking.my_trip(id, &user.credentials).await?;
    Ok(Json(ApiResponse::success(trip)))
}
