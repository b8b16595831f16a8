//! Admin HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::{Extension, Json};

use crate::application::BookingService;
use crate::auth::AuthenticatedUser;
use super::dto::{VillaForm, VillaUpload};
use crate::domain::{AppError, DomainError, Reservation, Villa};
use crate::interfaces::http::common::{ApiResponse, EmptyData};

#[utoipa::path(
    get,
    path = "/api/v1/admin/reservations",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Every reservation", body = ApiResponse<Vec<Reservation>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn list_all_reservations(
    State(booking): State<Arc<BookingService>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<Reservation>>>, AppError> {
    let reservations = booking.all_reservations(&user.credentials).await?;
    Ok(Json(ApiResponse::success(reservations)))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/reservations/user/{user_id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("user_id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Reservations of one user", body = ApiResponse<Vec<Reservation>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn list_user_reservations(
    State(booking): State<Arc<BookingService>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(user_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<Reservation>>>, AppError> {
    let reservations = booking
        .reservations_for_user(user_id, &user.credentials)
        .await?;
    Ok(Json(ApiResponse::success(reservations)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/reservations/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Deleted", body = ApiResponse<EmptyData>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "Reservation not found")
    )
)]
pub async fn delete_reservation(
    State(booking): State<Arc<BookingService>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<EmptyData>>, AppError> {
    booking.delete_reservation(id, &user.credentials).await?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/villas",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body(content = VillaUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Villa created", body = ApiResponse<Villa>),
        (status = 400, description = "Malformed form or missing image"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not an admin"),
        (status = 422, description = "Villa attributes out of bounds")
    )
)]
pub async fn create_villa(
    State(booking): State<Arc<BookingService>>,
    Extension(user): Extension<AuthenticatedUser>,
    form: VillaForm,
) -> Result<Json<ApiResponse<Villa>>, AppError> {
    let image = form
        .image
        .ok_or_else(|| DomainError::Validation("image: is required".into()))?;
    let villa = booking
        .create_villa(&form.input, &image, &user.credentials)
        .await?;
    Ok(Json(ApiResponse::success(villa)))
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/villas/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Villa ID")),
    request_body(content = VillaUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Villa updated", body = ApiResponse<Villa>),
        (status = 400, description = "Malformed form"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "Villa not found"),
        (status = 422, description = "Villa attributes out of bounds")
    )
)]
pub async fn update_villa(
    State(booking): State<Arc<BookingService>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
    form: VillaForm,
) -> Result<Json<ApiResponse<Villa>>, AppError> {
    let villa = booking
        .update_villa(id, &form.input, form.image.as_ref(), &user.credentials)
        .await?;
    Ok(Json(ApiResponse::success(villa)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/villas/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Villa ID")),
    responses(
        (status = 200, description = "Deleted", body = ApiResponse<EmptyData>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "Villa not found")
    )
)]
pub async fn delete_villa(
    State(booking): State<Arc<BookingService>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<EmptyData>>, AppError> {
    booking.delete_villa(id, &user.credentials).await?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}
