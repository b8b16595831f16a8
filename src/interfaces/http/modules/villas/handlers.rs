//! Villa HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;

use super::dto::{CalendarQuery, QuoteRequest};
use crate::application::{BookingQuote, BookingService, CalendarView};
use crate::domain::{AppError, Villa, VillaFilter};
use crate::interfaces::http::common::{ApiResponse, ValidatedJson};

#[utoipa::path(
    get,
    path = "/api/v1/villas",
    tag = "Villas",
    params(VillaFilter),
    responses(
        (status = 200, description = "Villas matching the filter", body = ApiResponse<Vec<Villa>>),
        (status = 502, description = "Villa service unavailable")
    )
)]
pub async fn list_villas(
    State(booking): State<Arc<BookingService>>,
    Query(filter): Query<VillaFilter>,
) -> Result<Json<ApiResponse<Vec<Villa>>>, AppError> {
    let villas = booking.villas(&filter).await?;
    Ok(Json(ApiResponse::success(villas)))
}

#[utoipa::path(
    get,
    path = "/api/v1/villas/{id}",
    tag = "Villas",
    params(("id" = i64, Path, description = "Villa ID")),
    responses(
        (status = 200, description = "Villa details", body = ApiResponse<Villa>),
        (status = 404, description = "Villa not found")
    )
)]
pub async fn get_villa(
    State(booking): State<Arc<BookingService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Villa>>, AppError> {
    let villa = booking.villa(id).await?;
    Ok(Json(ApiResponse::success(villa)))
}

/// Which days can start or end a stay
#[utoipa::path(
    get,
    path = "/api/v1/villas/{id}/calendar",
    tag = "Villas",
    params(("id" = i64, Path, description = "Villa ID"), CalendarQuery),
    responses(
        (status = 200, description = "Calendar", body = ApiResponse<CalendarView>),
        (status = 400, description = "Invalid range"),
        (status = 404, description = "Villa not found")
    )
)]
pub async fn get_calendar(
    State(booking): State<Arc<BookingService>>,
    Path(id): Path<i64>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<ApiResponse<CalendarView>>, AppError> {
    let today = Utc::now().date_naive();
    let (from, to) = query.resolve(today);
    let calendar = booking.calendar(id, from, to, today).await?;
    Ok(Json(ApiResponse::success(calendar)))
}

/// Price a stay and check it against existing bookings.
///
/// Invalid or conflicting stays still return 200 with a zero breakdown and
/// the corresponding flags set.
#[utoipa::path(
    post,
    path = "/api/v1/villas/{id}/quote",
    tag = "Villas",
    params(("id" = i64, Path, description = "Villa ID")),
    request_body = QuoteRequest,
    responses(
        (status = 200, description = "Quote", body = ApiResponse<BookingQuote>),
        (status = 400, description = "Malformed body"),
        (status = 404, description = "Villa not found"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn quote_stay(
    State(booking): State<Arc<BookingService>>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<QuoteRequest>,
) -> Result<Json<ApiResponse<BookingQuote>>, AppError> {
    let quote = booking.quote(id, &request.stay()).await?;
    Ok(Json(ApiResponse::success(quote)))
}
