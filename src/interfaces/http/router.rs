//! API Router with Swagger UI

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, FromRef},
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{BookingQuote, BookingService, CalendarDay, CalendarView};
use crate::auth::require_auth;
use crate::domain::{
    BookedInterval, PriceBreakdown, Reservation, StayEvaluation, Villa, VillaInput,
};
use crate::interfaces::http::common::{ApiResponse, EmptyData};

use super::modules::health::HealthState;
use super::modules::metrics::{http_metrics_middleware, prometheus_metrics, MetricsState};
use super::modules::request_id::request_id_middleware;
use super::modules::{admin, health, reservations, villas};

/// Shared state; handlers pick their part through `FromRef`.
#[derive(Clone, FromRef)]
pub struct ApiState {
    pub booking: Arc<BookingService>,
    pub health: HealthState,
}

impl ApiState {
    pub fn new(booking: Arc<BookingService>, backend: &'static str) -> Self {
        Self {
            booking,
            health: HealthState::new(backend),
        }
    }
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token issued by the authentication service"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        villas::list_villas,
        villas::get_villa,
        villas::get_calendar,
        villas::quote_stay,
        reservations::create_reservation,
        reservations::list_my_reservations,
        reservations::get_my_reservation,
        admin::list_all_reservations,
        admin::list_user_reservations,
        admin::delete_reservation,
        admin::create_villa,
        admin::update_villa,
        admin::delete_villa,
    ),
    components(
        schemas(
            ApiResponse<String>,
            EmptyData,
            health::HealthResponse,
            Villa,
            VillaInput,
            admin::VillaUpload,
            Reservation,
            BookedInterval,
            PriceBreakdown,
            StayEvaluation,
            BookingQuote,
            CalendarDay,
            CalendarView,
            villas::QuoteRequest,
            reservations::CreateReservationRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Villas", description = "Villa search, calendar and price quotes"),
        (name = "Reservations", description = "Reservations of the signed-in user"),
        (name = "Admin", description = "Reservation and villa administration")
    ),
    info(
        title = "Villa Booking API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Availability checks, price quotes and reservations for villa stays"
    )
)]
pub struct ApiDoc;

/// Build the full HTTP application.
///
/// `metrics` is `None` when no Prometheus recorder is installed (tests);
/// `/metrics` is then not routed.
pub fn create_api_router(state: ApiState, metrics: Option<PrometheusHandle>) -> Router {
    let villa_routes = Router::new()
        .route("/", get(villas::list_villas))
        .route("/{id}", get(villas::get_villa))
        .route("/{id}/calendar", get(villas::get_calendar))
        .route("/{id}/quote", post(villas::quote_stay));

    let reservation_routes = Router::new()
        .route(
            "/",
            get(reservations::list_my_reservations).post(reservations::create_reservation),
        )
        .route("/{id}", get(reservations::get_my_reservation))
        .route_layer(middleware::from_fn(require_auth));

    let admin_routes = Router::new()
        .route("/reservations", get(admin::list_all_reservations))
        .route(
            "/reservations/user/{user_id}",
            get(admin::list_user_reservations),
        )
        .route("/reservations/{id}", delete(admin::delete_reservation))
        .route("/villas", post(admin::create_villa))
        .route(
            "/villas/{id}",
            put(admin::update_villa).delete(admin::delete_villa),
        )
        .route_layer(middleware::from_fn(require_auth))
        .layer(DefaultBodyLimit::max(admin::MAX_VILLA_FORM_BYTES));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes =
        SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi());

    let mut router = Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1/villas", villa_routes)
        .nest("/api/v1/reservations", reservation_routes)
        .nest("/api/v1/admin", admin_routes)
        .with_state(state);

    if let Some(handle) = metrics {
        router = router.route(
            "/metrics",
            get(prometheus_metrics).with_state(MetricsState { handle }),
        );
    }

    router
        .route_layer(middleware::from_fn(http_metrics_middleware))
        .merge(swagger_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
}
