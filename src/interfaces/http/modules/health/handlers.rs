//! Health check handler

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct HealthState {
    pub started_at: Arc<Instant>,
    /// `"upstream"` or `"in_memory"`
    pub backend: &'static str,
}

impl HealthState {
    pub fn new(backend: &'static str) -> Self {
        Self {
            started_at: Arc::new(Instant::now()),
            backend,
        }
    }
}

/// Service health response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub backend: String,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<HealthState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        backend: state.backend.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reports_version_and_backend() {
        let Json(body) = health_check(State(HealthState::new("in_memory"))).await;
        assert_eq!(body.status, "ok");
        assert_eq!(body.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(body.backend, "in_memory");
    }
}
