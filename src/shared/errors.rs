use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::interfaces::http::common::ApiResponse;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Upstream service unavailable: {0}")]
    UpstreamUnavailable(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        Self::NotFound {
            entity,
            field,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Infra(#[from] InfraError),
}

impl AppError {
    /// Whether this error is likely transient (connection reset, upstream 5xx)
    /// and the operation may succeed if retried.
    pub fn is_transient(&self) -> bool {
        match self {
            AppError::Domain(DomainError::UpstreamUnavailable(_)) => true,
            AppError::Infra(InfraError::Http(e)) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Domain(e) => match e {
                DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
                DomainError::Validation(_) => StatusCode::BAD_REQUEST,
                DomainError::Conflict(_) => StatusCode::CONFLICT,
                DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
                DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
                DomainError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            },
            AppError::Infra(InfraError::Config(_)) | AppError::Infra(InfraError::Io(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Infra(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (status, Json(ApiResponse::<()>::error(self.to_string()))).into_response()
    }
}

/// Result type for domain and application operations
pub type AppResult<T> = Result<T, AppError>;
