//! Authentication middleware for Axum

use axum::{
    body::Body,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use super::session::{AuthSession, SessionState};
use crate::domain::{AppError, Credentials, DomainError};

/// Authenticated caller, available to handlers via `Extension<AuthenticatedUser>`
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub credentials: Credentials,
}

/// Requires a readable, unexpired bearer token.
///
/// Rejected requests never reach the upstream services.
pub async fn require_auth(mut request: Request<Body>, next: Next) -> Response {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let mut session = AuthSession::from_authorization_header(header_value);

    match session.check_validity(Utc::now()) {
        SessionState::Authenticated { user_id } => {
            let Some(credentials) = session.credentials() else {
                return unauthorized("Missing or invalid bearer token");
            };
            request
                .extensions_mut()
                .insert(AuthenticatedUser { user_id, credentials });
            next.run(request).await
        }
        SessionState::Expired => unauthorized("Session expired, please log in again"),
        SessionState::Anonymous => unauthorized("Missing or invalid bearer token"),
    }
}

fn unauthorized(message: &str) -> Response {
    AppError::from(DomainError::Unauthorized(message.to_string())).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::tests::make_token;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Extension, Router};
    use tower::ServiceExt;

    async fn whoami(Extension(user): Extension<AuthenticatedUser>) -> String {
        user.user_id
    }

    fn app() -> Router {
        Router::new()
            .route("/me", get(whoami))
            .layer(axum::middleware::from_fn(require_auth))
    }

    async fn call(auth: Option<String>) -> StatusCode {
        let mut req = Request::builder().uri("/me");
        if let Some(value) = auth {
            req = req.header(header::AUTHORIZATION, value);
        }
        app()
            .oneshot(req.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn valid_token_passes() {
        let exp = Utc::now().timestamp() + 3600;
        let status = call(Some(format!("Bearer {}", make_token("5", exp)))).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_or_expired_token_is_401() {
        assert_eq!(call(None).await, StatusCode::UNAUTHORIZED);
        let expired = format!("Bearer {}", make_token("5", 1_000));
        assert_eq!(call(Some(expired)).await, StatusCode::UNAUTHORIZED);
        assert_eq!(call(Some("Bearer nope".into())).await, StatusCode::UNAUTHORIZED);
    }
}
