//! Auth session state

use chrono::{DateTime, Utc};
use tracing::debug;

use super::token::{decode_claims, TokenClaims};
use crate::domain::Credentials;

/// Outcome of [`AuthSession::check_validity`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No token held
    Anonymous,
    /// The token had expired and was dropped
    Expired,
    /// Token is readable and not expired
    Authenticated { user_id: String },
}

/// Holds the current bearer token and what is known about it.
///
/// Invalid or expired tokens are dropped on the next validity check, the
/// same way a browser session clears its stored token.
#[derive(Debug, Clone, Default)]
pub struct AuthSession {
    token: Option<String>,
    claims: Option<TokenClaims>,
}

impl AuthSession {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.is_empty()),
            claims: None,
        }
    }

    /// Build from an `Authorization` header value. Anything but a
    /// `Bearer` scheme yields an anonymous session.
    pub fn from_authorization_header(value: Option<&str>) -> Self {
        let token = value
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|t| t.trim().to_string());
        Self::new(token)
    }

    /// Re-evaluate the held token against `now`.
    pub fn check_validity(&mut self, now: DateTime<Utc>) -> SessionState {
        let Some(token) = self.token.as_deref() else {
            self.claims = None;
            return SessionState::Anonymous;
        };

        let Some(claims) = decode_claims(token) else {
            debug!("Dropping unreadable token");
            self.invalidate();
            return SessionState::Anonymous;
        };

        if claims.is_expired_at(now.timestamp()) {
            debug!(user_id = %claims.sub, "Dropping expired token");
            self.invalidate();
            return SessionState::Expired;
        }

        let user_id = claims.sub.clone();
        self.claims = Some(claims);
        SessionState::Authenticated { user_id }
    }

    /// Replace the held token (e.g. after a fresh login) and re-check.
    pub fn refresh(&mut self, token: Option<String>, now: DateTime<Utc>) -> SessionState {
        *self = Self::new(token);
        self.check_validity(now)
    }

    /// Forget the token (logout).
    pub fn invalidate(&mut self) {
        self.token = None;
        self.claims = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.claims.is_some()
    }

    /// User ID from the last successful validity check
    pub fn user_id(&self) -> Option<&str> {
        self.claims.as_ref().map(|c| c.sub.as_str())
    }

    /// Credentials to forward upstream, once validated
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.token, &self.claims) {
            (Some(token), Some(_)) => Some(Credentials::bearer(token.clone())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::tests::make_token;
    use chrono::TimeZone;

    fn at(ts: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(ts, 0).unwrap()
    }

    #[test]
    fn no_token_is_anonymous() {
        let mut s = AuthSession::new(None);
        assert_eq!(s.check_validity(at(0)), SessionState::Anonymous);
        assert!(s.credentials().is_none());

        let mut s = AuthSession::new(Some(String::new()));
        assert_eq!(s.check_validity(at(0)), SessionState::Anonymous);
    }

    #[test]
    fn valid_token_authenticates() {
        let token = make_token("42", 1_000);
        let mut s = AuthSession::new(Some(token.clone()));
        assert_eq!(
            s.check_validity(at(999)),
            SessionState::Authenticated {
                user_id: "42".into()
            }
        );
        assert!(s.is_authenticated());
        assert_eq!(s.user_id(), Some("42"));
        assert_eq!(s.credentials(), Some(Credentials::bearer(token)));
    }

    #[test]
    fn expired_token_is_dropped() {
        let mut s = AuthSession::new(Some(make_token("42", 1_000)));
        assert_eq!(s.check_validity(at(1_000)), SessionState::Expired);
        assert!(!s.is_authenticated());
        // dropped, so the next check sees nothing
        assert_eq!(s.check_validity(at(0)), SessionState::Anonymous);
    }

    #[test]
    fn unreadable_token_is_dropped() {
        let mut s = AuthSession::new(Some("garbage".into()));
        assert_eq!(s.check_validity(at(0)), SessionState::Anonymous);
        assert!(s.credentials().is_none());
    }

    #[test]
    fn invalidate_clears_session() {
        let mut s = AuthSession::new(Some(make_token("42", 1_000)));
        s.check_validity(at(10));
        s.invalidate();
        assert!(!s.is_authenticated());
        assert_eq!(s.check_validity(at(10)), SessionState::Anonymous);
    }

    #[test]
    fn refresh_swaps_token() {
        let mut s = AuthSession::new(Some(make_token("1", 1_000)));
        let state = s.refresh(Some(make_token("2", 5_000)), at(2_000));
        assert_eq!(
            state,
            SessionState::Authenticated {
                user_id: "2".into()
            }
        );
    }

    #[test]
    fn parses_bearer_header() {
        let token = make_token("9", 1_000);
        let header = format!("Bearer {}", token);
        let mut s = AuthSession::from_authorization_header(Some(&header));
        assert!(matches!(
            s.check_validity(at(1)),
            SessionState::Authenticated { .. }
        ));

        let mut basic = AuthSession::from_authorization_header(Some("Basic abc"));
        assert_eq!(basic.check_validity(at(1)), SessionState::Anonymous);
    }
}
