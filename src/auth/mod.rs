//! Client-side authentication state
//!
//! The user service issues and verifies bearer tokens. This gateway only
//! reads identity and expiry from them so it can reject stale sessions
//! before calling upstream, and forwards the token unchanged.

pub mod middleware;
pub mod session;
pub mod token;

pub use middleware::{require_auth, AuthenticatedUser};
pub use session::{AuthSession, SessionState};
pub use token::{decode_claims, TokenClaims};
