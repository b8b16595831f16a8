//! Bearer token inspection

use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Claims read from an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl TokenClaims {
    /// Expired at or after `exp`
    pub fn is_expired_at(&self, now_ts: i64) -> bool {
        now_ts >= self.exp
    }
}

/// Decode a token's claims without verifying its signature.
///
/// Returns `None` for anything that is not a three-part JWT with a JSON
/// payload carrying `sub` and `exp`. Expiry is not checked here.
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;

    decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .ok()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    pub(crate) fn make_token(sub: &str, exp: i64) -> String {
        let claims = TokenClaims {
            sub: sub.to_string(),
            exp,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"user-service-secret"),
        )
        .unwrap()
    }

    #[test]
    fn decodes_without_knowing_the_secret() {
        let token = make_token("42", 2_000_000_000);
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.exp, 2_000_000_000);
    }

    #[test]
    fn expired_tokens_still_decode() {
        let token = make_token("7", 1_000);
        assert_eq!(decode_claims(&token).map(|c| c.exp), Some(1_000));
    }

    #[test]
    fn rejects_garbage() {
        assert!(decode_claims("").is_none());
        assert!(decode_claims("not-a-jwt").is_none());
        assert!(decode_claims("a.b.c").is_none());
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let claims = TokenClaims {
            sub: "1".into(),
            exp: 100,
        };
        assert!(!claims.is_expired_at(99));
        assert!(claims.is_expired_at(100));
    }
}
