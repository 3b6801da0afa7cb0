use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use quill_core::IdentityId;

use crate::AuthError;

/// Bearer token claims (transport-agnostic).
///
/// Timestamps are Unix seconds, as registered JWT claims expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the identity id, in decimal.
    pub sub: String,

    /// Issued-at timestamp.
    pub iat: i64,

    /// Expiration timestamp.
    pub exp: i64,

    /// Unique token id; keeps two tokens minted in the same second distinct.
    pub jti: Uuid,
}

impl TokenClaims {
    pub fn new(subject: IdentityId, issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::now_v7(),
        }
    }

    pub fn subject(&self) -> Result<IdentityId, AuthError> {
        self.sub
            .parse()
            .map_err(|_| AuthError::TokenInvalid("malformed subject".to_string()))
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("invalid token time window (exp <= iat)")]
    InvalidTimeWindow,
}

impl From<TokenValidationError> for AuthError {
    fn from(value: TokenValidationError) -> Self {
        match value {
            TokenValidationError::Expired => AuthError::TokenExpired,
            TokenValidationError::InvalidTimeWindow => AuthError::TokenInvalid(value.to_string()),
        }
    }
}

/// Deterministically validate the claims' time window against `now`.
///
/// Note: this validates the *claims* only. Signature verification happens in
/// [`crate::TokenService`] before this is called.
pub fn validate_claims(claims: &TokenClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.exp <= claims.iat {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now.timestamp() >= claims.exp {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn claims_at(now: DateTime<Utc>, ttl: Duration) -> TokenClaims {
        TokenClaims::new(IdentityId::from_i64(1), now, now + ttl)
    }

    #[test]
    fn fresh_claims_are_valid() {
        let now = Utc::now();
        assert_eq!(validate_claims(&claims_at(now, Duration::hours(1)), now), Ok(()));
    }

    #[test]
    fn expiry_boundary_is_exclusive() {
        let now = Utc::now();
        let claims = claims_at(now, Duration::seconds(60));
        assert_eq!(validate_claims(&claims, now + Duration::seconds(59)), Ok(()));
        assert_eq!(
            validate_claims(&claims, now + Duration::seconds(60)),
            Err(TokenValidationError::Expired)
        );
    }

    #[test]
    fn inverted_window_is_rejected() {
        let now = Utc::now();
        let claims = TokenClaims::new(IdentityId::from_i64(1), now, now - Duration::seconds(1));
        assert_eq!(validate_claims(&claims, now), Err(TokenValidationError::InvalidTimeWindow));
    }

    #[test]
    fn subject_round_trips_through_decimal() {
        let claims = claims_at(Utc::now(), Duration::hours(1));
        assert_eq!(claims.subject().unwrap(), IdentityId::from_i64(1));

        let bad = TokenClaims {
            sub: "alice".into(),
            ..claims
        };
        assert!(matches!(bad.subject(), Err(AuthError::TokenInvalid(_))));
    }
}
