//! Stateless bearer tokens: HS256-signed JWTs carrying the subject id.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::{debug, instrument};

use quill_core::IdentityId;

use crate::claims::{TokenClaims, validate_claims};
use crate::AuthError;

/// Process-wide signing secret. Loaded once; never mutated.
#[derive(Clone)]
pub struct SigningKey {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKey {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

impl core::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}

/// A freshly minted token and its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies bearer tokens. Never touches a store.
#[derive(Debug, Clone)]
pub struct TokenService {
    key: SigningKey,
    ttl: Duration,
    validation: Validation,
}

impl TokenService {
    pub fn new(key: SigningKey, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked by `validate_claims` against an explicit clock.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self { key, ttl, validation }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, subject: IdentityId) -> Result<IssuedToken, AuthError> {
        self.issue_at(subject, Utc::now())
    }

    #[instrument(skip(self))]
    pub fn issue_at(&self, subject: IdentityId, now: DateTime<Utc>) -> Result<IssuedToken, AuthError> {
        let expires_at = now + self.ttl;
        let claims = TokenClaims::new(subject, now, expires_at);

        let access_token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.key.encoding)
            .map_err(|e| AuthError::Internal(format!("token signing failed: {e}")))?;

        debug!(jti = %claims.jti, "token issued");
        Ok(IssuedToken {
            access_token,
            expires_at,
        })
    }

    pub fn verify(&self, token: &str) -> Result<IdentityId, AuthError> {
        self.verify_at(token, Utc::now())
    }

    /// Check signature, structure and expiry; return the embedded subject.
    ///
    /// The subject is *not* checked against the identity store here.
    #[instrument(skip(self, token), err(level = "debug"))]
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<IdentityId, AuthError> {
        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.key.decoding, &self.validation)
            .map_err(|e| AuthError::TokenInvalid(e.to_string()))?;

        validate_claims(&data.claims, now)?;
        data.claims.subject()
    }
}
