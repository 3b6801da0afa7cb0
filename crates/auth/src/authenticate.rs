//! Capability interfaces that turn some input into an [`AuthenticatedSubject`].
//!
//! Two independent implementations share only the result contract: one
//! checks an email/password pair, the other a bearer token.

use std::sync::Arc;

use async_trait::async_trait;

use crate::store::IdentityStore;
use crate::{AuthError, AuthenticatedSubject, IdentityService, TokenService};

/// Produces an [`AuthenticatedSubject`] from input `I`.
#[async_trait]
pub trait Authenticator<I>: Send + Sync
where
    I: Send + 'static,
{
    async fn authenticate(&self, input: I) -> Result<AuthenticatedSubject, AuthError>;
}

/// Transient login input; never persisted.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl core::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Raw bearer token as presented by the client.
#[derive(Clone)]
pub struct BearerToken(pub String);

impl core::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

/// Email + password authentication.
pub struct PasswordAuthenticator<S> {
    identities: Arc<IdentityService<S>>,
}

impl<S> PasswordAuthenticator<S> {
    pub fn new(identities: Arc<IdentityService<S>>) -> Self {
        Self { identities }
    }
}

#[async_trait]
impl<S> Authenticator<Credentials> for PasswordAuthenticator<S>
where
    S: IdentityStore + 'static,
{
    async fn authenticate(&self, input: Credentials) -> Result<AuthenticatedSubject, AuthError> {
        let id = self
            .identities
            .verify_credentials(&input.email, &input.password)
            .await?;
        Ok(AuthenticatedSubject::new(id))
    }
}

/// Bearer token authentication.
///
/// Verifies the token (storage-free), then re-confirms the subject still
/// exists, since identities may disappear after a token was issued.
pub struct BearerAuthenticator<S> {
    tokens: Arc<TokenService>,
    identities: Arc<IdentityService<S>>,
}

impl<S> BearerAuthenticator<S> {
    pub fn new(tokens: Arc<TokenService>, identities: Arc<IdentityService<S>>) -> Self {
        Self { tokens, identities }
    }
}

#[async_trait]
impl<S> Authenticator<BearerToken> for BearerAuthenticator<S>
where
    S: IdentityStore + 'static,
{
    async fn authenticate(&self, input: BearerToken) -> Result<AuthenticatedSubject, AuthError> {
        let claimed = self.tokens.verify(&input.0)?;
        let id = self.identities.resolve_subject(claimed).await?;
        Ok(AuthenticatedSubject::new(id))
    }
}
