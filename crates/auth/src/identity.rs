//! Identity service: registration and credential verification.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use quill_core::IdentityId;

use crate::store::{IdentityStore, NewIdentity, SafeIdentity, StoreError};
use crate::{AuthError, PasswordHasher};

/// Registers identities and verifies their credentials.
///
/// Input is trusted to be pre-validated by the caller-facing boundary
/// (see [`crate::validate_registration`]); this service owns uniqueness and
/// hashing only.
#[derive(Debug, Clone)]
pub struct IdentityService<S> {
    store: S,
    hasher: PasswordHasher,
    store_timeout: Duration,
}

impl<S> IdentityService<S>
where
    S: IdentityStore,
{
    pub fn new(store: S, hasher: PasswordHasher, store_timeout: Duration) -> Self {
        Self {
            store,
            hasher,
            store_timeout,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Register a new identity and return its store-assigned id.
    #[instrument(skip(self, email, password))]
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<IdentityId, AuthError> {
        let result = self.try_register(username, email, password).await;
        if let Err(err) = &result {
            log_rejection("registration rejected", err);
        }
        result
    }

    async fn try_register(&self, username: &str, email: &str, password: &str) -> Result<IdentityId, AuthError> {
        let existing = self
            .bounded("find_by_email_or_username", self.store.find_by_email_or_username(email, username))
            .await?;

        if let Some(existing) = existing {
            if existing.username == username {
                return Err(AuthError::DuplicateUsername(username.to_string()));
            }
            if existing.email == email {
                return Err(AuthError::DuplicateEmail(email.to_string()));
            }
        }

        let password_hash = self.hash_off_thread(password.to_owned()).await?;

        let new_identity = NewIdentity {
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
        };

        // A concurrent registration can slip between the lookup and the insert;
        // the store's unique constraints are authoritative.
        let id = self
            .bounded("insert", self.store.insert(new_identity))
            .await
            .map_err(|e| match e {
                AuthError::DuplicateUsername(_) => AuthError::DuplicateUsername(username.to_string()),
                AuthError::DuplicateEmail(_) => AuthError::DuplicateEmail(email.to_string()),
                other => other,
            })?;

        info!(identity_id = %id, "identity registered");
        Ok(id)
    }

    /// Check an email/password pair and return the matching identity id.
    #[instrument(skip(self, email, password))]
    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<IdentityId, AuthError> {
        let result = self.try_verify_credentials(email, password).await;
        if let Err(err) = &result {
            log_rejection("login rejected", err);
        }
        result
    }

    async fn try_verify_credentials(&self, email: &str, password: &str) -> Result<IdentityId, AuthError> {
        let identity = self
            .bounded("find_by_email", self.store.find_by_email(email))
            .await?
            .ok_or_else(|| AuthError::IdentityNotFound(email.to_string()))?;

        let hasher = self.hasher.clone();
        let password = password.to_owned();
        let hash = identity.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AuthError::Internal(format!("password verification task failed: {e}")))?;

        if !matches {
            return Err(AuthError::InvalidCredentials);
        }

        debug!(identity_id = %identity.id, "credentials verified");
        Ok(identity.id)
    }

    /// Confirm that a previously authenticated identity still exists.
    #[instrument(skip(self), err(level = "info"))]
    pub async fn resolve_subject(&self, identity_id: IdentityId) -> Result<IdentityId, AuthError> {
        self.bounded("find_by_id", self.store.find_by_id(identity_id))
            .await?
            .map(|identity| identity.id)
            .ok_or_else(|| AuthError::IdentityNotFound(identity_id.to_string()))
    }

    /// Caller-facing profile of an identity.
    #[instrument(skip(self), err(level = "debug"))]
    pub async fn get_identity(&self, identity_id: IdentityId) -> Result<SafeIdentity, AuthError> {
        self.bounded("find_by_id", self.store.find_by_id(identity_id))
            .await?
            .map(|identity| identity.to_safe())
            .ok_or_else(|| AuthError::IdentityNotFound(identity_id.to_string()))
    }

    async fn hash_off_thread(&self, password: String) -> Result<String, AuthError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Internal(format!("password hashing task failed: {e}")))?
    }

    /// Run a store call under the configured timeout.
    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, AuthError> {
        match tokio::time::timeout(self.store_timeout, call).await {
            Ok(result) => result.map_err(AuthError::from),
            Err(_) => Err(AuthError::StoreUnavailable(format!(
                "{operation} timed out after {}ms",
                self.store_timeout.as_millis()
            ))),
        }
    }
}

/// Expected outcomes (conflicts, bad credentials) log at `info` by kind only;
/// infrastructure failures log at `warn` with their detail, which never
/// contains caller input.
fn log_rejection(action: &'static str, err: &AuthError) {
    match err {
        AuthError::StoreUnavailable(detail) | AuthError::Internal(detail) => {
            warn!(error = err.kind(), detail = %detail, "{action}");
        }
        _ => info!(error = err.kind(), "{action}"),
    }
}
