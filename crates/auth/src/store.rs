//! Identity records and the store port the identity service consumes.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use quill_core::IdentityId;

/// A registered identity as held by the store.
///
/// Deliberately not `Serialize`: the password hash never leaves the core.
/// Use [`Identity::to_safe`] for anything caller-facing.
#[derive(Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: IdentityId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl Identity {
    pub fn to_safe(&self) -> SafeIdentity {
        SafeIdentity {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

impl core::fmt::Debug for Identity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Identity")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// An identity about to be inserted; the store assigns the id.
#[derive(Clone, PartialEq, Eq)]
pub struct NewIdentity {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl core::fmt::Debug for NewIdentity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NewIdentity")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// Caller-facing projection of an identity (no credentials).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeIdentity {
    pub id: IdentityId,
    pub username: String,
    pub email: String,
}

/// Column guarded by a uniqueness constraint.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    Email,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store rejected a write because it would break a unique constraint.
    #[error("unique constraint violated on {0:?}")]
    UniqueViolation(UniqueField),

    /// Transient failure: connection refused, pool exhausted, timed out.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Identity persistence port.
///
/// Implementations must enforce uniqueness of `username` and `email` on
/// `insert` and report violations as [`StoreError::UniqueViolation`], since the
/// service's pre-insert lookup cannot rule out a concurrent registration.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Single lookup matching either column. When different records match the
    /// username and the email, the username match is returned.
    async fn find_by_email_or_username(&self, email: &str, username: &str) -> Result<Option<Identity>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, StoreError>;

    async fn find_by_id(&self, id: IdentityId) -> Result<Option<Identity>, StoreError>;

    async fn insert(&self, identity: NewIdentity) -> Result<IdentityId, StoreError>;
}

#[async_trait]
impl<S> IdentityStore for Arc<S>
where
    S: IdentityStore + ?Sized,
{
    async fn find_by_email_or_username(&self, email: &str, username: &str) -> Result<Option<Identity>, StoreError> {
        (**self).find_by_email_or_username(email, username).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, StoreError> {
        (**self).find_by_email(email).await
    }

    async fn find_by_id(&self, id: IdentityId) -> Result<Option<Identity>, StoreError> {
        (**self).find_by_id(id).await
    }

    async fn insert(&self, identity: NewIdentity) -> Result<IdentityId, StoreError> {
        (**self).insert(identity).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_password_hash() {
        let identity = Identity {
            id: IdentityId::from_i64(1),
            username: "alice".into(),
            email: "alice@x.com".into(),
            password_hash: "$argon2id$secret".into(),
        };
        let rendered = format!("{identity:?}");
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("$argon2id$secret"));
    }

    #[test]
    fn safe_projection_has_no_hash_field() {
        let identity = Identity {
            id: IdentityId::from_i64(1),
            username: "alice".into(),
            email: "alice@x.com".into(),
            password_hash: "$argon2id$secret".into(),
        };
        let json = serde_json::to_value(identity.to_safe()).unwrap();
        assert_eq!(json, serde_json::json!({"id": 1, "username": "alice", "email": "alice@x.com"}));
    }
}
