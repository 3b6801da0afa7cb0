//! Store doubles for unit tests.

use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use quill_core::IdentityId;

use crate::store::{Identity, IdentityStore, NewIdentity, StoreError, UniqueField};

#[derive(Debug, Default)]
pub(crate) struct MemoryIdentityStore {
    rows: RwLock<Vec<Identity>>,
    hide_from_lookups: AtomicBool,
}

impl MemoryIdentityStore {
    /// Make lookups miss while inserts still enforce uniqueness, the way a
    /// concurrent committer looks to a request that already did its lookup.
    pub(crate) fn hide_from_lookups(&self, hide: bool) {
        self.hide_from_lookups.store(hide, Ordering::SeqCst);
    }

    fn visible(&self) -> bool {
        !self.hide_from_lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn find_by_email_or_username(&self, email: &str, username: &str) -> Result<Option<Identity>, StoreError> {
        if !self.visible() {
            return Ok(None);
        }
        let rows = self.rows.read().unwrap();
        Ok(rows
            .iter()
            .find(|i| i.username == username)
            .or_else(|| rows.iter().find(|i| i.email == email))
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, StoreError> {
        Ok(self.rows.read().unwrap().iter().find(|i| i.email == email).cloned())
    }

    async fn find_by_id(&self, id: IdentityId) -> Result<Option<Identity>, StoreError> {
        Ok(self.rows.read().unwrap().iter().find(|i| i.id == id).cloned())
    }

    async fn insert(&self, identity: NewIdentity) -> Result<IdentityId, StoreError> {
        let mut rows = self.rows.write().unwrap();
        if rows.iter().any(|i| i.username == identity.username) {
            return Err(StoreError::UniqueViolation(UniqueField::Username));
        }
        if rows.iter().any(|i| i.email == identity.email) {
            return Err(StoreError::UniqueViolation(UniqueField::Email));
        }
        let id = IdentityId::from_i64(rows.len() as i64 + 1);
        rows.push(Identity {
            id,
            username: identity.username,
            email: identity.email,
            password_hash: identity.password_hash,
        });
        Ok(id)
    }
}

/// A store that never answers.
#[derive(Debug, Default)]
pub(crate) struct StalledIdentityStore;

#[async_trait]
impl IdentityStore for StalledIdentityStore {
    async fn find_by_email_or_username(&self, _email: &str, _username: &str) -> Result<Option<Identity>, StoreError> {
        std::future::pending().await
    }

    async fn find_by_email(&self, _email: &str) -> Result<Option<Identity>, StoreError> {
        std::future::pending().await
    }

    async fn find_by_id(&self, _id: IdentityId) -> Result<Option<Identity>, StoreError> {
        std::future::pending().await
    }

    async fn insert(&self, _identity: NewIdentity) -> Result<IdentityId, StoreError> {
        std::future::pending().await
    }
}
