use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use quill_auth::{Identity, IdentityStore, NewIdentity, StoreError, UniqueField};
use quill_core::IdentityId;

/// In-memory identity store for tests/dev.
///
/// Uniqueness of username and email is enforced under the write lock, so
/// concurrent inserts behave like a database with unique constraints.
#[derive(Debug, Default)]
pub struct InMemoryIdentityStore {
    inner: RwLock<Rows>,
}

#[derive(Debug, Default)]
struct Rows {
    next_id: i64,
    by_id: BTreeMap<IdentityId, Identity>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Rows>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn find_by_email_or_username(&self, email: &str, username: &str) -> Result<Option<Identity>, StoreError> {
        let rows = self.read()?;
        let by_username = rows.by_id.values().find(|i| i.username == username);
        Ok(by_username
            .or_else(|| rows.by_id.values().find(|i| i.email == email))
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, StoreError> {
        Ok(self.read()?.by_id.values().find(|i| i.email == email).cloned())
    }

    async fn find_by_id(&self, id: IdentityId) -> Result<Option<Identity>, StoreError> {
        Ok(self.read()?.by_id.get(&id).cloned())
    }

    async fn insert(&self, identity: NewIdentity) -> Result<IdentityId, StoreError> {
        let mut rows = self
            .inner
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        if rows.by_id.values().any(|i| i.username == identity.username) {
            return Err(StoreError::UniqueViolation(UniqueField::Username));
        }
        if rows.by_id.values().any(|i| i.email == identity.email) {
            return Err(StoreError::UniqueViolation(UniqueField::Email));
        }

        rows.next_id += 1;
        let id = IdentityId::from_i64(rows.next_id);
        rows.by_id.insert(
            id,
            Identity {
                id,
                username: identity.username,
                email: identity.email,
                password_hash: identity.password_hash,
            },
        );
        Ok(id)
    }
}
