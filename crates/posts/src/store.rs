use std::sync::Arc;

use async_trait::async_trait;

use quill_auth::StoreError;
use quill_core::{IdentityId, PostId};

use crate::{NewPost, Post, PostChanges};

/// Post persistence port. Supplies the owner of a post before any mutation.
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Post>, StoreError>;

    async fn get(&self, id: PostId) -> Result<Option<Post>, StoreError>;

    async fn list_by_owner(&self, owner: IdentityId) -> Result<Vec<Post>, StoreError>;

    async fn insert(&self, owner: IdentityId, post: NewPost) -> Result<Post, StoreError>;

    /// Apply `changes` and return the updated row, or `None` if it vanished.
    async fn update(&self, id: PostId, changes: PostChanges) -> Result<Option<Post>, StoreError>;

    /// Returns whether a row was deleted.
    async fn delete(&self, id: PostId) -> Result<bool, StoreError>;
}

#[async_trait]
impl<S> PostStore for Arc<S>
where
    S: PostStore + ?Sized,
{
    async fn list(&self) -> Result<Vec<Post>, StoreError> {
        (**self).list().await
    }

    async fn get(&self, id: PostId) -> Result<Option<Post>, StoreError> {
        (**self).get(id).await
    }

    async fn list_by_owner(&self, owner: IdentityId) -> Result<Vec<Post>, StoreError> {
        (**self).list_by_owner(owner).await
    }

    async fn insert(&self, owner: IdentityId, post: NewPost) -> Result<Post, StoreError> {
        (**self).insert(owner, post).await
    }

    async fn update(&self, id: PostId, changes: PostChanges) -> Result<Option<Post>, StoreError> {
        (**self).update(id, changes).await
    }

    async fn delete(&self, id: PostId) -> Result<bool, StoreError> {
        (**self).delete(id).await
    }
}
