use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use quill_auth::StoreError;
use quill_core::{IdentityId, PostId};
use quill_posts::{NewPost, Post, PostChanges, PostStore};

/// In-memory post store for tests/dev. Listings come back in id order.
#[derive(Debug, Default)]
pub struct InMemoryPostStore {
    inner: RwLock<Rows>,
}

#[derive(Debug, Default)]
struct Rows {
    next_id: i64,
    by_id: BTreeMap<PostId, Post>,
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("lock poisoned".to_string())
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn list(&self) -> Result<Vec<Post>, StoreError> {
        let rows = self.inner.read().map_err(|_| poisoned())?;
        Ok(rows.by_id.values().cloned().collect())
    }

    async fn get(&self, id: PostId) -> Result<Option<Post>, StoreError> {
        let rows = self.inner.read().map_err(|_| poisoned())?;
        Ok(rows.by_id.get(&id).cloned())
    }

    async fn list_by_owner(&self, owner: IdentityId) -> Result<Vec<Post>, StoreError> {
        let rows = self.inner.read().map_err(|_| poisoned())?;
        Ok(rows
            .by_id
            .values()
            .filter(|p| p.owner_id == owner)
            .cloned()
            .collect())
    }

    async fn insert(&self, owner: IdentityId, post: NewPost) -> Result<Post, StoreError> {
        let mut rows = self.inner.write().map_err(|_| poisoned())?;
        rows.next_id += 1;
        let created = Post {
            id: PostId::from_i64(rows.next_id),
            title: post.title,
            content: post.content,
            owner_id: owner,
        };
        rows.by_id.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: PostId, changes: PostChanges) -> Result<Option<Post>, StoreError> {
        let mut rows = self.inner.write().map_err(|_| poisoned())?;
        Ok(rows.by_id.get_mut(&id).map(|post| {
            changes.apply_to(post);
            post.clone()
        }))
    }

    async fn delete(&self, id: PostId) -> Result<bool, StoreError> {
        let mut rows = self.inner.write().map_err(|_| poisoned())?;
        Ok(rows.by_id.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str) -> NewPost {
        NewPost {
            title: title.to_string(),
            content: "body".to_string(),
        }
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = InMemoryPostStore::new();
        let first = store.insert(IdentityId::from_i64(1), draft("a")).await.unwrap();
        assert!(store.delete(first.id).await.unwrap());
        let second = store.insert(IdentityId::from_i64(1), draft("b")).await.unwrap();
        assert_ne!(first.id, second.id);
        assert!(!store.delete(first.id).await.unwrap());
    }

    #[tokio::test]
    async fn update_returns_full_row() {
        let store = InMemoryPostStore::new();
        let post = store.insert(IdentityId::from_i64(1), draft("a")).await.unwrap();

        let updated = store
            .update(
                post.id,
                PostChanges {
                    title: None,
                    content: Some("new body".into()),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "a");
        assert_eq!(updated.content, "new body");

        assert!(store.update(PostId::from_i64(99), PostChanges::default()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_by_owner_filters() {
        let store = InMemoryPostStore::new();
        store.insert(IdentityId::from_i64(1), draft("a")).await.unwrap();
        store.insert(IdentityId::from_i64(2), draft("b")).await.unwrap();
        store.insert(IdentityId::from_i64(1), draft("c")).await.unwrap();

        let titles: Vec<String> = store
            .list_by_owner(IdentityId::from_i64(1))
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["a", "c"]);
        assert_eq!(store.list().await.unwrap().len(), 3);
    }
}
