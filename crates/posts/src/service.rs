use std::future::Future;
use std::time::Duration;

use tracing::{info, instrument};

use quill_auth::{AuthError, AuthenticatedSubject, StoreError, authorize_mutation};
use quill_core::{IdentityId, PostId};

use crate::{NewPost, Post, PostChanges, PostStore};

/// Post operations. Mutations are ownership-gated; reads are not.
#[derive(Debug, Clone)]
pub struct PostService<S> {
    store: S,
    store_timeout: Duration,
}

impl<S> PostService<S>
where
    S: PostStore,
{
    pub fn new(store: S, store_timeout: Duration) -> Self {
        Self { store, store_timeout }
    }

    pub async fn list(&self) -> Result<Vec<Post>, AuthError> {
        self.bounded("list", self.store.list()).await
    }

    pub async fn get(&self, id: PostId) -> Result<Post, AuthError> {
        self.bounded("get", self.store.get(id))
            .await?
            .ok_or_else(|| AuthError::ResourceNotFound(format!("post {id}")))
    }

    pub async fn list_by_owner(&self, owner: IdentityId) -> Result<Vec<Post>, AuthError> {
        self.bounded("list_by_owner", self.store.list_by_owner(owner)).await
    }

    #[instrument(skip(self, subject, post), fields(subject = %subject), err)]
    pub async fn create(&self, subject: AuthenticatedSubject, post: NewPost) -> Result<Post, AuthError> {
        post.validate()?;
        let created = self
            .bounded("insert", self.store.insert(subject.identity_id(), post))
            .await?;
        info!(post_id = %created.id, "post created");
        Ok(created)
    }

    #[instrument(skip(self, subject, changes), fields(subject = %subject), err)]
    pub async fn edit(
        &self,
        subject: AuthenticatedSubject,
        id: PostId,
        changes: PostChanges,
    ) -> Result<Post, AuthError> {
        let existing = self.get(id).await?;
        authorize_mutation(subject, Some(&existing))?;
        changes.validate()?;

        if changes.is_empty() {
            return Ok(existing);
        }

        // The updated row comes back from the write itself; no extra read.
        self.bounded("update", self.store.update(id, changes))
            .await?
            .ok_or_else(|| AuthError::ResourceNotFound(format!("post {id}")))
    }

    #[instrument(skip(self, subject), fields(subject = %subject), err)]
    pub async fn delete(&self, subject: AuthenticatedSubject, id: PostId) -> Result<(), AuthError> {
        let existing = self.get(id).await?;
        authorize_mutation(subject, Some(&existing))?;

        if !self.bounded("delete", self.store.delete(id)).await? {
            return Err(AuthError::ResourceNotFound(format!("post {id}")));
        }
        info!(post_id = %id, "post deleted");
        Ok(())
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, AuthError> {
        match tokio::time::timeout(self.store_timeout, call).await {
            Ok(result) => result.map_err(AuthError::from),
            Err(_) => Err(AuthError::StoreUnavailable(format!(
                "post {operation} timed out after {}ms",
                self.store_timeout.as_millis()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::future::pending;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    #[derive(Default)]
    struct VecPostStore {
        rows: Mutex<Vec<Post>>,
    }

    #[async_trait]
    impl PostStore for VecPostStore {
        async fn list(&self) -> Result<Vec<Post>, StoreError> {
            Ok(self.rows.lock().unwrap().clone())
        }

        async fn get(&self, id: PostId) -> Result<Option<Post>, StoreError> {
            Ok(self.rows.lock().unwrap().iter().find(|p| p.id == id).cloned())
        }

        async fn list_by_owner(&self, owner: IdentityId) -> Result<Vec<Post>, StoreError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|p| p.owner_id == owner)
                .cloned()
                .collect())
        }

        async fn insert(&self, owner: IdentityId, post: NewPost) -> Result<Post, StoreError> {
            let mut rows = self.rows.lock().unwrap();
            let created = Post {
                id: PostId::from_i64(rows.len() as i64 + 1),
                title: post.title,
                content: post.content,
                owner_id: owner,
            };
            rows.push(created.clone());
            Ok(created)
        }

        async fn update(&self, id: PostId, changes: PostChanges) -> Result<Option<Post>, StoreError> {
            let mut rows = self.rows.lock().unwrap();
            Ok(rows.iter_mut().find(|p| p.id == id).map(|p| {
                changes.apply_to(p);
                p.clone()
            }))
        }

        async fn delete(&self, id: PostId) -> Result<bool, StoreError> {
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|p| p.id != id);
            Ok(rows.len() != before)
        }
    }

    /// A store whose calls never complete.
    struct StalledPostStore;

    #[async_trait]
    impl PostStore for StalledPostStore {
        async fn list(&self) -> Result<Vec<Post>, StoreError> {
            pending().await
        }

        async fn get(&self, _id: PostId) -> Result<Option<Post>, StoreError> {
            pending().await
        }

        async fn list_by_owner(&self, _owner: IdentityId) -> Result<Vec<Post>, StoreError> {
            pending().await
        }

        async fn insert(&self, _owner: IdentityId, _post: NewPost) -> Result<Post, StoreError> {
            pending().await
        }

        async fn update(&self, _id: PostId, _changes: PostChanges) -> Result<Option<Post>, StoreError> {
            pending().await
        }

        async fn delete(&self, _id: PostId) -> Result<bool, StoreError> {
            pending().await
        }
    }

    fn service() -> PostService<VecPostStore> {
        PostService::new(VecPostStore::default(), Duration::from_secs(5))
    }

    fn subject(id: i64) -> AuthenticatedSubject {
        AuthenticatedSubject::new(IdentityId::from_i64(id))
    }

    fn draft() -> NewPost {
        NewPost {
            title: "Hello".into(),
            content: "World".into(),
        }
    }

    #[tokio::test]
    async fn creator_becomes_owner() {
        let svc = service();
        let post = svc.create(subject(1), draft()).await.unwrap();
        assert_eq!(post.owner_id, IdentityId::from_i64(1));
        assert_eq!(svc.list_by_owner(IdentityId::from_i64(1)).await.unwrap(), vec![post]);
    }

    #[tokio::test]
    async fn owner_can_edit_partially() {
        let svc = service();
        let post = svc.create(subject(1), draft()).await.unwrap();

        let edited = svc
            .edit(
                subject(1),
                post.id,
                PostChanges {
                    title: Some("Edited".into()),
                    content: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(edited.title, "Edited");
        assert_eq!(edited.content, "World");
    }

    #[tokio::test]
    async fn non_owner_cannot_edit_or_delete() {
        let svc = service();
        let post = svc.create(subject(1), draft()).await.unwrap();

        let err = svc
            .edit(subject(2), post.id, PostChanges::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::WrongOwner { .. }));

        let err = svc.delete(subject(2), post.id).await.unwrap_err();
        assert!(matches!(err, AuthError::WrongOwner { .. }));

        // Still there, unchanged.
        assert_eq!(svc.get(post.id).await.unwrap(), post);
    }

    #[tokio::test]
    async fn missing_post_is_not_found_for_everyone() {
        let svc = service();
        let missing = PostId::from_i64(404);

        let expected = AuthError::ResourceNotFound("post 404".into());
        assert_eq!(svc.get(missing).await.unwrap_err(), expected);
        assert_eq!(
            svc.edit(subject(1), missing, PostChanges::default()).await.unwrap_err(),
            expected
        );
        assert_eq!(svc.delete(subject(1), missing).await.unwrap_err(), expected);
    }

    #[tokio::test]
    async fn owner_can_delete() {
        let svc = service();
        let post = svc.create(subject(1), draft()).await.unwrap();
        svc.delete(subject(1), post.id).await.unwrap();
        assert!(svc.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn any_subject_can_read() {
        let svc = service();
        let post = svc.create(subject(1), draft()).await.unwrap();
        assert_eq!(svc.get(post.id).await.unwrap().owner_id, IdentityId::from_i64(1));
        assert_eq!(svc.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn blank_title_is_rejected_before_storage() {
        let svc = service();
        let err = svc
            .create(
                subject(1),
                NewPost {
                    title: " ".into(),
                    content: "x".into(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
        assert!(svc.list().await.unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_store_surfaces_as_unavailable() {
        let svc = PostService::new(StalledPostStore, Duration::from_millis(250));
        let id = PostId::from_i64(1);

        let err = svc.get(id).await.unwrap_err();
        assert!(matches!(err, AuthError::StoreUnavailable(msg) if msg.contains("get")));

        let err = svc.list().await.unwrap_err();
        assert!(matches!(err, AuthError::StoreUnavailable(_)));

        let err = svc
            .edit(
                subject(1),
                id,
                PostChanges {
                    title: Some("t".into()),
                    content: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::StoreUnavailable(_)));

        let err = svc.delete(subject(1), id).await.unwrap_err();
        assert!(matches!(err, AuthError::StoreUnavailable(_)));

        let err = svc.create(subject(1), draft()).await.unwrap_err();
        assert!(matches!(err, AuthError::StoreUnavailable(msg) if msg.contains("insert")));
    }
}
