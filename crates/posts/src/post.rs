use serde::{Deserialize, Serialize};

use quill_core::{DomainError, DomainResult, Entity, IdentityId, OwnedResource, PostId};

/// A post. The owner is set at creation and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub owner_id: IdentityId,
}

impl Entity for Post {
    type Id = PostId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl OwnedResource for Post {
    const KIND: &'static str = "post";

    fn owner_id(&self) -> IdentityId {
        self.owner_id
    }
}

/// Fields supplied by the author when creating a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
}

impl NewPost {
    pub fn validate(&self) -> DomainResult<()> {
        ensure_not_blank("title", &self.title)?;
        ensure_not_blank("content", &self.content)
    }
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl PostChanges {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(title) = &self.title {
            ensure_not_blank("title", title)?;
        }
        if let Some(content) = &self.content {
            ensure_not_blank("content", content)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }

    /// Apply onto an existing post (used by stores without partial-update support).
    pub fn apply_to(&self, post: &mut Post) {
        if let Some(title) = &self.title {
            post.title = title.clone();
        }
        if let Some(content) = &self.content {
            post.content = content.clone();
        }
    }
}

fn ensure_not_blank(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} must not be empty")));
    }
    Ok(())
}
