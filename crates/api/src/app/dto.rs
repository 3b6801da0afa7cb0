use serde::Deserialize;
use serde_json::json;

use quill_auth::{IssuedToken, SafeIdentity};
use quill_posts::{NewPost, Post, PostChanges};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl core::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl core::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
}

impl From<CreatePostRequest> for NewPost {
    fn from(value: CreatePostRequest) -> Self {
        NewPost {
            title: value.title,
            content: value.content,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EditPostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl From<EditPostRequest> for PostChanges {
    fn from(value: EditPostRequest) -> Self {
        PostChanges {
            title: value.title,
            content: value.content,
        }
    }
}

// -------------------------
// Response mapping
// -------------------------

pub fn token_to_json(token: &IssuedToken, ttl: chrono::Duration) -> serde_json::Value {
    json!({
        "access_token": token.access_token,
        "token_type": "Bearer",
        "expires_in": ttl.num_seconds(),
        "expires_at": token.expires_at.to_rfc3339(),
    })
}

pub fn identity_to_json(identity: &SafeIdentity) -> serde_json::Value {
    json!({
        "id": identity.id,
        "username": identity.username,
        "email": identity.email,
    })
}

/// `user` is null when the author could not be resolved.
pub fn post_to_json(post: &Post, author: Option<&SafeIdentity>) -> serde_json::Value {
    json!({
        "id": post.id,
        "title": post.title,
        "content": post.content,
        "owner_id": post.owner_id,
        "user": author.map(identity_to_json),
    })
}

#[cfg(test)]
mod tests {
    use quill_core::{IdentityId, PostId};

    use super::*;

    #[test]
    fn post_embeds_author_without_credentials() {
        let author = SafeIdentity {
            id: IdentityId::from_i64(1),
            username: "alice".into(),
            email: "alice@x.com".into(),
        };
        let post = Post {
            id: PostId::from_i64(9),
            title: "Hello".into(),
            content: "World".into(),
            owner_id: author.id,
        };

        let value = post_to_json(&post, Some(&author));
        assert_eq!(value["id"], 9);
        assert_eq!(value["user"]["username"], "alice");
        assert!(value["user"].get("password_hash").is_none());

        assert!(post_to_json(&post, None)["user"].is_null());
    }

    #[test]
    fn request_debug_hides_passwords() {
        let req: LoginRequest = serde_json::from_str(r#"{"email":"a@x.com","password":"hunter2"}"#).unwrap();
        assert!(!format!("{req:?}").contains("hunter2"));
    }
}
