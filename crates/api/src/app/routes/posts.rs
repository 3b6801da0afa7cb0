use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use quill_auth::{AuthError, SafeIdentity};
use quill_core::{IdentityId, PostId};
use quill_posts::Post;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::SubjectContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route("/:id", get(get_post).patch(edit_post).delete(delete_post))
}

pub async fn list_posts(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    let posts = match services.posts.list().await {
        Ok(posts) => posts,
        Err(e) => return errors::auth_error_to_response(e),
    };

    let mut authors: HashMap<IdentityId, Option<SafeIdentity>> = HashMap::new();
    let mut items = Vec::with_capacity(posts.len());
    for post in &posts {
        if !authors.contains_key(&post.owner_id) {
            match find_author(&services, post.owner_id).await {
                Ok(author) => authors.insert(post.owner_id, author),
                Err(e) => return errors::auth_error_to_response(e),
            };
        }
        let author = authors.get(&post.owner_id).and_then(Option::as_ref);
        items.push(dto::post_to_json(post, author));
    }

    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn get_post(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: PostId = match errors::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.posts.get(id).await {
        Ok(post) => post_response(&services, StatusCode::OK, post).await,
        Err(e) => errors::auth_error_to_response(e),
    }
}

pub async fn create_post(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(subject): Extension<SubjectContext>,
    payload: Result<Json<dto::CreatePostRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match errors::json_body(payload) {
        Ok(body) => body,
        Err(resp) => return resp,
    };

    match services.posts.create(subject.subject(), body.into()).await {
        Ok(post) => post_response(&services, StatusCode::CREATED, post).await,
        Err(e) => errors::auth_error_to_response(e),
    }
}

pub async fn edit_post(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(subject): Extension<SubjectContext>,
    Path(id): Path<String>,
    payload: Result<Json<dto::EditPostRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match errors::json_body(payload) {
        Ok(body) => body,
        Err(resp) => return resp,
    };

    let id: PostId = match errors::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.posts.edit(subject.subject(), id, body.into()).await {
        Ok(post) => post_response(&services, StatusCode::OK, post).await,
        Err(e) => errors::auth_error_to_response(e),
    }
}

pub async fn delete_post(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(subject): Extension<SubjectContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: PostId = match errors::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.posts.delete(subject.subject(), id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::auth_error_to_response(e),
    }
}

async fn post_response(services: &AppServices, status: StatusCode, post: Post) -> axum::response::Response {
    match find_author(services, post.owner_id).await {
        Ok(author) => (status, Json(dto::post_to_json(&post, author.as_ref()))).into_response(),
        Err(e) => errors::auth_error_to_response(e),
    }
}

/// A missing author is not an error for readers; an unreachable store is.
async fn find_author(services: &AppServices, owner: IdentityId) -> Result<Option<SafeIdentity>, AuthError> {
    match services.identities.get_identity(owner).await {
        Ok(identity) => Ok(Some(identity)),
        Err(AuthError::IdentityNotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}
