use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use quill_core::IdentityId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/:id", get(get_user))
        .route("/:id/posts", get(list_user_posts))
}

pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: IdentityId = match errors::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.identities.get_identity(id).await {
        Ok(identity) => (StatusCode::OK, Json(dto::identity_to_json(&identity))).into_response(),
        Err(e) => errors::auth_error_to_response(e),
    }
}

pub async fn list_user_posts(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: IdentityId = match errors::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    // Unknown users are a 404, not an empty list.
    let author = match services.identities.get_identity(id).await {
        Ok(identity) => identity,
        Err(e) => return errors::auth_error_to_response(e),
    };

    match services.posts.list_by_owner(id).await {
        Ok(posts) => {
            let items = posts
                .iter()
                .map(|p| dto::post_to_json(p, Some(&author)))
                .collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::auth_error_to_response(e),
    }
}
