use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::SubjectContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(subject): Extension<SubjectContext>,
) -> axum::response::Response {
    match services.identities.get_identity(subject.identity_id()).await {
        Ok(identity) => (StatusCode::OK, Json(dto::identity_to_json(&identity))).into_response(),
        Err(e) => errors::auth_error_to_response(e),
    }
}
