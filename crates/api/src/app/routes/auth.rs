use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};

use quill_auth::{Authenticator, Credentials, validate_registration};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<dto::RegisterRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match errors::json_body(payload) {
        Ok(body) => body,
        Err(resp) => return resp,
    };

    if let Err(e) = validate_registration(&body.username, &body.email, &body.password) {
        return errors::auth_error_to_response(e);
    }

    match services
        .identities
        .register(&body.username, &body.email, &body.password)
        .await
    {
        Ok(id) => (StatusCode::CREATED, Json(serde_json::json!({ "id": id }))).into_response(),
        Err(e) => errors::auth_error_to_response(e),
    }
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<dto::LoginRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match errors::json_body(payload) {
        Ok(body) => body,
        Err(resp) => return resp,
    };

    let credentials = Credentials {
        email: body.email,
        password: body.password,
    };

    let subject = match services.login.authenticate(credentials).await {
        Ok(subject) => subject,
        Err(e) => return errors::login_error_to_response(e),
    };

    match services.tokens.issue(subject.identity_id()) {
        Ok(token) => (
            StatusCode::OK,
            Json(dto::token_to_json(&token, services.tokens.ttl())),
        )
            .into_response(),
        Err(e) => errors::auth_error_to_response(e),
    }
}
