use axum::{Router, routing::get};

pub mod auth;
pub mod posts;
pub mod system;
pub mod users;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/users", users::router())
        .nest("/posts", posts::router())
}
