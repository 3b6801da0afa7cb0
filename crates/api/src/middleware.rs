use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use quill_auth::{AuthError, Authenticator, BearerToken};

use crate::app::errors::{auth_error_to_response, json_error};
use crate::context::SubjectContext;

#[derive(Clone)]
pub struct AuthState {
    pub bearer: Arc<dyn Authenticator<BearerToken>>,
}

pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_bearer(req.headers()).ok_or_else(unauthorized)?;

    let subject = state
        .bearer
        .authenticate(BearerToken(token.to_string()))
        .await
        .map_err(bearer_error_to_response)?;

    req.extensions_mut().insert(SubjectContext::new(subject));

    Ok(next.run(req).await)
}

/// A token for an identity that no longer exists is as good as no token.
fn bearer_error_to_response(err: AuthError) -> Response {
    match err {
        AuthError::TokenInvalid(_) | AuthError::IdentityNotFound(_) => unauthorized(),
        other => auth_error_to_response(other),
    }
}

fn unauthorized() -> Response {
    json_error(StatusCode::UNAUTHORIZED, "unauthorized", "missing or invalid bearer token")
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let header = header.to_str().ok()?;
    let (scheme, token) = header.trim_start().split_once(char::is_whitespace)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(axum::http::header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(extract_bearer(&headers("Bearer abc.def.ghi")), Some("abc.def.ghi"));
    }

    #[test]
    fn scheme_is_case_insensitive() {
        assert_eq!(extract_bearer(&headers("bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(extract_bearer(&headers("BEARER abc.def.ghi")), Some("abc.def.ghi"));
    }

    #[test]
    fn rejects_other_schemes_and_blank_tokens() {
        assert_eq!(extract_bearer(&HeaderMap::new()), None);
        assert_eq!(extract_bearer(&headers("Basic dXNlcjpwdw==")), None);
        assert_eq!(extract_bearer(&headers("Bearer   ")), None);
        assert_eq!(extract_bearer(&headers("abc.def.ghi")), None);
    }

    #[test]
    fn expired_tokens_keep_their_own_code() {
        assert_eq!(bearer_error_to_response(AuthError::TokenExpired).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            bearer_error_to_response(AuthError::IdentityNotFound("7".into())).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            bearer_error_to_response(AuthError::StoreUnavailable("down".into())).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
