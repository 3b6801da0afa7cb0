use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use quill_auth::{AuthError, StatusClass};

const LOGIN_FAILED: &str = "invalid email or password";

pub fn status_for(class: StatusClass) -> StatusCode {
    match class {
        StatusClass::BadRequest => StatusCode::BAD_REQUEST,
        StatusClass::Unauthorized => StatusCode::UNAUTHORIZED,
        StatusClass::Forbidden => StatusCode::FORBIDDEN,
        StatusClass::NotFound => StatusCode::NOT_FOUND,
        StatusClass::Conflict => StatusCode::CONFLICT,
        StatusClass::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        StatusClass::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn auth_error_to_response(err: AuthError) -> axum::response::Response {
    let status = status_for(err.status_class());
    match err {
        AuthError::DuplicateUsername(_) => json_error(status, "duplicate_username", err.to_string()),
        AuthError::DuplicateEmail(_) => json_error(status, "duplicate_email", err.to_string()),
        AuthError::IdentityNotFound(_) | AuthError::ResourceNotFound(_) => {
            json_error(status, "not_found", err.to_string())
        }
        AuthError::InvalidCredentials => json_error(status, "invalid_credentials", LOGIN_FAILED),
        AuthError::TokenInvalid(_) => json_error(status, "unauthorized", "missing or invalid bearer token"),
        AuthError::TokenExpired => json_error(status, "token_expired", err.to_string()),
        AuthError::WrongOwner { resource, .. } => {
            json_error(status, "forbidden", format!("you do not own this {resource}"))
        }
        AuthError::Validation(msg) => json_error(status, "validation_error", msg),
        AuthError::StoreUnavailable(msg) => {
            tracing::error!(error = %msg, "store unavailable");
            json_error(status, "service_unavailable", "service temporarily unavailable")
        }
        AuthError::Internal(msg) => {
            tracing::error!(error = %msg, "internal error");
            json_error(status, "internal_error", "internal error")
        }
    }
}

/// Login never reveals whether the email exists.
pub fn login_error_to_response(err: AuthError) -> axum::response::Response {
    match err {
        AuthError::IdentityNotFound(_) | AuthError::InvalidCredentials => {
            json_error(StatusCode::UNAUTHORIZED, "invalid_credentials", LOGIN_FAILED)
        }
        other => auth_error_to_response(other),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Unwrap a JSON body, answering malformed or incomplete payloads with the
/// same `{error, message}` shape as every other failure.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, axum::response::Response> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| json_error(StatusCode::BAD_REQUEST, "validation_error", rejection.body_text()))
}

pub fn parse_id<T>(raw: &str) -> Result<T, axum::response::Response>
where
    T: core::str::FromStr<Err = quill_core::DomainError>,
{
    raw.parse()
        .map_err(|e: quill_core::DomainError| json_error(StatusCode::BAD_REQUEST, "invalid_id", e.to_string()))
}

#[cfg(test)]
mod tests {
    use quill_core::{IdentityId, PostId};

    use super::*;

    #[test]
    fn every_error_kind_has_one_status() {
        let cases = [
            (AuthError::DuplicateUsername("a".into()), StatusCode::CONFLICT),
            (AuthError::DuplicateEmail("a@x.com".into()), StatusCode::CONFLICT),
            (AuthError::IdentityNotFound("1".into()), StatusCode::NOT_FOUND),
            (AuthError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AuthError::TokenInvalid("bad".into()), StatusCode::UNAUTHORIZED),
            (AuthError::TokenExpired, StatusCode::UNAUTHORIZED),
            (AuthError::ResourceNotFound("post 1".into()), StatusCode::NOT_FOUND),
            (
                AuthError::WrongOwner {
                    subject: IdentityId::from_i64(1),
                    owner: IdentityId::from_i64(2),
                    resource: "post".into(),
                },
                StatusCode::FORBIDDEN,
            ),
            (AuthError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (AuthError::StoreUnavailable("x".into()), StatusCode::SERVICE_UNAVAILABLE),
            (AuthError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(auth_error_to_response(err.clone()).status(), status, "{err:?}");
        }
    }

    #[test]
    fn login_collapses_unknown_email_into_invalid_credentials() {
        let unknown = login_error_to_response(AuthError::IdentityNotFound("nobody@x.com".into()));
        let wrong = login_error_to_response(AuthError::InvalidCredentials);
        assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn ids_must_be_positive_integers() {
        assert_eq!(parse_id::<PostId>("3").unwrap(), PostId::from_i64(3));
        assert_eq!(parse_id::<PostId>("0").unwrap_err().status(), StatusCode::BAD_REQUEST);
        assert_eq!(parse_id::<IdentityId>("abc").unwrap_err().status(), StatusCode::BAD_REQUEST);
    }
}
