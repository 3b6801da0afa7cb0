use thiserror::Error;

use quill_core::{DomainError, IdentityId};

use crate::store::{StoreError, UniqueField};

/// Coarse status class every [`AuthError`] maps onto.
///
/// The boundary layer turns this into a transport status (HTTP or otherwise).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StatusClass {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    Unavailable,
    Internal,
}

/// Authentication/authorization failure.
///
/// Every variant is terminal for the current request; nothing in this crate
/// retries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("user with username '{0}' already exists")]
    DuplicateUsername(String),

    #[error("user with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("identity '{0}' not found")]
    IdentityNotFound(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("token has expired")]
    TokenExpired,

    #[error("{0} not found")]
    ResourceNotFound(String),

    #[error("identity {subject} does not own {resource} (owner {owner})")]
    WrongOwner {
        subject: IdentityId,
        owner: IdentityId,
        resource: String,
    },

    #[error("validation failed: {0}")]
    Validation(String),

    /// Transient store failure (unreachable, timed out). Never an authorization outcome.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn status_class(&self) -> StatusClass {
        match self {
            AuthError::DuplicateUsername(_) | AuthError::DuplicateEmail(_) => StatusClass::Conflict,
            AuthError::IdentityNotFound(_) | AuthError::ResourceNotFound(_) => StatusClass::NotFound,
            AuthError::InvalidCredentials | AuthError::TokenInvalid(_) | AuthError::TokenExpired => {
                StatusClass::Unauthorized
            }
            AuthError::WrongOwner { .. } => StatusClass::Forbidden,
            AuthError::Validation(_) => StatusClass::BadRequest,
            AuthError::StoreUnavailable(_) => StatusClass::Unavailable,
            AuthError::Internal(_) => StatusClass::Internal,
        }
    }

    /// Stable, payload-free name of the failure. Safe to log: unlike
    /// `Display`, it never carries the submitted username or email.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::DuplicateUsername(_) => "duplicate_username",
            AuthError::DuplicateEmail(_) => "duplicate_email",
            AuthError::IdentityNotFound(_) => "identity_not_found",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::TokenInvalid(_) => "token_invalid",
            AuthError::TokenExpired => "token_expired",
            AuthError::ResourceNotFound(_) => "resource_not_found",
            AuthError::WrongOwner { .. } => "wrong_owner",
            AuthError::Validation(_) => "validation",
            AuthError::StoreUnavailable(_) => "store_unavailable",
            AuthError::Internal(_) => "internal",
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::UniqueViolation(UniqueField::Username) => AuthError::DuplicateUsername(String::new()),
            StoreError::UniqueViolation(UniqueField::Email) => AuthError::DuplicateEmail(String::new()),
            StoreError::Unavailable(msg) => AuthError::StoreUnavailable(msg),
        }
    }
}

impl From<DomainError> for AuthError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) | DomainError::InvalidId(msg) => AuthError::Validation(msg),
        }
    }
}
