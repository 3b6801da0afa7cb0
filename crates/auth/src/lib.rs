//! `quill-auth`: authentication and ownership authorization core.
//!
//! This crate is intentionally decoupled from HTTP and from any concrete
//! storage: identities are reached through the [`IdentityStore`] port.

pub mod authenticate;
pub mod claims;
pub mod error;
pub mod identity;
pub mod ownership;
pub mod password;
pub mod store;
pub mod subject;
pub mod token;
pub mod validation;

#[cfg(test)]
mod testing;

pub use authenticate::{Authenticator, BearerAuthenticator, BearerToken, Credentials, PasswordAuthenticator};
pub use claims::{TokenClaims, TokenValidationError, validate_claims};
pub use error::{AuthError, StatusClass};
pub use identity::IdentityService;
pub use ownership::{Decision, WrongOwner, authorize_mutation, decide};
pub use password::{HashCost, PasswordHasher};
pub use store::{Identity, IdentityStore, NewIdentity, SafeIdentity, StoreError, UniqueField};
pub use subject::AuthenticatedSubject;
pub use token::{IssuedToken, SigningKey, TokenService};
pub use validation::validate_registration;
