//! Ownership guard for resource mutations.
//!
//! - No IO
//! - No panics
//! - No state (ownership is immutable per resource, so no locking either)
//!
//! Reads and listings are never gated; only edit and delete go through here.

use tracing::warn;

use quill_core::{IdentityId, OwnedResource};

use crate::{AuthError, AuthenticatedSubject};

/// Why a mutation was denied: the subject is not the owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrongOwner {
    pub subject: IdentityId,
    pub owner: IdentityId,
    pub resource: String,
}

/// Outcome of an ownership check on an existing resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(WrongOwner),
}

impl From<WrongOwner> for AuthError {
    fn from(value: WrongOwner) -> Self {
        AuthError::WrongOwner {
            subject: value.subject,
            owner: value.owner,
            resource: value.resource,
        }
    }
}

/// Decide whether `subject` may mutate `resource`.
pub fn decide<R: OwnedResource>(subject: AuthenticatedSubject, resource: &R) -> Decision {
    let owner = resource.owner_id();
    if owner == subject.identity_id() {
        Decision::Allow
    } else {
        Decision::Deny(WrongOwner {
            subject: subject.identity_id(),
            owner,
            resource: format!("{} {}", R::KIND, resource.id()),
        })
    }
}

/// Authorize a mutation of a resource the caller has already fetched.
///
/// Existence is checked before ownership: a missing resource is
/// `ResourceNotFound` regardless of who asks.
pub fn authorize_mutation<R: OwnedResource>(
    subject: AuthenticatedSubject,
    resource: Option<&R>,
) -> Result<(), AuthError> {
    let Some(resource) = resource else {
        return Err(AuthError::ResourceNotFound(R::KIND.to_string()));
    };

    match decide(subject, resource) {
        Decision::Allow => Ok(()),
        Decision::Deny(denial) => {
            warn!(
                subject = %denial.subject,
                owner = %denial.owner,
                resource = %denial.resource,
                "mutation denied: wrong owner"
            );
            Err(denial.into())
        }
    }
}
