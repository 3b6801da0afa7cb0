use serde::{Deserialize, Serialize};

use quill_core::IdentityId;

/// Identity of an authenticated caller.
///
/// The minimal trust artifact produced by a successful credential or token
/// check, threaded through ownership decisions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuthenticatedSubject {
    identity_id: IdentityId,
}

impl AuthenticatedSubject {
    pub fn new(identity_id: IdentityId) -> Self {
        Self { identity_id }
    }

    pub fn identity_id(&self) -> IdentityId {
        self.identity_id
    }
}

impl core::fmt::Display for AuthenticatedSubject {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.identity_id, f)
    }
}

impl From<AuthenticatedSubject> for IdentityId {
    fn from(value: AuthenticatedSubject) -> Self {
        value.identity_id
    }
}
