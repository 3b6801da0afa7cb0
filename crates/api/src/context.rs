use quill_auth::AuthenticatedSubject;
use quill_core::IdentityId;

/// Subject context for a request (the authenticated caller).
///
/// Inserted by the bearer middleware; present for every protected route.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SubjectContext {
    subject: AuthenticatedSubject,
}

impl SubjectContext {
    pub fn new(subject: AuthenticatedSubject) -> Self {
        Self { subject }
    }

    pub fn subject(&self) -> AuthenticatedSubject {
        self.subject
    }

    pub fn identity_id(&self) -> IdentityId {
        self.subject.identity_id()
    }
}
