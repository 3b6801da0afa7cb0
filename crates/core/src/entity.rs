//! Entity traits: identity + continuity across state changes, and ownership.

use crate::id::IdentityId;

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// An entity with exactly one owning identity.
///
/// The owner is fixed when the entity is created and never changes afterwards,
/// which is what lets ownership checks run without locking.
pub trait OwnedResource: Entity {
    /// Short, stable label for the resource kind (used in errors and logs).
    const KIND: &'static str;

    fn owner_id(&self) -> IdentityId;
}
