//! Entity traits: identity + tenant scoping.

use crate::id::OrgId;

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// A record partitioned by organization.
///
/// Every query and mutation is scoped to this value; repositories must never
/// return or touch a record across this boundary.
pub trait OrgScoped {
    fn org_id(&self) -> OrgId;
}
