//! Read-model contract for space membership

use super::space::{SpaceRole, SpaceVisibility};
use super::types::SpaceId;
use crate::error::LookupError;
use crate::identity::IdentityId;
use std::sync::Arc;

/// Answers role and visibility questions about a space
pub trait SpaceMembershipLookup {
    /// Role of `identity` in `space`. Total: unknown spaces and non-members
    /// both yield [`SpaceRole::None`].
    fn space_role(&self, space: &SpaceId, identity: &IdentityId) -> Result<SpaceRole, LookupError>;

    /// Visibility of `space`, or `None` if the space no longer exists
    fn space_visibility(&self, space: &SpaceId) -> Result<Option<SpaceVisibility>, LookupError>;
}

impl<T: SpaceMembershipLookup + ?Sized> SpaceMembershipLookup for Arc<T> {
    fn space_role(&self, space: &SpaceId, identity: &IdentityId) -> Result<SpaceRole, LookupError> {
        (**self).space_role(space, identity)
    }

    fn space_visibility(&self, space: &SpaceId) -> Result<Option<SpaceVisibility>, LookupError> {
        (**self).space_visibility(space)
    }
}

impl<T: SpaceMembershipLookup + ?Sized> SpaceMembershipLookup for &T {
    fn space_role(&self, space: &SpaceId, identity: &IdentityId) -> Result<SpaceRole, LookupError> {
        (**self).space_role(space, identity)
    }

    fn space_visibility(&self, space: &SpaceId) -> Result<Option<SpaceVisibility>, LookupError> {
        (**self).space_visibility(space)
    }
}
