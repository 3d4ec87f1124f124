//! Read-model contract for relationship status

use super::model::RelationshipStatus;
use crate::error::LookupError;
use crate::identity::IdentityId;
use std::sync::Arc;

/// Answers "how are these two identities connected?"
///
/// Implementations must be symmetric: `relationship_status(a, b)` and
/// `relationship_status(b, a)` return the same status. No record means
/// [`RelationshipStatus::None`].
pub trait RelationshipLookup {
    fn relationship_status(
        &self,
        a: &IdentityId,
        b: &IdentityId,
    ) -> Result<RelationshipStatus, LookupError>;
}

impl<T: RelationshipLookup + ?Sized> RelationshipLookup for Arc<T> {
    fn relationship_status(
        &self,
        a: &IdentityId,
        b: &IdentityId,
    ) -> Result<RelationshipStatus, LookupError> {
        (**self).relationship_status(a, b)
    }
}

impl<T: RelationshipLookup + ?Sized> RelationshipLookup for &T {
    fn relationship_status(
        &self,
        a: &IdentityId,
        b: &IdentityId,
    ) -> Result<RelationshipStatus, LookupError> {
        (**self).relationship_status(a, b)
    }
}
