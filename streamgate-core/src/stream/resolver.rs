//! Read-model contract for resolving content to its owning stream

use super::content::{Activity, ActivityId, Comment, CommentId};
use crate::error::LookupError;
use crate::identity::{Identity, IdentityId, IdentityProvider};
use crate::space::SpaceId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Whether a stream belongs to a person or to a space
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "space", rename_all = "lowercase")]
pub enum StreamKind {
    Individual,
    Space(SpaceId),
}

/// The identity owning a stream, tagged with its kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamOwner {
    pub identity: IdentityId,
    pub kind: StreamKind,
}

impl StreamOwner {
    pub fn of(identity: &Identity) -> Self {
        let kind = match identity.provider {
            IdentityProvider::Organization => StreamKind::Individual,
            IdentityProvider::Space => StreamKind::Space(SpaceId::new(identity.remote_id.clone())),
        };
        StreamOwner {
            identity: identity.id.clone(),
            kind,
        }
    }

    pub fn is_space(&self) -> bool {
        matches!(self.kind, StreamKind::Space(_))
    }
}

/// Resolves identities and content to the facts the evaluator needs
///
/// Each lookup returns `Ok(None)` for a record that does not exist and
/// `Err` only when the backing store itself fails.
pub trait StreamResolver {
    fn identity(&self, id: &IdentityId) -> Result<Option<Identity>, LookupError>;

    fn activity(&self, id: &ActivityId) -> Result<Option<Activity>, LookupError>;

    fn comment(&self, id: &CommentId) -> Result<Option<Comment>, LookupError>;

    /// Owner of the stream identified by `identity`
    fn stream_owner(&self, identity: &IdentityId) -> Result<Option<StreamOwner>, LookupError> {
        Ok(self.identity(identity)?.as_ref().map(StreamOwner::of))
    }
}

impl<T: StreamResolver + ?Sized> StreamResolver for Arc<T> {
    fn identity(&self, id: &IdentityId) -> Result<Option<Identity>, LookupError> {
        (**self).identity(id)
    }

    fn activity(&self, id: &ActivityId) -> Result<Option<Activity>, LookupError> {
        (**self).activity(id)
    }

    fn comment(&self, id: &CommentId) -> Result<Option<Comment>, LookupError> {
        (**self).comment(id)
    }

    fn stream_owner(&self, identity: &IdentityId) -> Result<Option<StreamOwner>, LookupError> {
        (**self).stream_owner(identity)
    }
}

impl<T: StreamResolver + ?Sized> StreamResolver for &T {
    fn identity(&self, id: &IdentityId) -> Result<Option<Identity>, LookupError> {
        (**self).identity(id)
    }

    fn activity(&self, id: &ActivityId) -> Result<Option<Activity>, LookupError> {
        (**self).activity(id)
    }

    fn comment(&self, id: &CommentId) -> Result<Option<Comment>, LookupError> {
        (**self).comment(id)
    }

    fn stream_owner(&self, identity: &IdentityId) -> Result<Option<StreamOwner>, LookupError> {
        (**self).stream_owner(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_owner_kind_follows_provider() {
        let user = Identity::user("demo");
        let space = Identity::space("my_space_1");

        assert_eq!(StreamOwner::of(&user).kind, StreamKind::Individual);
        assert_eq!(
            StreamOwner::of(&space).kind,
            StreamKind::Space(SpaceId::new("my_space_1"))
        );
        assert!(StreamOwner::of(&space).is_space());
    }
}
