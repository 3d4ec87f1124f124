//! Access policy for social activity streams.
//!
//! [`AccessPolicy`] answers whether an identity may view, post, comment on or
//! delete content, reading relationships, space memberships and stream
//! ownership through the lookup traits. [`MemorySocialStore`] implements all
//! three lookups in memory and can be loaded from a [`SocialSnapshot`].

pub mod config;
pub mod error;
pub mod identity;
pub mod logging;
pub mod metrics;
pub mod policy;
pub mod relationship;
pub mod space;
pub mod store;
pub mod stream;
pub mod test_utils;

pub use config::Config;
pub use error::LookupError;
pub use identity::{Identity, IdentityId, IdentityProvider};
pub use logging::{init_logging, LogLevel};
pub use policy::{AccessPolicy, AccessRequest, Action, Decision, DecisionReason, PolicyError, PolicyOptions};
pub use relationship::{RelationshipLookup, RelationshipStatus};
pub use space::{SpaceId, SpaceMembershipLookup, SpaceRole, SpaceVisibility};
pub use store::{MemorySocialStore, SocialSnapshot, StoreError};
pub use stream::{ActivityId, CommentId, ContentRef, StreamResolver};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let _ = LogLevel::Info;
        let _ = Action::ALL;
        let _: AccessPolicy<MemorySocialStore, MemorySocialStore, MemorySocialStore> =
            AccessPolicy::new(
                MemorySocialStore::new(),
                MemorySocialStore::new(),
                MemorySocialStore::new(),
            );
    }
}
