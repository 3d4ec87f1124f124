//! Test fixtures for social graphs
//!
//! [`SocialFixture`] wraps a shared [`MemorySocialStore`] and creates users,
//! spaces, relationships and content with readable ids, so tests can refer
//! to `"mary"` instead of a generated uuid.

use crate::identity::{Identity, IdentityId, IdentityProvider, Timestamp};
use crate::policy::AccessPolicy;
use crate::space::{Space, SpaceVisibility};
use crate::store::MemorySocialStore;
use crate::stream::{Activity, ActivityId, CommentId};
use std::sync::Arc;

/// Policy type used throughout the tests
pub type SharedPolicy =
    AccessPolicy<Arc<MemorySocialStore>, Arc<MemorySocialStore>, Arc<MemorySocialStore>>;

/// Managers of the space created by [`SocialFixture::create_space`]
pub const SPACE_MANAGERS: [&str; 2] = ["demo", "tom"];

/// Members (not managers) of the space created by [`SocialFixture::create_space`]
pub const SPACE_MEMBERS: [&str; 5] = ["raul", "ghost", "dragon", "demo", "mary"];

/// Identities holding an open invitation to the fixture space
pub const SPACE_INVITED: [&str; 2] = ["register1", "john"];

/// Identities with a pending join request on the fixture space
pub const SPACE_PENDING: [&str; 3] = ["jame", "paul", "hacker"];

/// Builder over an in-memory store
pub struct SocialFixture {
    store: Arc<MemorySocialStore>,
    clock: u64,
}

impl SocialFixture {
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemorySocialStore::new()),
            clock: 1_000,
        }
    }

    /// Fixture with the usual cast of users: root, john, mary and demo
    pub fn with_default_users() -> Self {
        let fixture = Self::new();
        for name in ["root", "john", "mary", "demo"] {
            fixture.user(name);
        }
        fixture
    }

    pub fn store(&self) -> &Arc<MemorySocialStore> {
        &self.store
    }

    pub fn policy(&self) -> SharedPolicy {
        AccessPolicy::new(self.store.clone(), self.store.clone(), self.store.clone())
    }

    /// Get or create an individual whose id equals its remote id
    pub fn user(&self, name: &str) -> IdentityId {
        if let Some(existing) = self
            .store
            .find_identity(IdentityProvider::Organization, name)
            .unwrap()
        {
            return existing.id;
        }
        self.store
            .create_identity(Identity::user(name).with_id(IdentityId::new(name)))
            .unwrap()
            .id
    }

    /// Create a space plus its stream identity and return the stream id.
    ///
    /// Managers are [`SPACE_MANAGERS`], members [`SPACE_MEMBERS`], with
    /// [`SPACE_INVITED`] and [`SPACE_PENDING`] holding no role.
    pub fn create_space(&self, display_name: &str, visibility: SpaceVisibility) -> IdentityId {
        let mut space = Space::new(display_name, IdentityId::new(SPACE_MANAGERS[0]))
            .with_visibility(visibility);
        for name in SPACE_MANAGERS {
            self.user(name);
            space.add_manager(IdentityId::new(name));
        }
        for name in SPACE_MEMBERS {
            self.user(name);
            if !SPACE_MANAGERS.contains(&name) {
                space.add_member(IdentityId::new(name)).unwrap();
            }
        }
        for name in SPACE_INVITED {
            self.user(name);
            space.invite(IdentityId::new(name)).unwrap();
        }
        for name in SPACE_PENDING {
            self.user(name);
            space.request_to_join(IdentityId::new(name)).unwrap();
        }

        let stream = Identity::space(space.id.as_str())
            .with_id(IdentityId::new(format!("space:{}", space.id)));
        self.store.save_space(space).unwrap();
        self.store.create_identity(stream).unwrap().id
    }

    /// Connect two users; `confirmed = false` leaves the invitation pending
    pub fn connect(&self, sender: &str, receiver: &str, confirmed: bool) {
        let sender = self.user(sender);
        let receiver = self.user(receiver);
        self.store.invite(&sender, &receiver).unwrap();
        if confirmed {
            self.store.confirm(&receiver, &sender).unwrap();
        }
    }

    /// Post `count` activities by `author` into `stream`, oldest first
    pub fn create_activities(
        &mut self,
        count: usize,
        author: &IdentityId,
        stream: &IdentityId,
    ) -> Vec<ActivityId> {
        (0..count)
            .map(|i| {
                let mut activity =
                    Activity::new(author.clone(), stream.clone(), format!("activity {i}"));
                activity.posted_at = self.tick();
                self.store.save_activity(activity).unwrap().id
            })
            .collect()
    }

    pub fn create_activity(&mut self, author: &IdentityId, stream: &IdentityId) -> ActivityId {
        self.create_activities(1, author, stream).remove(0)
    }

    pub fn create_comment(&self, activity: &ActivityId, author: &IdentityId) -> CommentId {
        self.store
            .save_comment(activity, author, &format!("comment by {author}"))
            .unwrap()
            .id
    }

    fn tick(&mut self) -> Timestamp {
        self.clock += 1;
        Timestamp::from_millis(self.clock)
    }
}

impl Default for SocialFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::{SpaceId, SpaceMembershipLookup, SpaceRole};

    #[test]
    fn test_user_is_idempotent() {
        let fixture = SocialFixture::new();
        assert_eq!(fixture.user("mary"), fixture.user("mary"));
        assert_eq!(fixture.store().snapshot().unwrap().identities.len(), 1);
    }

    #[test]
    fn test_space_roles() {
        let fixture = SocialFixture::with_default_users();
        fixture.create_space("my space 1", SpaceVisibility::Public);
        let space = SpaceId::new("my_space_1");
        let store = fixture.store();

        assert_eq!(store.space_role(&space, &"tom".into()).unwrap(), SpaceRole::Manager);
        assert_eq!(store.space_role(&space, &"raul".into()).unwrap(), SpaceRole::Member);
        assert_eq!(store.space_role(&space, &"john".into()).unwrap(), SpaceRole::None);
        assert_eq!(store.space_role(&space, &"hacker".into()).unwrap(), SpaceRole::None);
    }

    #[test]
    fn test_activities_get_increasing_timestamps() {
        let mut fixture = SocialFixture::with_default_users();
        let root = IdentityId::new("root");
        let ids = fixture.create_activities(3, &root, &root);

        let listed: Vec<ActivityId> = fixture
            .store()
            .activities_of(&root)
            .unwrap()
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(listed, ids.into_iter().rev().collect::<Vec<_>>());
    }
}
