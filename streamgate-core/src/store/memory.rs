/*
    memory.rs - Thread-safe in-memory social graph

    Holds every entity behind one RwLock so each lookup sees a consistent
    view. Insertion sequence numbers break ties between equal timestamps,
    which keeps comment listings oldest-first even within one millisecond.
*/

use super::errors::{StoreError, StoreResult};
use super::snapshot::SocialSnapshot;
use crate::error::LookupError;
use crate::identity::{Identity, IdentityId, IdentityProvider};
use crate::relationship::{Relationship, RelationshipError, RelationshipLookup, RelationshipStatus};
use crate::space::{Space, SpaceError, SpaceId, SpaceMembershipLookup, SpaceRole, SpaceVisibility};
use crate::stream::{Activity, ActivityId, Comment, CommentId, StreamResolver};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

/// Helper to convert poison errors into StoreError
fn handle_poison<T>(_err: PoisonError<T>) -> StoreError {
    StoreError::Poisoned
}

/// Order-independent key for a pair of identities
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PairKey(IdentityId, IdentityId);

impl PairKey {
    fn new(a: &IdentityId, b: &IdentityId) -> Self {
        if a <= b {
            PairKey(a.clone(), b.clone())
        } else {
            PairKey(b.clone(), a.clone())
        }
    }
}

#[derive(Debug, Clone)]
struct Sequenced<T> {
    seq: u64,
    value: T,
}

#[derive(Debug, Default)]
struct Graph {
    identities: HashMap<IdentityId, Identity>,
    spaces: HashMap<SpaceId, Space>,
    relationships: HashMap<PairKey, Relationship>,
    activities: HashMap<ActivityId, Sequenced<Activity>>,
    comments: HashMap<CommentId, Sequenced<Comment>>,
    next_seq: u64,
}

impl Graph {
    fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    fn require_identity(&self, id: &IdentityId) -> StoreResult<()> {
        if self.identities.contains_key(id) {
            Ok(())
        } else {
            Err(StoreError::NotFound(format!("identity {}", id)))
        }
    }

    /// Relationships only connect individuals
    fn require_individual(&self, id: &IdentityId) -> StoreResult<()> {
        match self.identities.get(id) {
            Some(identity) if identity.is_space() => {
                Err(RelationshipError::NotIndividual(id.clone()).into())
            }
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(format!("identity {}", id))),
        }
    }

    fn insert_identity(&mut self, identity: Identity) -> StoreResult<Identity> {
        if self.identities.contains_key(&identity.id) {
            return Err(StoreError::DuplicateIdentity(identity.id));
        }
        let taken = self
            .identities
            .values()
            .any(|i| i.provider == identity.provider && i.remote_id == identity.remote_id);
        if taken {
            return Err(StoreError::DuplicateRemoteId {
                provider: identity.provider,
                remote_id: identity.remote_id,
            });
        }

        self.identities.insert(identity.id.clone(), identity.clone());
        Ok(identity)
    }

    fn insert_activity(&mut self, activity: Activity) -> StoreResult<Activity> {
        if self.activities.contains_key(&activity.id) {
            return Err(StoreError::DuplicateRecord(format!("activity {}", activity.id)));
        }
        self.require_identity(&activity.author)?;
        self.require_identity(&activity.stream)?;

        let seq = self.next_seq();
        self.activities.insert(
            activity.id.clone(),
            Sequenced {
                seq,
                value: activity.clone(),
            },
        );
        Ok(activity)
    }

    fn insert_comment(&mut self, comment: Comment) -> StoreResult<Comment> {
        if self.comments.contains_key(&comment.id) {
            return Err(StoreError::DuplicateRecord(format!("comment {}", comment.id)));
        }
        if !self.activities.contains_key(&comment.activity) {
            return Err(StoreError::NotFound(format!("activity {}", comment.activity)));
        }
        self.require_identity(&comment.author)?;

        let seq = self.next_seq();
        self.comments.insert(
            comment.id.clone(),
            Sequenced {
                seq,
                value: comment.clone(),
            },
        );
        Ok(comment)
    }
}

/// In-memory implementation of every read model the evaluator uses
#[derive(Debug, Default)]
pub struct MemorySocialStore {
    graph: RwLock<Graph>,
}

impl MemorySocialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a snapshot, rejecting duplicate or dangling records
    pub fn from_snapshot(snapshot: SocialSnapshot) -> StoreResult<Self> {
        let store = Self::new();
        {
            let mut graph = store.write()?;

            for identity in snapshot.identities {
                graph.insert_identity(identity)?;
            }

            for space in snapshot.spaces {
                if graph.spaces.contains_key(&space.id) {
                    return Err(StoreError::DuplicateRecord(format!("space {}", space.id)));
                }
                graph.spaces.insert(space.id.clone(), space);
            }

            for rel in snapshot.relationships {
                if rel.sender == rel.receiver {
                    return Err(RelationshipError::SelfRelationship(rel.sender).into());
                }
                graph.require_individual(&rel.sender)?;
                graph.require_individual(&rel.receiver)?;
                let key = PairKey::new(&rel.sender, &rel.receiver);
                if rel.status == RelationshipStatus::None {
                    continue;
                }
                if graph.relationships.insert(key, rel.clone()).is_some() {
                    return Err(RelationshipError::AlreadyExists(rel.sender, rel.receiver).into());
                }
            }

            for activity in snapshot.activities {
                graph.insert_activity(activity)?;
            }

            for comment in snapshot.comments {
                graph.insert_comment(comment)?;
            }

            info!(
                identities = graph.identities.len(),
                spaces = graph.spaces.len(),
                relationships = graph.relationships.len(),
                activities = graph.activities.len(),
                comments = graph.comments.len(),
                "loaded social snapshot"
            );
        }
        Ok(store)
    }

    /// Export the current contents
    ///
    /// Identities, spaces and relationships are sorted by id; activities and
    /// comments keep insertion order.
    pub fn snapshot(&self) -> StoreResult<SocialSnapshot> {
        let graph = self.read()?;

        let mut identities: Vec<Identity> = graph.identities.values().cloned().collect();
        identities.sort_by(|a, b| a.id.cmp(&b.id));
        let mut spaces: Vec<Space> = graph.spaces.values().cloned().collect();
        spaces.sort_by(|a, b| a.id.cmp(&b.id));
        let mut relationships: Vec<Relationship> = graph.relationships.values().cloned().collect();
        relationships.sort_by(|a, b| (&a.sender, &a.receiver).cmp(&(&b.sender, &b.receiver)));

        let mut activities: Vec<&Sequenced<Activity>> = graph.activities.values().collect();
        activities.sort_by_key(|s| s.seq);
        let mut comments: Vec<&Sequenced<Comment>> = graph.comments.values().collect();
        comments.sort_by_key(|s| s.seq);

        Ok(SocialSnapshot {
            identities,
            spaces,
            relationships,
            activities: activities.into_iter().map(|s| s.value.clone()).collect(),
            comments: comments.into_iter().map(|s| s.value.clone()).collect(),
        })
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Graph>> {
        self.graph.read().map_err(handle_poison)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Graph>> {
        self.graph.write().map_err(handle_poison)
    }

    // ---- identities ----

    pub fn create_identity(&self, identity: Identity) -> StoreResult<Identity> {
        let identity = self.write()?.insert_identity(identity)?;
        debug!(identity = %identity.id, provider = %identity.provider, "created identity");
        Ok(identity)
    }

    pub fn find_identity(
        &self,
        provider: IdentityProvider,
        remote_id: &str,
    ) -> StoreResult<Option<Identity>> {
        let graph = self.read()?;
        Ok(graph
            .identities
            .values()
            .find(|i| i.provider == provider && i.remote_id == remote_id)
            .cloned())
    }

    pub fn get_or_create_identity(
        &self,
        provider: IdentityProvider,
        remote_id: &str,
    ) -> StoreResult<Identity> {
        let mut graph = self.write()?;
        if let Some(existing) = graph
            .identities
            .values()
            .find(|i| i.provider == provider && i.remote_id == remote_id)
        {
            return Ok(existing.clone());
        }
        graph.insert_identity(Identity::new(provider, remote_id))
    }

    /// Delete an identity and every relationship it is part of.
    ///
    /// Content it authored or owns is left in place.
    pub fn delete_identity(&self, id: &IdentityId) -> StoreResult<Identity> {
        let mut graph = self.write()?;
        let identity = graph
            .identities
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(format!("identity {}", id)))?;
        graph.relationships.retain(|_, rel| !rel.involves(id));
        debug!(identity = %id, "deleted identity");
        Ok(identity)
    }

    // ---- spaces ----

    /// Insert or replace a space
    pub fn save_space(&self, space: Space) -> StoreResult<()> {
        debug!(space = %space.id, "saved space");
        self.write()?.spaces.insert(space.id.clone(), space);
        Ok(())
    }

    pub fn space(&self, id: &SpaceId) -> StoreResult<Option<Space>> {
        Ok(self.read()?.spaces.get(id).cloned())
    }

    /// Apply a change to a stored space
    pub fn update_space<F>(&self, id: &SpaceId, change: F) -> StoreResult<Space>
    where
        F: FnOnce(&mut Space) -> Result<(), SpaceError>,
    {
        let mut graph = self.write()?;
        let space = graph
            .spaces
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("space {}", id)))?;
        change(space)?;
        Ok(space.clone())
    }

    pub fn delete_space(&self, id: &SpaceId) -> StoreResult<Space> {
        self.write()?
            .spaces
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(format!("space {}", id)))
    }

    // ---- relationships ----

    /// `sender` invites `receiver` to connect
    pub fn invite(&self, sender: &IdentityId, receiver: &IdentityId) -> StoreResult<Relationship> {
        let mut graph = self.write()?;
        graph.require_individual(sender)?;
        graph.require_individual(receiver)?;

        let key = PairKey::new(sender, receiver);
        if graph.relationships.contains_key(&key) {
            return Err(RelationshipError::AlreadyExists(sender.clone(), receiver.clone()).into());
        }

        let rel = Relationship::invite(sender.clone(), receiver.clone())?;
        graph.relationships.insert(key, rel.clone());
        debug!(sender = %sender, receiver = %receiver, "relationship pending");
        Ok(rel)
    }

    /// `confirmer` accepts the invitation sent by `sender`
    pub fn confirm(&self, confirmer: &IdentityId, sender: &IdentityId) -> StoreResult<Relationship> {
        let mut graph = self.write()?;
        let rel = graph
            .relationships
            .get_mut(&PairKey::new(confirmer, sender))
            .ok_or_else(|| RelationshipError::NotFound(confirmer.clone(), sender.clone()))?;
        rel.confirm(confirmer)?;
        debug!(sender = %sender, receiver = %confirmer, "relationship confirmed");
        Ok(rel.clone())
    }

    /// Remove a pending or confirmed relationship
    pub fn remove_relationship(&self, a: &IdentityId, b: &IdentityId) -> StoreResult<Relationship> {
        let rel = self
            .write()?
            .relationships
            .remove(&PairKey::new(a, b))
            .ok_or_else(|| RelationshipError::NotFound(a.clone(), b.clone()))?;
        debug!(a = %a, b = %b, "relationship removed");
        Ok(rel)
    }

    pub fn relationship(&self, a: &IdentityId, b: &IdentityId) -> StoreResult<Option<Relationship>> {
        Ok(self.read()?.relationships.get(&PairKey::new(a, b)).cloned())
    }

    // ---- activities & comments ----

    /// `author` posts into the stream owned by `stream`
    pub fn post_activity(
        &self,
        author: &IdentityId,
        stream: &IdentityId,
        title: &str,
    ) -> StoreResult<Activity> {
        self.save_activity(Activity::new(author.clone(), stream.clone(), title))
    }

    pub fn save_activity(&self, activity: Activity) -> StoreResult<Activity> {
        self.write()?.insert_activity(activity)
    }

    /// Activities in a stream, newest first
    pub fn activities_of(&self, stream: &IdentityId) -> StoreResult<Vec<Activity>> {
        let graph = self.read()?;
        let mut found: Vec<&Sequenced<Activity>> = graph
            .activities
            .values()
            .filter(|s| &s.value.stream == stream)
            .collect();
        found.sort_by(|a, b| {
            (b.value.posted_at, b.seq).cmp(&(a.value.posted_at, a.seq))
        });
        Ok(found.into_iter().map(|s| s.value.clone()).collect())
    }

    pub fn save_comment(
        &self,
        activity: &ActivityId,
        author: &IdentityId,
        title: &str,
    ) -> StoreResult<Comment> {
        self.write()?
            .insert_comment(Comment::new(activity.clone(), author.clone(), title))
    }

    /// Comments on an activity, oldest first
    pub fn comments_of(&self, activity: &ActivityId) -> StoreResult<Vec<Comment>> {
        let graph = self.read()?;
        let mut found: Vec<&Sequenced<Comment>> = graph
            .comments
            .values()
            .filter(|s| &s.value.activity == activity)
            .collect();
        found.sort_by_key(|s| (s.value.posted_at, s.seq));
        Ok(found.into_iter().map(|s| s.value.clone()).collect())
    }

    /// Delete an activity together with its comments
    pub fn delete_activity(&self, id: &ActivityId) -> StoreResult<Activity> {
        let mut graph = self.write()?;
        let removed = graph
            .activities
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(format!("activity {}", id)))?;
        graph.comments.retain(|_, c| &c.value.activity != id);
        Ok(removed.value)
    }

    pub fn delete_comment(&self, id: &CommentId) -> StoreResult<Comment> {
        self.write()?
            .comments
            .remove(id)
            .map(|s| s.value)
            .ok_or_else(|| StoreError::NotFound(format!("comment {}", id)))
    }
}

impl RelationshipLookup for MemorySocialStore {
    fn relationship_status(
        &self,
        a: &IdentityId,
        b: &IdentityId,
    ) -> Result<RelationshipStatus, LookupError> {
        let graph = self.read()?;
        Ok(graph
            .relationships
            .get(&PairKey::new(a, b))
            .map(|rel| rel.status)
            .unwrap_or_default())
    }
}

impl SpaceMembershipLookup for MemorySocialStore {
    fn space_role(&self, space: &SpaceId, identity: &IdentityId) -> Result<SpaceRole, LookupError> {
        let graph = self.read()?;
        Ok(graph
            .spaces
            .get(space)
            .map(|s| s.role_of(identity))
            .unwrap_or_default())
    }

    fn space_visibility(&self, space: &SpaceId) -> Result<Option<SpaceVisibility>, LookupError> {
        Ok(self.read()?.spaces.get(space).map(|s| s.visibility))
    }
}

impl StreamResolver for MemorySocialStore {
    fn identity(&self, id: &IdentityId) -> Result<Option<Identity>, LookupError> {
        Ok(self.read()?.identities.get(id).cloned())
    }

    fn activity(&self, id: &ActivityId) -> Result<Option<Activity>, LookupError> {
        Ok(self.read()?.activities.get(id).map(|s| s.value.clone()))
    }

    fn comment(&self, id: &CommentId) -> Result<Option<Comment>, LookupError> {
        Ok(self.read()?.comments.get(id).map(|s| s.value.clone()))
    }
}
