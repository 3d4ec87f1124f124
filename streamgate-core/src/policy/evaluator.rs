//! The access policy evaluator

use super::action::AccessRequest;
use super::decision::{Decision, DecisionReason};
use super::error::{PolicyError, ReferenceKind};
use crate::identity::IdentityId;
use crate::metrics;
use crate::relationship::RelationshipLookup;
use crate::space::{SpaceId, SpaceMembershipLookup, SpaceRole};
use crate::stream::{
    Activity, ActivityId, Comment, CommentId, ContentRef, StreamKind, StreamOwner, StreamResolver,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Tunables for rules that are extension points rather than fixed behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyOptions {
    /// Limit views of private and hidden space streams to members
    pub restrict_space_views: bool,
}

impl Default for PolicyOptions {
    fn default() -> Self {
        Self {
            restrict_space_views: true,
        }
    }
}

/// Stateless access policy over three read models
///
/// Every check reads whatever the collaborators return at that instant. Two
/// checks are not atomic with respect to each other.
#[derive(Debug, Clone)]
pub struct AccessPolicy<R, M, S> {
    relationships: R,
    spaces: M,
    streams: S,
    options: PolicyOptions,
}

impl<R, M, S> AccessPolicy<R, M, S>
where
    R: RelationshipLookup,
    M: SpaceMembershipLookup,
    S: StreamResolver,
{
    pub fn new(relationships: R, spaces: M, streams: S) -> Self {
        Self {
            relationships,
            spaces,
            streams,
            options: PolicyOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PolicyOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &PolicyOptions {
        &self.options
    }

    /// Can `actor` see `activity`?
    pub fn can_view(&self, actor: &IdentityId, activity: &ActivityId) -> Result<bool, PolicyError> {
        self.is_allowed(actor, &AccessRequest::View(activity.clone()))
    }

    /// Can `actor` post into the stream owned by `target`?
    pub fn can_post(&self, actor: &IdentityId, target: &IdentityId) -> Result<bool, PolicyError> {
        self.is_allowed(actor, &AccessRequest::Post(target.clone()))
    }

    /// Can `actor` comment on `activity`?
    pub fn can_comment(
        &self,
        actor: &IdentityId,
        activity: &ActivityId,
    ) -> Result<bool, PolicyError> {
        self.is_allowed(actor, &AccessRequest::Comment(activity.clone()))
    }

    /// Can `actor` delete an activity or comment?
    pub fn can_delete(&self, actor: &IdentityId, content: &ContentRef) -> Result<bool, PolicyError> {
        self.is_allowed(actor, &AccessRequest::Delete(content.clone()))
    }

    pub fn can_delete_comment(
        &self,
        actor: &IdentityId,
        comment: &CommentId,
    ) -> Result<bool, PolicyError> {
        self.can_delete(actor, &ContentRef::Comment(comment.clone()))
    }

    fn is_allowed(&self, actor: &IdentityId, request: &AccessRequest) -> Result<bool, PolicyError> {
        self.evaluate(actor, request).map(|d| d.allowed)
    }

    /// Evaluate a request and report which rule decided it
    pub fn evaluate(
        &self,
        actor: &IdentityId,
        request: &AccessRequest,
    ) -> Result<Decision, PolicyError> {
        let action = request.action();
        let timer = metrics::Timer::start(action);
        let result = self.decide(actor, request);
        timer.stop();

        match result {
            Ok(decision) => {
                debug!(
                    actor = %actor,
                    request = %request,
                    allowed = decision.allowed,
                    reason = %decision.reason,
                    "access decision"
                );
                metrics::record_decision(action, decision.allowed);
                Ok(decision)
            }
            Err(e) => {
                warn!(actor = %actor, request = %request, error = %e, "access check failed");
                metrics::record_check_failure(action);
                Err(e)
            }
        }
    }

    fn decide(&self, actor: &IdentityId, request: &AccessRequest) -> Result<Decision, PolicyError> {
        self.require_identity(actor)?;

        match request {
            AccessRequest::View(id) => {
                let activity = self.require_activity(id)?;
                match self.streams.stream_owner(&activity.stream)? {
                    Some(owner) => self.view_rule(actor, &owner),
                    None => Ok(Decision::deny(DecisionReason::DanglingReference)),
                }
            }
            AccessRequest::Post(target) => {
                let owner = self
                    .streams
                    .stream_owner(target)?
                    .ok_or_else(|| PolicyError::unresolvable(ReferenceKind::Identity, target))?;
                self.post_rule(actor, &owner)
            }
            AccessRequest::Comment(id) => {
                let activity = self.require_activity(id)?;
                if actor == &activity.author {
                    return Ok(Decision::allow(DecisionReason::Author));
                }
                match self.streams.stream_owner(&activity.stream)? {
                    Some(owner) => self.comment_rule(actor, &owner),
                    None => Ok(Decision::deny(DecisionReason::DanglingReference)),
                }
            }
            AccessRequest::Delete(content) => self.delete_content(actor, content),
        }
    }

    fn delete_content(
        &self,
        actor: &IdentityId,
        content: &ContentRef,
    ) -> Result<Decision, PolicyError> {
        let (author, stream) = match content {
            ContentRef::Activity(id) => {
                let activity = self.require_activity(id)?;
                (activity.author, Some(activity.stream))
            }
            ContentRef::Comment(id) => {
                let comment = self.require_comment(id)?;
                let parent = self.streams.activity(&comment.activity)?;
                (comment.author, parent.map(|a| a.stream))
            }
        };

        // Authors may always retract, even when the stream is gone.
        if actor == &author {
            return Ok(Decision::allow(DecisionReason::Author));
        }

        let owner = match stream {
            Some(stream) => self.streams.stream_owner(&stream)?,
            None => None,
        };
        match owner {
            Some(owner) => self.delete_rule(actor, &owner),
            None => Ok(Decision::deny(DecisionReason::DanglingReference)),
        }
    }

    fn view_rule(&self, actor: &IdentityId, owner: &StreamOwner) -> Result<Decision, PolicyError> {
        match &owner.kind {
            StreamKind::Individual => Ok(Decision::allow(DecisionReason::PublicStream)),
            StreamKind::Space(space) => {
                if actor == &owner.identity {
                    return Ok(Decision::allow(DecisionReason::StreamOwner));
                }
                let Some(visibility) = self.spaces.space_visibility(space)? else {
                    return Ok(Decision::deny(DecisionReason::DanglingReference));
                };
                if !(visibility.is_restricted() && self.options.restrict_space_views) {
                    return Ok(Decision::allow(DecisionReason::PublicStream));
                }
                let role = self.role(space, actor)?;
                Ok(Decision::when(
                    role.is_member(),
                    DecisionReason::SpaceMember,
                    DecisionReason::NotSpaceMember,
                ))
            }
        }
    }

    fn post_rule(&self, actor: &IdentityId, owner: &StreamOwner) -> Result<Decision, PolicyError> {
        if actor == &owner.identity {
            return Ok(Decision::allow(DecisionReason::SelfStream));
        }
        self.participation_rule(actor, owner)
    }

    fn comment_rule(&self, actor: &IdentityId, owner: &StreamOwner) -> Result<Decision, PolicyError> {
        if actor == &owner.identity {
            return Ok(Decision::allow(DecisionReason::StreamOwner));
        }
        self.participation_rule(actor, owner)
    }

    /// Shared by post and comment: connected individuals, or space members
    fn participation_rule(
        &self,
        actor: &IdentityId,
        owner: &StreamOwner,
    ) -> Result<Decision, PolicyError> {
        match &owner.kind {
            StreamKind::Individual => {
                let status = self.relationships.relationship_status(actor, &owner.identity)?;
                Ok(Decision::when(
                    status.is_confirmed(),
                    DecisionReason::ConfirmedRelationship,
                    DecisionReason::NoConfirmedRelationship,
                ))
            }
            StreamKind::Space(space) => {
                let role = self.role(space, actor)?;
                Ok(Decision::when(
                    role.is_member(),
                    DecisionReason::SpaceMember,
                    DecisionReason::NotSpaceMember,
                ))
            }
        }
    }

    fn delete_rule(&self, actor: &IdentityId, owner: &StreamOwner) -> Result<Decision, PolicyError> {
        match &owner.kind {
            StreamKind::Individual => Ok(Decision::when(
                actor == &owner.identity,
                DecisionReason::StreamOwner,
                DecisionReason::NotStreamOwner,
            )),
            StreamKind::Space(space) => {
                let role = self.role(space, actor)?;
                Ok(Decision::when(
                    role.is_manager(),
                    DecisionReason::SpaceManager,
                    DecisionReason::NotSpaceManager,
                ))
            }
        }
    }

    fn role(&self, space: &SpaceId, actor: &IdentityId) -> Result<SpaceRole, PolicyError> {
        Ok(self.spaces.space_role(space, actor)?)
    }

    fn require_identity(&self, id: &IdentityId) -> Result<(), PolicyError> {
        match self.streams.identity(id)? {
            Some(_) => Ok(()),
            None => Err(PolicyError::unresolvable(ReferenceKind::Identity, id)),
        }
    }

    fn require_activity(&self, id: &ActivityId) -> Result<Activity, PolicyError> {
        self.streams
            .activity(id)?
            .ok_or_else(|| PolicyError::unresolvable(ReferenceKind::Activity, id))
    }

    fn require_comment(&self, id: &CommentId) -> Result<Comment, PolicyError> {
        self.streams
            .comment(id)?
            .ok_or_else(|| PolicyError::unresolvable(ReferenceKind::Comment, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LookupError;
    use crate::identity::Identity;
    use crate::relationship::RelationshipStatus;
    use crate::space::{Space, SpaceVisibility};
    use crate::store::MemorySocialStore;
    use std::sync::Arc;

    type Policy = AccessPolicy<Arc<MemorySocialStore>, Arc<MemorySocialStore>, Arc<MemorySocialStore>>;

    fn setup() -> (Arc<MemorySocialStore>, Policy) {
        let store = Arc::new(MemorySocialStore::new());
        let policy = AccessPolicy::new(store.clone(), store.clone(), store.clone());
        (store, policy)
    }

    fn user(store: &MemorySocialStore, name: &str) -> IdentityId {
        store
            .create_identity(Identity::user(name).with_id(IdentityId::new(name)))
            .unwrap()
            .id
    }

    fn space_stream(store: &MemorySocialStore, space: Space) -> IdentityId {
        let identity = Identity::space(space.id.as_str());
        store.save_space(space).unwrap();
        store.create_identity(identity).unwrap().id
    }

    #[test]
    fn test_self_post_allowed() {
        let (store, policy) = setup();
        let demo = user(&store, "demo");

        let decision = policy.evaluate(&demo, &AccessRequest::Post(demo.clone())).unwrap();
        assert_eq!(decision, Decision::allow(DecisionReason::SelfStream));
    }

    #[test]
    fn test_post_requires_confirmed_relationship() {
        let (store, policy) = setup();
        let demo = user(&store, "demo");
        let mary = user(&store, "mary");

        assert!(!policy.can_post(&demo, &mary).unwrap());

        store.invite(&demo, &mary).unwrap();
        assert!(!policy.can_post(&demo, &mary).unwrap());
        assert!(!policy.can_post(&mary, &demo).unwrap());

        store.confirm(&mary, &demo).unwrap();
        assert!(policy.can_post(&demo, &mary).unwrap());
        assert!(policy.can_post(&mary, &demo).unwrap());
    }

    #[test]
    fn test_space_post_requires_membership() {
        let (store, policy) = setup();
        let demo = user(&store, "demo");
        let mary = user(&store, "mary");
        let john = user(&store, "john");
        let mut space = Space::new("my space 1", demo.clone());
        space.add_member(mary.clone()).unwrap();
        space.invite(john.clone()).unwrap();
        let stream = space_stream(&store, space);

        assert!(policy.can_post(&demo, &stream).unwrap());
        assert!(policy.can_post(&mary, &stream).unwrap());
        assert!(!policy.can_post(&john, &stream).unwrap());
    }

    #[test]
    fn test_view_individual_stream_is_public() {
        let (store, policy) = setup();
        let demo = user(&store, "demo");
        let john = user(&store, "john");
        let activity = store.post_activity(&demo, &demo, "title 0").unwrap();

        let decision = policy.evaluate(&john, &AccessRequest::View(activity.id)).unwrap();
        assert_eq!(decision, Decision::allow(DecisionReason::PublicStream));
    }

    #[test]
    fn test_view_private_space_limited_to_members() {
        let (store, policy) = setup();
        let demo = user(&store, "demo");
        let john = user(&store, "john");
        let space = Space::new("secret", demo.clone()).with_visibility(SpaceVisibility::Private);
        let stream = space_stream(&store, space);
        let activity = store.post_activity(&demo, &stream, "hush").unwrap();

        assert!(policy.can_view(&demo, &activity.id).unwrap());
        assert!(!policy.can_view(&john, &activity.id).unwrap());

        let relaxed = policy.clone().with_options(PolicyOptions {
            restrict_space_views: false,
        });
        assert!(relaxed.can_view(&john, &activity.id).unwrap());
    }

    #[test]
    fn test_delete_by_author_survives_missing_stream() {
        let (store, policy) = setup();
        let demo = user(&store, "demo");
        let mary = user(&store, "mary");
        let john = user(&store, "john");
        let activity = store.post_activity(&demo, &john, "title 0").unwrap();
        let comment = store.save_comment(&activity.id, &mary, "comment 0").unwrap();

        store.delete_identity(&john).unwrap();

        assert!(policy.can_delete_comment(&mary, &comment.id).unwrap());
        let decision = policy
            .evaluate(&demo, &AccessRequest::Delete(comment.id.clone().into()))
            .unwrap();
        assert_eq!(decision, Decision::deny(DecisionReason::DanglingReference));
        assert!(!policy.can_comment(&mary, &activity.id).unwrap());
    }

    #[test]
    fn test_unknown_actor_is_an_error() {
        let (store, policy) = setup();
        let demo = user(&store, "demo");

        let err = policy.can_post(&IdentityId::new("ghost"), &demo).unwrap_err();
        assert_eq!(
            err,
            PolicyError::UnresolvableReference {
                kind: ReferenceKind::Identity,
                id: "ghost".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_content_is_an_error() {
        let (store, policy) = setup();
        let demo = user(&store, "demo");

        let err = policy.can_view(&demo, &ActivityId::new("missing")).unwrap_err();
        assert!(matches!(
            err,
            PolicyError::UnresolvableReference {
                kind: ReferenceKind::Activity,
                ..
            }
        ));
    }

    struct FailingRelationships;

    impl RelationshipLookup for FailingRelationships {
        fn relationship_status(
            &self,
            _a: &IdentityId,
            _b: &IdentityId,
        ) -> Result<RelationshipStatus, LookupError> {
            Err(LookupError::Unavailable("relationship store offline".to_string()))
        }
    }

    #[test]
    fn test_lookup_failure_propagates() {
        let store = Arc::new(MemorySocialStore::new());
        let demo = user(&store, "demo");
        let mary = user(&store, "mary");
        let policy = AccessPolicy::new(FailingRelationships, store.clone(), store.clone());

        let err = policy.can_post(&demo, &mary).unwrap_err();
        assert_eq!(
            err,
            PolicyError::Lookup(LookupError::Unavailable(
                "relationship store offline".to_string()
            ))
        );

        // Self-post never consults relationships.
        assert!(policy.can_post(&demo, &demo).unwrap());
    }

    struct FailingSpaces;

    impl SpaceMembershipLookup for FailingSpaces {
        fn space_role(
            &self,
            _space: &SpaceId,
            _identity: &IdentityId,
        ) -> Result<SpaceRole, LookupError> {
            Err(LookupError::Backend("membership store offline".to_string()))
        }

        fn space_visibility(
            &self,
            _space: &SpaceId,
        ) -> Result<Option<SpaceVisibility>, LookupError> {
            Err(LookupError::Backend("membership store offline".to_string()))
        }
    }

    struct FailingStreams;

    impl StreamResolver for FailingStreams {
        fn identity(&self, _id: &IdentityId) -> Result<Option<Identity>, LookupError> {
            Err(LookupError::Unavailable("stream store offline".to_string()))
        }

        fn activity(&self, _id: &ActivityId) -> Result<Option<Activity>, LookupError> {
            Err(LookupError::Unavailable("stream store offline".to_string()))
        }

        fn comment(&self, _id: &CommentId) -> Result<Option<Comment>, LookupError> {
            Err(LookupError::Unavailable("stream store offline".to_string()))
        }
    }

    #[test]
    fn test_membership_failure_propagates() {
        let store = Arc::new(MemorySocialStore::new());
        let mary = user(&store, "mary");
        let john = user(&store, "john");
        let space =
            Space::new("my space 1", mary.clone()).with_visibility(SpaceVisibility::Private);
        let stream = space_stream(&store, space);
        let activity = store.post_activity(&mary, &stream, "hello").unwrap();
        let policy = AccessPolicy::new(store.clone(), FailingSpaces, store.clone());

        let expected =
            PolicyError::Lookup(LookupError::Backend("membership store offline".to_string()));
        assert_eq!(policy.can_view(&john, &activity.id).unwrap_err(), expected);
        assert_eq!(policy.can_post(&john, &stream).unwrap_err(), expected);
        assert_eq!(policy.can_comment(&john, &activity.id).unwrap_err(), expected);
        assert_eq!(
            policy
                .can_delete(&john, &ContentRef::Activity(activity.id.clone()))
                .unwrap_err(),
            expected
        );

        // Authors delete without consulting memberships.
        assert!(policy
            .can_delete(&mary, &ContentRef::Activity(activity.id))
            .unwrap());
    }

    #[test]
    fn test_stream_failure_propagates() {
        let store = Arc::new(MemorySocialStore::new());
        let demo = user(&store, "demo");
        let activity = store.post_activity(&demo, &demo, "hello").unwrap();
        let comment = store.save_comment(&activity.id, &demo, "first").unwrap();
        let policy = AccessPolicy::new(store.clone(), store.clone(), FailingStreams);

        let expected =
            PolicyError::Lookup(LookupError::Unavailable("stream store offline".to_string()));
        assert_eq!(policy.can_view(&demo, &activity.id).unwrap_err(), expected);
        assert_eq!(policy.can_post(&demo, &demo).unwrap_err(), expected);
        assert_eq!(policy.can_comment(&demo, &activity.id).unwrap_err(), expected);
        assert_eq!(policy.can_delete_comment(&demo, &comment.id).unwrap_err(), expected);
    }

    #[test]
    fn test_poisoned_store_surfaces_as_unavailable() {
        let (store, policy) = setup();
        let demo = user(&store, "demo");
        let activity = store.post_activity(&demo, &demo, "hello").unwrap();
        let space = Space::new("my space 1", demo.clone());
        let space_id = space.id.clone();
        store.save_space(space).unwrap();

        // A panic inside the update closure happens under the write lock.
        let poisoner = store.clone();
        let _ = std::thread::spawn(move || {
            let _ = poisoner.update_space(&space_id, |_| panic!("writer crashed"));
        })
        .join();

        assert_eq!(
            policy.can_view(&demo, &activity.id).unwrap_err(),
            PolicyError::Lookup(LookupError::Unavailable("Store lock poisoned".to_string()))
        );
    }
}
