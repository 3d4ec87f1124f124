//! Space data structures and operations

use super::types::SpaceId;
use crate::identity::{IdentityId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A Space groups identities around a shared stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Space {
    /// Pretty name, unique
    pub id: SpaceId,

    /// Human-readable name
    pub display_name: String,

    /// Visibility mode
    #[serde(default)]
    pub visibility: SpaceVisibility,

    /// How new members are admitted
    #[serde(default)]
    pub registration: SpaceRegistration,

    /// Privileged members who moderate the space
    #[serde(default)]
    pub managers: BTreeSet<IdentityId>,

    /// Ordinary members
    #[serde(default)]
    pub members: BTreeSet<IdentityId>,

    /// Invited by the space, not yet accepted
    #[serde(default)]
    pub invited: BTreeSet<IdentityId>,

    /// Asked to join, not yet validated
    #[serde(default)]
    pub pending: BTreeSet<IdentityId>,

    #[serde(default)]
    pub created_at: Timestamp,
}

impl Space {
    /// Create a new Space managed by `creator`
    pub fn new(display_name: impl Into<String>, creator: IdentityId) -> Self {
        let display_name = display_name.into();
        let mut space = Space {
            id: SpaceId::from_display_name(&display_name),
            display_name,
            visibility: SpaceVisibility::default(),
            registration: SpaceRegistration::default(),
            managers: BTreeSet::new(),
            members: BTreeSet::new(),
            invited: BTreeSet::new(),
            pending: BTreeSet::new(),
            created_at: Timestamp::now(),
        };
        space.managers.insert(creator.clone());
        space.members.insert(creator);
        space
    }

    pub fn with_visibility(mut self, visibility: SpaceVisibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_registration(mut self, registration: SpaceRegistration) -> Self {
        self.registration = registration;
        self
    }

    /// Add an ordinary member; clears any outstanding invitation or request
    pub fn add_member(&mut self, identity: IdentityId) -> Result<(), SpaceError> {
        if self.members.contains(&identity) {
            return Err(SpaceError::MemberAlreadyExists);
        }

        self.invited.remove(&identity);
        self.pending.remove(&identity);
        self.members.insert(identity);
        Ok(())
    }

    /// Grant the manager role, adding the identity as a member if needed
    pub fn add_manager(&mut self, identity: IdentityId) {
        self.invited.remove(&identity);
        self.pending.remove(&identity);
        self.members.insert(identity.clone());
        self.managers.insert(identity);
    }

    /// Drop the manager role but keep membership
    pub fn remove_manager(&mut self, identity: &IdentityId) -> Result<(), SpaceError> {
        if !self.managers.contains(identity) {
            return Err(SpaceError::NotManager);
        }
        if self.managers.len() == 1 {
            return Err(SpaceError::LastManager);
        }

        self.managers.remove(identity);
        Ok(())
    }

    /// Remove a member (and any manager role they held)
    pub fn remove_member(&mut self, identity: &IdentityId) -> Result<(), SpaceError> {
        if self.managers.contains(identity) && self.managers.len() == 1 {
            return Err(SpaceError::LastManager);
        }

        let was_member = self.members.remove(identity);
        let was_manager = self.managers.remove(identity);
        if !was_member && !was_manager {
            return Err(SpaceError::MemberNotFound);
        }
        Ok(())
    }

    /// Record an invitation; invited users hold no role until they join
    pub fn invite(&mut self, identity: IdentityId) -> Result<(), SpaceError> {
        if self.is_member(&identity) {
            return Err(SpaceError::MemberAlreadyExists);
        }
        self.invited.insert(identity);
        Ok(())
    }

    /// Record a join request awaiting validation
    pub fn request_to_join(&mut self, identity: IdentityId) -> Result<(), SpaceError> {
        if self.is_member(&identity) {
            return Err(SpaceError::MemberAlreadyExists);
        }
        if self.registration == SpaceRegistration::Close {
            return Err(SpaceError::RegistrationClosed);
        }
        self.pending.insert(identity);
        Ok(())
    }

    /// Role of an identity; managers take precedence over members
    pub fn role_of(&self, identity: &IdentityId) -> SpaceRole {
        if self.managers.contains(identity) {
            SpaceRole::Manager
        } else if self.members.contains(identity) {
            SpaceRole::Member
        } else {
            SpaceRole::None
        }
    }

    /// Check if an identity is a member (managers included)
    pub fn is_member(&self, identity: &IdentityId) -> bool {
        self.role_of(identity).is_member()
    }

    pub fn is_manager(&self, identity: &IdentityId) -> bool {
        self.managers.contains(identity)
    }
}

/// Space visibility modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpaceVisibility {
    /// Listed and readable by anyone
    #[default]
    Public,
    /// Listed, content readable by members only
    Private,
    /// Not listed, content readable by members only
    Hidden,
}

impl SpaceVisibility {
    /// Whether the space's stream is closed to non-members
    pub fn is_restricted(&self) -> bool {
        !matches!(self, SpaceVisibility::Public)
    }
}

/// Space registration modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpaceRegistration {
    /// Anyone may join directly
    Open,
    /// Join requests wait for a manager
    #[default]
    Validation,
    /// Invitation only
    Close,
}

/// Role of an identity within a space
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpaceRole {
    #[default]
    None,
    Member,
    Manager,
}

impl SpaceRole {
    /// Managers count as members
    pub fn is_member(&self) -> bool {
        matches!(self, SpaceRole::Member | SpaceRole::Manager)
    }

    pub fn is_manager(&self) -> bool {
        matches!(self, SpaceRole::Manager)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpaceRole::None => "none",
            SpaceRole::Member => "member",
            SpaceRole::Manager => "manager",
        }
    }
}

/// Space operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpaceError {
    #[error("Member already exists in Space")]
    MemberAlreadyExists,

    #[error("Member not found in Space")]
    MemberNotFound,

    #[error("Identity is not a manager of the Space")]
    NotManager,

    #[error("Cannot remove the last manager of a Space")]
    LastManager,

    #[error("Space registration is closed")]
    RegistrationClosed,
}
