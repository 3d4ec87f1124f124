//! Relationship data structures and transitions

use crate::identity::{IdentityId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Connection state between two identities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipStatus {
    /// No relationship record exists
    #[default]
    None,
    /// One side invited the other, not yet confirmed
    Pending,
    /// Mutually accepted
    Confirmed,
}

impl RelationshipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipStatus::None => "none",
            RelationshipStatus::Pending => "pending",
            RelationshipStatus::Confirmed => "confirmed",
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, RelationshipStatus::Confirmed)
    }
}

impl fmt::Display for RelationshipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A relationship record between two identities
///
/// `sender` invited `receiver`. The status reads the same from either side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub sender: IdentityId,
    pub receiver: IdentityId,
    pub status: RelationshipStatus,
    #[serde(default)]
    pub updated_at: Timestamp,
}

impl Relationship {
    /// Start a relationship with an invitation
    pub fn invite(sender: IdentityId, receiver: IdentityId) -> Result<Self, RelationshipError> {
        if sender == receiver {
            return Err(RelationshipError::SelfRelationship(sender));
        }

        Ok(Relationship {
            sender,
            receiver,
            status: RelationshipStatus::Pending,
            updated_at: Timestamp::now(),
        })
    }

    /// Accept a pending invitation; only the invited side may confirm
    pub fn confirm(&mut self, confirmer: &IdentityId) -> Result<(), RelationshipError> {
        if self.status == RelationshipStatus::Confirmed {
            return Err(RelationshipError::AlreadyConfirmed);
        }
        if confirmer != &self.receiver {
            return Err(RelationshipError::NotInvitee(confirmer.clone()));
        }

        self.status = RelationshipStatus::Confirmed;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Check whether an identity is one side of this relationship
    pub fn involves(&self, identity: &IdentityId) -> bool {
        &self.sender == identity || &self.receiver == identity
    }

    /// The side of the relationship that isn't `identity`
    pub fn other_side(&self, identity: &IdentityId) -> Option<&IdentityId> {
        if &self.sender == identity {
            Some(&self.receiver)
        } else if &self.receiver == identity {
            Some(&self.sender)
        } else {
            None
        }
    }
}

/// Relationship lifecycle errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RelationshipError {
    #[error("Identity {0} cannot connect to itself")]
    SelfRelationship(IdentityId),

    #[error("Identity {0} is not an individual and cannot hold relationships")]
    NotIndividual(IdentityId),

    #[error("Relationship already exists between {0} and {1}")]
    AlreadyExists(IdentityId, IdentityId),

    #[error("No relationship between {0} and {1}")]
    NotFound(IdentityId, IdentityId),

    #[error("Identity {0} was not invited and cannot confirm")]
    NotInvitee(IdentityId),

    #[error("Relationship is already confirmed")]
    AlreadyConfirmed,
}
