//! Decision outcomes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rule that produced a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    // Grants
    /// Actor targets their own stream
    SelfStream,
    /// Actor wrote the content
    Author,
    /// Actor owns the stream the content lives in
    StreamOwner,
    /// Stream is readable by anyone
    PublicStream,
    /// Actor and stream owner are connected
    ConfirmedRelationship,
    /// Actor is a member (or manager) of the owning space
    SpaceMember,
    /// Actor manages the owning space
    SpaceManager,

    // Denials
    /// Individual stream, no confirmed connection
    NoConfirmedRelationship,
    /// Space stream, actor holds no role
    NotSpaceMember,
    /// Space stream, actor is not a manager
    NotSpaceManager,
    /// Individual stream owned by someone else
    NotStreamOwner,
    /// Content depends on a stream, space or activity that is gone
    DanglingReference,
}

impl DecisionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionReason::SelfStream => "self_stream",
            DecisionReason::Author => "author",
            DecisionReason::StreamOwner => "stream_owner",
            DecisionReason::PublicStream => "public_stream",
            DecisionReason::ConfirmedRelationship => "confirmed_relationship",
            DecisionReason::SpaceMember => "space_member",
            DecisionReason::SpaceManager => "space_manager",
            DecisionReason::NoConfirmedRelationship => "no_confirmed_relationship",
            DecisionReason::NotSpaceMember => "not_space_member",
            DecisionReason::NotSpaceManager => "not_space_manager",
            DecisionReason::NotStreamOwner => "not_stream_owner",
            DecisionReason::DanglingReference => "dangling_reference",
        }
    }
}

impl fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of an access check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub allowed: bool,
    pub reason: DecisionReason,
}

impl Decision {
    pub fn allow(reason: DecisionReason) -> Self {
        Decision { allowed: true, reason }
    }

    pub fn deny(reason: DecisionReason) -> Self {
        Decision { allowed: false, reason }
    }

    /// Grant with `granted` if `condition` holds, otherwise deny with `denied`
    pub fn when(condition: bool, granted: DecisionReason, denied: DecisionReason) -> Self {
        if condition {
            Self::allow(granted)
        } else {
            Self::deny(denied)
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = if self.allowed { "allowed" } else { "denied" };
        write!(f, "{} ({})", outcome, self.reason)
    }
}
