/*
    types.rs - Identity model

    Defines:
    - Identity ids and the provider tag (individual vs. space)
    - Millisecond timestamps used to order posted content
*/

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Unique identifier for an identity
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityId(pub String);

impl IdentityId {
    pub fn new(id: impl Into<String>) -> Self {
        IdentityId(id.into())
    }

    pub fn generate() -> Self {
        use uuid::Uuid;
        IdentityId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for IdentityId {
    fn from(id: &str) -> Self {
        IdentityId(id.to_string())
    }
}

/// Which provider created an identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityProvider {
    /// An individual user of the organization
    Organization,
    /// A space, so that it can own a stream
    Space,
}

impl IdentityProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentityProvider::Organization => "organization",
            IdentityProvider::Space => "space",
        }
    }
}

impl fmt::Display for IdentityProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An addressable actor in the social graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Unique identifier
    pub id: IdentityId,

    /// Provider that owns this identity
    pub provider: IdentityProvider,

    /// Provider-scoped name: the user name, or the space pretty name
    pub remote_id: String,
}

impl Identity {
    /// Create an identity with a freshly generated id
    pub fn new(provider: IdentityProvider, remote_id: impl Into<String>) -> Self {
        Identity {
            id: IdentityId::generate(),
            provider,
            remote_id: remote_id.into(),
        }
    }

    /// Create an individual user identity
    pub fn user(remote_id: impl Into<String>) -> Self {
        Self::new(IdentityProvider::Organization, remote_id)
    }

    /// Create the identity that owns a space's stream
    pub fn space(pretty_name: impl Into<String>) -> Self {
        Self::new(IdentityProvider::Space, pretty_name)
    }

    /// Builder-style override of the generated id
    pub fn with_id(mut self, id: IdentityId) -> Self {
        self.id = id;
        self
    }

    pub fn is_space(&self) -> bool {
        self.provider == IdentityProvider::Space
    }
}

/// Unix timestamp in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// Create a timestamp representing the current time
    pub fn now() -> Self {
        // A clock before the epoch reads as zero rather than failing.
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        Timestamp(millis)
    }

    pub fn from_millis(millis: u64) -> Self {
        Timestamp(millis)
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Timestamp::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_id_generation() {
        let id1 = IdentityId::generate();
        let id2 = IdentityId::generate();
        assert_ne!(id1, id2, "Generated IDs should be unique");
    }

    #[test]
    fn test_space_identity_is_tagged() {
        let space = Identity::space("my_space");
        let user = Identity::user("demo");

        assert!(space.is_space());
        assert!(!user.is_space());
        assert_eq!(space.remote_id, "my_space");
    }

    #[test]
    fn test_with_id_overrides_generated_id() {
        let identity = Identity::user("demo").with_id(IdentityId::new("demo"));
        assert_eq!(identity.id.as_str(), "demo");
    }

    #[test]
    fn test_provider_serializes_lowercase() {
        let json = serde_json::to_string(&IdentityProvider::Space).unwrap();
        assert_eq!(json, "\"space\"");
    }

    #[test]
    fn test_timestamp_ordering() {
        assert!(Timestamp::from_millis(1) < Timestamp::from_millis(2));
        assert!(Timestamp::now().as_millis() > 0);
    }
}
