/*
    errors.rs - Error types for the in-memory store

    Defines errors raised by write operations and snapshot loading.
    Read-model lookups report failures as LookupError instead.
*/

use crate::error::LookupError;
use crate::identity::{IdentityId, IdentityProvider};
use crate::relationship::RelationshipError;
use crate::space::SpaceError;
use thiserror::Error;

/// Errors that can occur in the store
#[derive(Debug, Error)]
pub enum StoreError {
    /// A thread panicked while holding the store lock
    #[error("Store lock poisoned")]
    Poisoned,

    /// Referenced entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Identity id already taken
    #[error("Identity already exists: {0}")]
    DuplicateIdentity(IdentityId),

    /// Another identity already uses this provider/remote id pair
    #[error("Identity {provider}:{remote_id} already exists")]
    DuplicateRemoteId {
        provider: IdentityProvider,
        remote_id: String,
    },

    /// Content id already taken
    #[error("Duplicate {0}")]
    DuplicateRecord(String),

    #[error(transparent)]
    Relationship(#[from] RelationshipError),

    #[error(transparent)]
    Space(#[from] SpaceError),

    /// Snapshot file could not be read
    #[error("Failed to read snapshot: {0}")]
    Io(String),

    /// Snapshot file could not be parsed
    #[error("Failed to parse snapshot: {0}")]
    Parse(String),
}

impl From<StoreError> for LookupError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Poisoned => LookupError::Unavailable(err.to_string()),
            other => LookupError::Backend(other.to_string()),
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
