//! Errors raised by read-model collaborators

use thiserror::Error;

/// A lookup against a relationship, membership or stream read model failed.
///
/// This is distinct from "not found": missing records are reported as
/// `Ok(None)` (or a `None` status/role) by the lookup contracts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("Read model unavailable: {0}")]
    Unavailable(String),

    #[error("Read model backend error: {0}")]
    Backend(String),
}
