//! Policy evaluation errors

use crate::error::LookupError;
use std::fmt;
use thiserror::Error;

/// What kind of record a caller referenced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Identity,
    Activity,
    Comment,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReferenceKind::Identity => "identity",
            ReferenceKind::Activity => "activity",
            ReferenceKind::Comment => "comment",
        };
        f.write_str(s)
    }
}

/// Errors from the access policy evaluator
///
/// A denial is never an error. These cover bad references from the caller
/// and failures of the read models.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("Unresolvable {kind} reference: {id}")]
    UnresolvableReference { kind: ReferenceKind, id: String },

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

impl PolicyError {
    pub(crate) fn unresolvable(kind: ReferenceKind, id: impl fmt::Display) -> Self {
        PolicyError::UnresolvableReference {
            kind,
            id: id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_error_display() {
        let err = PolicyError::unresolvable(ReferenceKind::Comment, "c42");
        assert_eq!(err.to_string(), "Unresolvable comment reference: c42");

        let err = PolicyError::from(LookupError::Backend("disk".to_string()));
        assert_eq!(err.to_string(), "Read model backend error: disk");
    }
}
