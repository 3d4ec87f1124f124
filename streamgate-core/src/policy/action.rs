//! Actions and access requests

use crate::identity::IdentityId;
use crate::stream::{ActivityId, ContentRef};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of action an actor can attempt on a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    View,
    Post,
    Comment,
    Delete,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::View, Action::Post, Action::Comment, Action::Delete];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Post => "post",
            Action::Comment => "comment",
            Action::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An action together with its target
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "action", content = "target", rename_all = "lowercase")]
pub enum AccessRequest {
    /// Read an activity
    View(ActivityId),
    /// Post into the stream owned by this identity
    Post(IdentityId),
    /// Comment on an activity
    Comment(ActivityId),
    /// Delete an activity or a comment
    Delete(ContentRef),
}

impl AccessRequest {
    pub fn action(&self) -> Action {
        match self {
            AccessRequest::View(_) => Action::View,
            AccessRequest::Post(_) => Action::Post,
            AccessRequest::Comment(_) => Action::Comment,
            AccessRequest::Delete(_) => Action::Delete,
        }
    }
}

impl fmt::Display for AccessRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessRequest::View(id) => write!(f, "view activity:{}", id),
            AccessRequest::Post(id) => write!(f, "post stream:{}", id),
            AccessRequest::Comment(id) => write!(f, "comment activity:{}", id),
            AccessRequest::Delete(content) => write!(f, "delete {}", content),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::CommentId;

    #[test]
    fn test_request_action() {
        let delete = AccessRequest::Delete(ContentRef::Comment(CommentId::new("c1")));
        assert_eq!(delete.action(), Action::Delete);
        assert_eq!(delete.to_string(), "delete comment:c1");
        assert_eq!(
            AccessRequest::Post(IdentityId::new("mary")).action(),
            Action::Post
        );
    }
}
