//! Activities, comments and references to them

use crate::identity::{IdentityId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an activity
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityId(pub String);

impl ActivityId {
    pub fn new(id: impl Into<String>) -> Self {
        ActivityId(id.into())
    }

    pub fn generate() -> Self {
        use uuid::Uuid;
        ActivityId(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a comment
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(pub String);

impl CommentId {
    pub fn new(id: impl Into<String>) -> Self {
        CommentId(id.into())
    }

    pub fn generate() -> Self {
        use uuid::Uuid;
        CommentId(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An entry posted into a stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,

    /// Who posted it
    pub author: IdentityId,

    /// Identity (user or space) whose stream it was posted into
    pub stream: IdentityId,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub posted_at: Timestamp,
}

impl Activity {
    pub fn new(author: IdentityId, stream: IdentityId, title: impl Into<String>) -> Self {
        Activity {
            id: ActivityId::generate(),
            author,
            stream,
            title: title.into(),
            posted_at: Timestamp::now(),
        }
    }

    /// Whether the author posted into their own stream
    pub fn is_self_posted(&self) -> bool {
        self.author == self.stream
    }
}

/// A comment on an activity; its stream is the parent activity's stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,

    /// Parent activity
    pub activity: ActivityId,

    pub author: IdentityId,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub posted_at: Timestamp,
}

impl Comment {
    pub fn new(activity: ActivityId, author: IdentityId, title: impl Into<String>) -> Self {
        Comment {
            id: CommentId::generate(),
            activity,
            author,
            title: title.into(),
            posted_at: Timestamp::now(),
        }
    }
}

/// Reference to a piece of content, as handed to the evaluator
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum ContentRef {
    Activity(ActivityId),
    Comment(CommentId),
}

impl ContentRef {
    pub fn kind(&self) -> &'static str {
        match self {
            ContentRef::Activity(_) => "activity",
            ContentRef::Comment(_) => "comment",
        }
    }
}

impl fmt::Display for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentRef::Activity(id) => write!(f, "activity:{}", id),
            ContentRef::Comment(id) => write!(f, "comment:{}", id),
        }
    }
}

impl From<ActivityId> for ContentRef {
    fn from(id: ActivityId) -> Self {
        ContentRef::Activity(id)
    }
}

impl From<CommentId> for ContentRef {
    fn from(id: CommentId) -> Self {
        ContentRef::Comment(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_posted_activity() {
        let demo = IdentityId::new("demo");
        let own = Activity::new(demo.clone(), demo.clone(), "title 0");
        let other = Activity::new(demo, IdentityId::new("john"), "title 0");

        assert!(own.is_self_posted());
        assert!(!other.is_self_posted());
    }

    #[test]
    fn test_content_ref_display() {
        let r = ContentRef::from(CommentId::new("c1"));
        assert_eq!(r.to_string(), "comment:c1");
        assert_eq!(r.kind(), "comment");
    }

    #[test]
    fn test_content_ref_serde_shape() {
        let r = ContentRef::Activity(ActivityId::new("a1"));
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "activity", "id": "a1" }));
    }
}
