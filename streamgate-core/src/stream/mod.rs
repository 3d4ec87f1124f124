//! Activity streams and the content posted into them

pub mod content;
pub mod resolver;

pub use content::{Activity, ActivityId, Comment, CommentId, ContentRef};
pub use resolver::{StreamKind, StreamOwner, StreamResolver};
