//! Type definitions for Spaces

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a Space: its pretty name
///
/// The space's stream identity carries the same value as its `remote_id`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpaceId(pub String);

impl SpaceId {
    pub fn new(pretty_name: impl Into<String>) -> Self {
        SpaceId(pretty_name.into())
    }

    /// Derive the pretty name from a display name ("My Space 1" -> "my_space_1")
    pub fn from_display_name(display_name: &str) -> Self {
        let pretty = display_name
            .trim()
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_");
        SpaceId(pretty)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
