/*
    snapshot.rs - Serializable picture of the social graph

    A snapshot is what the CLI evaluates against: identities, spaces,
    relationships, activities and comments. TOML and JSON are both accepted;
    the file extension picks the format.
*/

use super::errors::{StoreError, StoreResult};
use crate::identity::Identity;
use crate::relationship::Relationship;
use crate::space::Space;
use crate::stream::{Activity, Comment};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialSnapshot {
    #[serde(default)]
    pub identities: Vec<Identity>,

    #[serde(default)]
    pub spaces: Vec<Space>,

    #[serde(default)]
    pub relationships: Vec<Relationship>,

    #[serde(default)]
    pub activities: Vec<Activity>,

    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl SocialSnapshot {
    pub fn from_toml_str(contents: &str) -> StoreResult<Self> {
        toml::from_str(contents).map_err(|e| StoreError::Parse(e.to_string()))
    }

    pub fn from_json_str(contents: &str) -> StoreResult<Self> {
        serde_json::from_str(contents).map_err(|e| StoreError::Parse(e.to_string()))
    }

    /// Load a snapshot file; `.json` is parsed as JSON, anything else as TOML
    pub fn load(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|e| StoreError::Io(e.to_string()))?;

        if is_json(path) {
            Self::from_json_str(&contents)
        } else {
            Self::from_toml_str(&contents)
        }
    }

    /// Write a snapshot file, picking the format the same way as [`Self::load`]
    pub fn save(&self, path: impl AsRef<Path>) -> StoreResult<()> {
        let path = path.as_ref();
        let contents = if is_json(path) {
            serde_json::to_string_pretty(self).map_err(|e| StoreError::Parse(e.to_string()))?
        } else {
            toml::to_string_pretty(self).map_err(|e| StoreError::Parse(e.to_string()))?
        };

        std::fs::write(path, contents).map_err(|e| StoreError::Io(e.to_string()))
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{IdentityId, IdentityProvider};
    use crate::relationship::{RelationshipError, RelationshipStatus};
    use crate::space::{SpaceRole, SpaceVisibility};
    use crate::store::MemorySocialStore;

    const SNAPSHOT: &str = r#"
[[identities]]
id = "demo"
provider = "organization"
remote_id = "demo"

[[identities]]
id = "mary"
provider = "organization"
remote_id = "mary"

[[identities]]
id = "space-1"
provider = "space"
remote_id = "my_space_1"

[[spaces]]
id = "my_space_1"
display_name = "my space 1"
visibility = "private"
managers = ["demo"]
members = ["demo", "mary"]

[[relationships]]
sender = "demo"
receiver = "mary"
status = "pending"

[[activities]]
id = "a1"
author = "demo"
stream = "space-1"
title = "hello space"

[[comments]]
id = "c1"
activity = "a1"
author = "mary"
"#;

    #[test]
    fn test_parse_toml_snapshot() {
        let snapshot = SocialSnapshot::from_toml_str(SNAPSHOT).unwrap();

        assert_eq!(snapshot.identities.len(), 3);
        assert_eq!(snapshot.identities[2].provider, IdentityProvider::Space);
        assert_eq!(snapshot.spaces[0].visibility, SpaceVisibility::Private);
        assert_eq!(snapshot.spaces[0].role_of(&IdentityId::new("mary")), SpaceRole::Member);
        assert_eq!(snapshot.relationships[0].status, RelationshipStatus::Pending);
        assert_eq!(snapshot.comments[0].title, "");
    }

    #[test]
    fn test_store_round_trips_through_snapshot() {
        let store =
            MemorySocialStore::from_snapshot(SocialSnapshot::from_toml_str(SNAPSHOT).unwrap())
                .unwrap();
        let exported = store.snapshot().unwrap();

        let reloaded = MemorySocialStore::from_snapshot(exported.clone()).unwrap();
        assert_eq!(reloaded.snapshot().unwrap(), exported);
    }

    #[test]
    fn test_dangling_comment_rejected() {
        let mut snapshot = SocialSnapshot::from_toml_str(SNAPSHOT).unwrap();
        snapshot.activities.clear();

        let err = MemorySocialStore::from_snapshot(snapshot).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn test_relationship_with_space_rejected() {
        let mut snapshot = SocialSnapshot::from_toml_str(SNAPSHOT).unwrap();
        snapshot.relationships[0].receiver = IdentityId::new("space-1");

        let err = MemorySocialStore::from_snapshot(snapshot).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Relationship(RelationshipError::NotIndividual(_))
        ));
    }

    #[test]
    fn test_duplicate_activity_rejected() {
        let mut snapshot = SocialSnapshot::from_toml_str(SNAPSHOT).unwrap();
        let mut copy = snapshot.activities[0].clone();
        copy.author = IdentityId::new("mary");
        snapshot.activities.push(copy);

        let err = MemorySocialStore::from_snapshot(snapshot).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateRecord(_)));
    }

    #[test]
    fn test_load_detects_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        let snapshot = SocialSnapshot::from_toml_str(SNAPSHOT).unwrap();
        std::fs::write(&path, serde_json::to_string(&snapshot).unwrap()).unwrap();

        assert_eq!(SocialSnapshot::load(&path).unwrap(), snapshot);
    }

    #[test]
    fn test_exported_store_saves_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let store =
            MemorySocialStore::from_snapshot(SocialSnapshot::from_toml_str(SNAPSHOT).unwrap())
                .unwrap();
        let exported = store.snapshot().unwrap();

        for name in ["graph.toml", "graph.json"] {
            let path = dir.path().join(name);
            exported.save(&path).unwrap();
            assert_eq!(SocialSnapshot::load(&path).unwrap(), exported);
        }
    }

    #[test]
    fn test_load_missing_file() {
        let err = SocialSnapshot::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
    }
}
