//! Connections between individual identities
//!
//! A relationship is an unordered pair of identities with a status. The
//! lifecycle is `None --invite--> Pending --confirm--> Confirmed`, and either
//! live state can be removed back to `None`.

pub mod lookup;
pub mod model;

pub use lookup::RelationshipLookup;
pub use model::{Relationship, RelationshipError, RelationshipStatus};
