//! Space membership
//!
//! A space owns a stream through its space identity and grants access to it
//! through roles.
//!
//! ## Role model
//!
//! - **Manager**: moderates the space stream; always counts as a member
//! - **Member**: may post and comment in the space stream
//! - **None**: everyone else, including invited and pending users

pub mod lookup;
pub mod space;
pub mod types;

pub use lookup::SpaceMembershipLookup;
pub use space::{Space, SpaceError, SpaceRegistration, SpaceRole, SpaceVisibility};
pub use types::SpaceId;
