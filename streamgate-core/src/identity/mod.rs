//! Identities that act on, and own, activity streams
//!
//! Individual users and spaces are both identities so that a space can own a
//! stream in the same way a person does. The provider tag tells them apart.

pub mod types;

pub use types::{Identity, IdentityId, IdentityProvider, Timestamp};
