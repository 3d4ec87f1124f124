//! Access policy evaluation
//!
//! Decides whether an actor may view, post, comment on, or delete content in
//! an activity stream. The evaluator reads three collaborators and never
//! writes:
//!
//! - [`RelationshipLookup`](crate::relationship::RelationshipLookup) for
//!   connection status between individuals
//! - [`SpaceMembershipLookup`](crate::space::SpaceMembershipLookup) for roles
//!   and visibility inside spaces
//! - [`StreamResolver`](crate::stream::StreamResolver) for authors and stream
//!   owners of content
//!
//! ## Rule table
//!
//! | Action  | Individual stream                        | Space stream                    |
//! |---------|------------------------------------------|---------------------------------|
//! | view    | always                                   | public, or member if restricted |
//! | post    | self, or confirmed relationship          | self, or member                 |
//! | comment | author, owner, or confirmed relationship | author, owner, or member        |
//! | delete  | author, or stream owner                  | author, or manager              |

mod action;
mod decision;
mod error;
mod evaluator;

pub use action::{AccessRequest, Action};
pub use decision::{Decision, DecisionReason};
pub use error::{PolicyError, ReferenceKind};
pub use evaluator::{AccessPolicy, PolicyOptions};
