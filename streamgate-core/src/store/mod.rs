//! In-memory read models
//!
//! [`MemorySocialStore`] keeps identities, spaces, relationships, activities
//! and comments behind a single lock and implements every lookup contract the
//! policy evaluator consumes. It is the adapter used by tests and by the CLI,
//! which loads it from a [`SocialSnapshot`] file.

pub mod errors;
pub mod memory;
pub mod snapshot;

pub use errors::{StoreError, StoreResult};
pub use memory::MemorySocialStore;
pub use snapshot::SocialSnapshot;
