//! Test utilities for building social graphs and checking decisions
//!
//! Shared by unit tests and the integration tests under `tests/`.

pub mod assertions;
pub mod fixtures;

pub use assertions::*;
pub use fixtures::*;
