//! Stores for tests and offline runs.

pub mod fake_store;
pub use fake_store::{CannedQuery, GraphFixture, InMemoryGraphStore};

#[cfg(any(test, feature = "mocks"))]
pub use crate::traits::MockGraphStore;
