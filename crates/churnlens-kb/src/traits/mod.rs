//! Core traits (interfaces) for the churnlens knowledge base

pub mod graph_store;

pub use graph_store::{GraphDataPatch, GraphStore};

#[cfg(any(test, feature = "mocks"))]
pub use graph_store::MockGraphStore;
