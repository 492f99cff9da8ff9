//! Core data structures for the churnlens knowledge base

pub mod types;
pub mod identity;
pub mod trace_context;
pub mod entities;
pub mod errors;

// Re-export all common types
pub use types::{DataPacket, QueryParams, Row};
pub use identity::{NodeIdentity, NodeRef};
pub use trace_context::TraceContext;
pub use errors::{FixtureError, GraphStoreError};
pub use entities::*;
