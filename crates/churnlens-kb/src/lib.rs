//! Churnlens causal knowledge-graph core
//!
//! Traverses `CAUSES` edges in a graph store, turns causal chains into
//! mechanism hypotheses, scores and ranks intervention candidates, and
//! assembles a why-aware context that keeps facts, hypotheses, interventions
//! and uncertainty apart.

// Core modules
pub mod data;
pub mod traits;
pub mod causal;
pub mod context;

// Implementation adapters (optional, can be provided externally)
#[cfg(feature = "adapters")]
pub mod adapters;

pub mod test_utils;

// Re-export key types for convenient usage
pub use data::types::{DataPacket, QueryParams, Row};
pub use data::trace_context::TraceContext;
pub use data::identity::{NodeIdentity, NodeRef};
pub use data::entities::{
    CausalMechanism, CausalNode, CausalPath, EffectDirection, EffectEstimate,
    InterventionOption, WhyAwareContext,
};
pub use data::errors::{FixtureError, GraphStoreError};

// Re-export core traits
pub use traits::{GraphDataPatch, GraphStore};

pub use causal::TraversalDepth;
pub use context::{assemble, render};

#[cfg(feature = "adapters")]
pub use adapters::{Neo4jConfig, Neo4jGraphStore};

/// Default filter used when neither `RUST_LOG` nor an explicit filter is set.
pub const DEFAULT_LOG_FILTER: &str = "info,churnlens=debug";

/// Initialize tracing for churnlens binaries.
///
/// `RUST_LOG` wins over `fallback_filter`. Calling this twice is harmless.
pub fn init_tracing(fallback_filter: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback_filter))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .try_init();
}
