//! Causal reasoning over `CAUSES` edges: traversal, mechanism hypotheses,
//! heuristic effect scoring and intervention ranking.

pub mod mechanism;
pub mod queries;
pub mod ranker;
pub mod scorer;
pub mod traversal;

pub use mechanism::{explain, explain_paths, path_confidence};
pub use queries::{CausalQueryKind, PreparedQuery, TraversalDepth};
pub use ranker::{rank, suggest};
pub use scorer::score;
pub use traversal::{ancestors, descendants, shortest_causal_paths};

/// Rounds to four decimal places.
pub(crate) fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
