//! Turns causal paths into mechanism hypotheses.

use tracing::instrument;

use crate::causal::{round4, traversal};
use crate::data::{entities::CausalMechanism, errors::GraphStoreError};
use crate::traits::GraphStore;

pub const EDGE_DIRECTION_ASSUMPTION: &str =
    "CAUSES edges reflect directionality in the source graph.";
pub const CONFOUNDER_ASSUMPTION: &str = "Unobserved confounders may still exist.";
pub const SHORT_CHAIN_MECHANISM: &str = "Insufficient causal chain length to describe a mechanism.";

/// Heuristic confidence for a chain: shorter chains score higher.
///
/// `round(clamp(1/hops + 0.2, 0.25, 0.95), 4)`; chains with fewer than two
/// nodes have no hops and get `0.0`.
pub fn path_confidence(path: &[String]) -> f64 {
    let hops = path.len().saturating_sub(1);
    if hops == 0 {
        return 0.0;
    }
    round4((1.0 / hops as f64 + 0.2).clamp(0.25, 0.95))
}

/// Explains a single chain.
pub fn explain(path: &[String]) -> CausalMechanism {
    let mechanism = if path.len() < 2 {
        SHORT_CHAIN_MECHANISM.to_string()
    } else {
        format!(
            "The graph indicates a causal chain {}. \
             This is treated as a candidate mechanism, not definitive proof.",
            path.join(" -> ")
        )
    };

    CausalMechanism {
        path: path.to_vec(),
        mechanism,
        confidence: path_confidence(path),
        assumptions: vec![
            EDGE_DIRECTION_ASSUMPTION.to_string(),
            CONFOUNDER_ASSUMPTION.to_string(),
        ],
    }
}

/// Explains every shortest chain from `source_id` to `target_id`.
///
/// Blank identities are dropped from each chain; chains left with fewer
/// than two nodes are discarded.
#[instrument(skip(store))]
pub async fn explain_paths(
    store: &dyn GraphStore,
    source_id: &str,
    target_id: &str,
    max_depth: i64,
) -> Result<Vec<CausalMechanism>, GraphStoreError> {
    let paths = traversal::shortest_causal_paths(store, source_id, target_id, max_depth).await?;
    Ok(paths
        .into_iter()
        .map(|path| path.into_iter().filter(|id| !id.is_empty()).collect::<Vec<_>>())
        .filter(|path| path.len() >= 2)
        .map(|path| explain(&path))
        .collect())
}
