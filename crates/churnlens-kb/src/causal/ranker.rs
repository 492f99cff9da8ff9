//! Intervention suggestions for an outcome node.
//!
//! Candidates are the outcome's causal ancestors. Each is scored with
//! [`scorer::score`](crate::causal::scorer::score) and the list is ranked by
//! expected effect, then confidence.

use std::cmp::Ordering;

use tracing::{debug, info, instrument};

use crate::causal::{scorer, traversal};
use crate::data::{
    entities::InterventionOption,
    errors::GraphStoreError,
};
use crate::traits::GraphStore;

pub const DEFAULT_INTERVENTION_DEPTH: i64 = 2;
pub const DEFAULT_INTERVENTION_LIMIT: usize = 5;

pub const HEURISTIC_CAVEAT: &str =
    "Effect size is heuristic until statistical causal estimation is added.";
pub const NO_RATIONALE: &str = "No rationale provided.";

/// Suggests up to `limit` interventions for `outcome_id`, searching
/// `depth` hops upstream. A `limit` of zero still yields one suggestion
/// when any candidate exists.
#[instrument(skip(store))]
pub async fn suggest(
    store: &dyn GraphStore,
    outcome_id: &str,
    depth: i64,
    limit: usize,
) -> Result<Vec<InterventionOption>, GraphStoreError> {
    let candidates = traversal::ancestors(store, outcome_id, depth).await?;
    debug!(candidates = candidates.len(), "Scoring intervention candidates");

    let mut options = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let estimate = scorer::score(Some(store), &candidate.id, outcome_id).await?;
        options.push(InterventionOption {
            recommendation: format!(
                "Prioritize mitigation on '{}' to influence '{}'.",
                candidate.id, outcome_id
            ),
            expected_direction: estimate.direction,
            expected_effect_score: estimate.estimated_effect.unwrap_or(0.0),
            confidence: estimate.confidence,
            caveats: vec![
                HEURISTIC_CAVEAT.to_string(),
                estimate.rationale.unwrap_or_else(|| NO_RATIONALE.to_string()),
            ],
            node_id: candidate.id,
        });
    }

    let ranked = rank(options, limit);
    info!(outcome = outcome_id, suggested = ranked.len(), "Ranked interventions");
    Ok(ranked)
}

/// Orders options by `(expected_effect_score, confidence)` descending and
/// keeps the first `max(1, limit)`. Ties keep their input order.
pub fn rank(mut options: Vec<InterventionOption>, limit: usize) -> Vec<InterventionOption> {
    options.sort_by(|a, b| by_strength(b, a));
    options.truncate(limit.max(1));
    options
}

fn by_strength(a: &InterventionOption, b: &InterventionOption) -> Ordering {
    a.expected_effect_score
        .total_cmp(&b.expected_effect_score)
        .then_with(|| a.confidence.total_cmp(&b.confidence))
}
