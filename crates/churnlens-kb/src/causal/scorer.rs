//! Heuristic intervention effect estimation.
//!
//! The estimate is a function of graph distance only: the fewer hops from the
//! intervention to the outcome, the larger the score. It is a placeholder for
//! statistical estimation and is labelled as such through `method`.

use tracing::{debug, instrument};

use crate::causal::{round4, traversal};
use crate::data::{
    entities::{EffectDirection, EffectEstimate},
    errors::GraphStoreError,
};
use crate::traits::GraphStore;

pub const HEURISTIC_METHOD: &str = "graph_distance_heuristic";
pub const UNAVAILABLE_METHOD: &str = "no_graph_store";
/// Hop bound used when searching for the intervention -> outcome chain.
pub const SCORING_DEPTH: i64 = 20;

const NO_PATH_RATIONALE: &str = "No directed causal path was detected within 20 hops.";

/// Scores how strongly acting on `intervention_id` could move `outcome_id`.
#[instrument(skip(store))]
pub async fn score(
    store: Option<&dyn GraphStore>,
    intervention_id: &str,
    outcome_id: &str,
) -> Result<EffectEstimate, GraphStoreError> {
    let Some(store) = store else {
        return Ok(EffectEstimate {
            estimated_effect: None,
            direction: EffectDirection::Unknown,
            confidence: 0.0,
            method: UNAVAILABLE_METHOD.to_string(),
            rationale: None,
        });
    };

    let paths =
        traversal::shortest_causal_paths(store, intervention_id, outcome_id, SCORING_DEPTH).await?;
    let hops = paths
        .iter()
        .map(|path| path.len().saturating_sub(1))
        .filter(|hops| *hops > 0)
        .min();
    debug!(?hops, "Shortest intervention chain");
    Ok(estimate_from_hops(hops))
}

/// Builds the estimate for a known shortest chain length (in hops).
pub fn estimate_from_hops(hops: Option<usize>) -> EffectEstimate {
    match hops {
        Some(hops) if hops > 0 => {
            let inverse = 1.0 / hops as f64;
            EffectEstimate {
                estimated_effect: Some(round4(inverse)),
                direction: EffectDirection::RiskDecreaseIfMitigated,
                confidence: round4((inverse + 0.2).clamp(0.2, 1.0)),
                method: HEURISTIC_METHOD.to_string(),
                rationale: Some(format!(
                    "Shortest causal path length is {hops}; \
                     shorter paths are scored as stronger intervention levers."
                )),
            }
        }
        _ => EffectEstimate {
            estimated_effect: Some(0.0),
            direction: EffectDirection::Unknown,
            confidence: 0.0,
            method: HEURISTIC_METHOD.to_string(),
            rationale: Some(NO_PATH_RATIONALE.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::types::{DataPacket, Row};
    use crate::traits::MockGraphStore;

    #[tokio::test]
    async fn test_without_store_effect_is_unknown() {
        let estimate = score(None, "ct1", "churn:1").await.unwrap();
        assert_eq!(estimate.estimated_effect, None);
        assert_eq!(estimate.direction, EffectDirection::Unknown);
        assert_eq!(estimate.rationale, None);
    }

    #[test]
    fn test_distance_scores() {
        let one = estimate_from_hops(Some(1));
        assert_eq!(one.estimated_effect, Some(1.0));
        assert_eq!(one.confidence, 1.0);
        assert_eq!(one.direction, EffectDirection::RiskDecreaseIfMitigated);

        let three = estimate_from_hops(Some(3));
        assert_eq!(three.estimated_effect, Some(0.3333));
        assert_eq!(three.confidence, 0.5333);
        assert!(three.rationale.unwrap().contains("length is 3"));
    }

    #[test]
    fn test_no_path_scores_zero() {
        let none = estimate_from_hops(None);
        assert_eq!(none.estimated_effect, Some(0.0));
        assert_eq!(none.confidence, 0.0);
        assert_eq!(none.direction, EffectDirection::Unknown);
        assert_eq!(none.method, HEURISTIC_METHOD);
    }

    #[tokio::test]
    async fn test_score_searches_twenty_hops() {
        let mut store = MockGraphStore::new();
        store
            .expect_execute()
            .withf(|query, _| query.contains("[:CAUSES*1..20]"))
            .returning(|_, _| {
                let mut row = Row::new();
                row.insert(
                    "path".to_string(),
                    DataPacket::Array(vec!["ct1".into(), "svc".into(), "churn:1".into()]),
                );
                Ok(vec![row])
            });

        let estimate = score(Some(&store as &dyn GraphStore), "ct1", "churn:1").await.unwrap();
        assert_eq!(estimate.estimated_effect, Some(0.5));
        assert_eq!(estimate.confidence, 0.7);
    }
}
