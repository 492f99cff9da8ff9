//! Causal reasoning over a small telco churn graph held in memory.

use std::path::PathBuf;

use pretty_assertions::assert_eq;
use test_log::test;

use churnlens_kb::{
    causal::{self, mechanism, ranker, scorer},
    context,
    test_utils::InMemoryGraphStore,
    DataPacket, EffectDirection, GraphStore, QueryParams,
};

const OUTCOME: &str = "churn:7590-VHVEG";

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/telco_causal.json")
}

fn telco_store() -> InMemoryGraphStore {
    InMemoryGraphStore::from_json_file(fixture_path()).expect("fixture should load")
}

#[test(tokio::test)]
async fn test_fixture_keeps_only_causal_edges() {
    let store = telco_store();
    assert_eq!(store.node_count(), 10);
    assert_eq!(store.edge_count(), 7);
}

#[test(tokio::test)]
async fn test_ancestors_of_churn_outcome() {
    let store = telco_store();

    let direct = causal::ancestors(&store, OUTCOME, 1).await.unwrap();
    let direct_ids: Vec<_> = direct.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(
        direct_ids,
        vec!["contract:month-to-month", "Offer E", "charges:high-monthly", "satisfaction:low"]
    );
    assert_eq!(direct[1].label.as_deref(), Some("Offer"));

    let two_hops = causal::ancestors(&store, OUTCOME, 2).await.unwrap();
    assert_eq!(two_hops.len(), 6);
    assert_eq!(two_hops[4].id, "internet:fiber-optic");
    assert_eq!(two_hops[5].id, "support:none");
}

#[test(tokio::test)]
async fn test_descendants_resolve_by_name() {
    let store = telco_store();
    let downstream = causal::descendants(&store, "Month-to-Month", 3).await.unwrap();
    let ids: Vec<_> = downstream.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["churn:7590-VHVEG", "churn:3668-QPYBK"]);
}

#[test(tokio::test)]
async fn test_unknown_node_is_empty_not_error() {
    let store = telco_store();
    assert!(causal::descendants(&store, "no-such-node", 3).await.unwrap().is_empty());
    assert!(causal::shortest_causal_paths(&store, "no-such-node", OUTCOME, 5)
        .await
        .unwrap()
        .is_empty());
}

#[test(tokio::test)]
async fn test_explain_two_hop_chain() {
    let store = telco_store();
    let mechanisms = mechanism::explain_paths(&store, "internet:fiber-optic", OUTCOME, 5)
        .await
        .unwrap();

    assert_eq!(mechanisms.len(), 1);
    assert_eq!(
        mechanisms[0].path,
        vec!["internet:fiber-optic", "charges:high-monthly", OUTCOME]
    );
    assert_eq!(mechanisms[0].confidence, 0.7);
}

#[test(tokio::test)]
async fn test_explain_respects_depth_bound() {
    let store = telco_store();
    let mechanisms = mechanism::explain_paths(&store, "support:none", OUTCOME, 1)
        .await
        .unwrap();
    assert!(mechanisms.is_empty());
}

#[test(tokio::test)]
async fn test_unconnected_pair_scores_zero() {
    let store = telco_store();
    let store: &dyn GraphStore = &store;
    let estimate = scorer::score(Some(store), "support:none", "churn:3668-QPYBK")
        .await
        .unwrap();
    assert_eq!(estimate.estimated_effect, Some(0.0));
    assert_eq!(estimate.confidence, 0.0);
    assert_eq!(estimate.direction, EffectDirection::Unknown);
}

#[test(tokio::test)]
async fn test_suggest_ranks_nearest_causes_first() {
    let store = telco_store();
    let options = ranker::suggest(&store, OUTCOME, 2, 5).await.unwrap();

    let ids: Vec<_> = options.iter().map(|o| o.node_id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "contract:month-to-month",
            "Offer E",
            "charges:high-monthly",
            "satisfaction:low",
            "internet:fiber-optic",
        ]
    );
    assert_eq!(options[0].expected_effect_score, 1.0);
    assert_eq!(options[4].expected_effect_score, 0.5);
    assert_eq!(options[4].confidence, 0.7);
    assert_eq!(
        options[1].recommendation,
        "Prioritize mitigation on 'Offer E' to influence 'churn:7590-VHVEG'."
    );
    assert_eq!(options[0].caveats[0], ranker::HEURISTIC_CAVEAT);
    assert!(options[0].caveats[1].contains("length is 1"));
}

#[test(tokio::test)]
async fn test_suggest_without_ancestors_is_empty() {
    let store = telco_store();
    let options = ranker::suggest(&store, "support:none", 2, 5).await.unwrap();
    assert!(options.is_empty());
}

#[test(tokio::test)]
async fn test_canned_rows_feed_the_context() {
    let store = telco_store();
    let mut params = QueryParams::new();
    params.insert("customer_id".to_string(), DataPacket::from("7590-VHVEG"));
    let rows = store
        .execute(
            "MATCH (c:Customer {id: $customer_id}) RETURN c.id AS customer, c.tenure AS tenure, \
             c.customerStatus AS status",
            params,
        )
        .await
        .unwrap();

    let hypotheses = mechanism::explain_paths(&store, "internet:fiber-optic", OUTCOME, 5)
        .await
        .unwrap();
    let interventions = ranker::suggest(&store, OUTCOME, 2, 2).await.unwrap();
    let ctx = context::assemble("Why did 7590-VHVEG churn?", rows, hypotheses, interventions, None);
    let text = context::render(&ctx);

    assert!(text.contains(r#"- {"customer":"7590-VHVEG","status":"Churned","tenure":1}"#));
    assert!(text
        .contains("- Path: internet:fiber-optic -> charges:high-monthly -> churn:7590-VHVEG"));
    assert!(text.contains("  Confidence: 0.70"));
    assert!(text.contains("(effect=1.00, confidence=1.00)"));
    assert!(text.contains("- Potential confounders may be unobserved in the current dataset."));
}
