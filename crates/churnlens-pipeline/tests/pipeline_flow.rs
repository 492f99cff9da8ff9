//! End-to-end runs of the investigation pipeline.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use test_log::test;

use churnlens_kb::{
    context::render::{NO_EVIDENCE, NO_HYPOTHESIS, NO_INTERVENTION},
    test_utils::{InMemoryGraphStore, MockGraphStore},
    DataPacket, GraphStore, GraphStoreError, Row,
};
use churnlens_pipeline::{InvestigationRequest, Pipeline, PipelineConfig};

const CUSTOMER_QUERY: &str =
    "MATCH (c:Customer {id: $customer_id}) RETURN c.id AS customer, c.contract AS contract";

fn telco_store() -> InMemoryGraphStore {
    let mut row = Row::new();
    row.insert("customer".to_string(), DataPacket::from("7590-VHVEG"));
    row.insert("contract".to_string(), DataPacket::from("Month-to-month"));

    InMemoryGraphStore::new()
        .with_node("contract:month-to-month", "Contract")
        .with_node("internet:fiber-optic", "InternetService")
        .with_node("charges:high-monthly", "Billing")
        .with_node("churn:7590-VHVEG", "ChurnOutcome")
        .with_cause("contract:month-to-month", "churn:7590-VHVEG")
        .with_cause("internet:fiber-optic", "charges:high-monthly")
        .with_cause("charges:high-monthly", "churn:7590-VHVEG")
        .with_rows(CUSTOMER_QUERY, vec![row])
}

fn full_request() -> InvestigationRequest {
    InvestigationRequest::new("Why did customer 7590-VHVEG churn?")
        .with_cypher(CUSTOMER_QUERY)
        .with_param("customer_id", "7590-VHVEG")
        .with_source("internet:fiber-optic")
        .with_target("churn:7590-VHVEG")
}

#[test(tokio::test)]
async fn test_empty_run_renders_every_fallback() {
    let pipeline = Pipeline::new(PipelineConfig::default());
    let outcome = pipeline.invoke(InvestigationRequest::new("")).await;

    let response = outcome.response();
    assert!(response.starts_with("User query: \n"));
    assert!(response.contains(NO_EVIDENCE));
    assert!(response.contains(NO_HYPOTHESIS));
    assert!(response.contains(NO_INTERVENTION));
    assert!(response.contains("Uncertainty and caveats:"));
    assert_eq!(outcome.state.data, Some(vec![]));
    assert_eq!(outcome.state.causal_explanations, Some(vec![]));
    assert_eq!(outcome.state.interventions, Some(vec![]));
    assert!(outcome.state.errors.is_empty());
}

#[test(tokio::test)]
async fn test_full_run_over_in_memory_graph() {
    let config = PipelineConfig::default().with_client(Arc::new(telco_store()));
    let outcome = Pipeline::new(config).invoke(full_request()).await;

    let state = &outcome.state;
    assert_eq!(state.data.as_ref().map(Vec::len), Some(1));

    let explanations = state.causal_explanations.as_ref().unwrap();
    assert_eq!(explanations.len(), 1);
    assert_eq!(
        explanations[0].path,
        vec!["internet:fiber-optic", "charges:high-monthly", "churn:7590-VHVEG"]
    );

    let ranked: Vec<_> = state
        .interventions
        .as_ref()
        .unwrap()
        .iter()
        .map(|o| o.node_id.as_str())
        .collect();
    assert_eq!(
        ranked,
        vec!["contract:month-to-month", "charges:high-monthly", "internet:fiber-optic"]
    );

    let response = outcome.response();
    assert!(response.contains(r#"- {"contract":"Month-to-month","customer":"7590-VHVEG"}"#));
    assert!(response
        .contains("- Path: internet:fiber-optic -> charges:high-monthly -> churn:7590-VHVEG"));
    assert!(response.contains(
        "Prioritize mitigation on 'contract:month-to-month' to influence 'churn:7590-VHVEG'. \
         (effect=1.00, confidence=1.00)"
    ));
    assert!(!response.contains(NO_HYPOTHESIS));

    let ctx = outcome.context().unwrap();
    assert_eq!(ctx.query, "Why did customer 7590-VHVEG churn?");
    assert_eq!(ctx.uncertainty.len(), 2);
}

#[test(tokio::test)]
async fn test_limit_and_depth_come_from_config() {
    let config = PipelineConfig {
        intervention_limit: 1,
        intervention_depth: 1,
        ..PipelineConfig::default()
    }
    .with_client(Arc::new(telco_store()));
    let outcome = Pipeline::new(config).invoke(full_request()).await;

    let ranked = outcome.state.interventions.unwrap();
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].node_id, "contract:month-to-month");
}

#[test(tokio::test)]
async fn test_target_only_skips_explanation() {
    let config = PipelineConfig::default().with_client(Arc::new(telco_store()));
    let request =
        InvestigationRequest::new("What would reduce churn?").with_target("churn:7590-VHVEG");
    let outcome = Pipeline::new(config).invoke(request).await;

    assert_eq!(outcome.state.causal_explanations, Some(vec![]));
    assert_eq!(outcome.state.interventions.as_ref().map(Vec::len), Some(3));
    assert!(outcome.response().contains(NO_HYPOTHESIS));
    assert!(outcome.response().contains(NO_EVIDENCE));
}

#[test(tokio::test)]
async fn test_store_failures_degrade_each_stage() {
    let mut store = MockGraphStore::new();
    store
        .expect_execute()
        .returning(|_, _| Err(GraphStoreError::ConnectionError("connection refused".into())));

    let config = PipelineConfig::default().with_client(Arc::new(store));
    let outcome = Pipeline::new(config).invoke(full_request()).await;

    assert_eq!(outcome.state.errors.len(), 3);
    assert!(outcome.state.errors[0].starts_with("retrieve_facts:"));
    assert!(outcome.state.errors[2].contains("connection refused"));

    let response = outcome.response();
    assert!(response.contains(NO_EVIDENCE));
    assert!(response.contains(NO_HYPOTHESIS));
    assert!(response.contains(NO_INTERVENTION));
}

#[test(tokio::test)]
async fn test_concurrent_runs_keep_separate_state() {
    let store: Arc<dyn GraphStore> = Arc::new(telco_store());
    let pipeline = Arc::new(Pipeline::new(PipelineConfig::default().with_client(store)));

    let first = {
        let pipeline = Arc::clone(&pipeline);
        tokio::spawn(async move { pipeline.invoke(full_request()).await })
    };
    let second = {
        let pipeline = Arc::clone(&pipeline);
        tokio::spawn(async move { pipeline.invoke(InvestigationRequest::new("unrelated")).await })
    };

    let first = first.await.unwrap();
    let second = second.await.unwrap();
    assert_ne!(first.trace.trace_id, second.trace.trace_id);
    assert_eq!(first.state.interventions.as_ref().map(Vec::len), Some(3));
    assert_eq!(second.state.interventions, Some(vec![]));
    assert!(second.response().starts_with("User query: unrelated\n"));
}

#[test(tokio::test)]
async fn test_same_request_renders_identically() {
    let config = PipelineConfig::default().with_client(Arc::new(telco_store()));
    let pipeline = Pipeline::new(config);

    let a = pipeline.invoke(full_request()).await;
    let b = pipeline.invoke(full_request()).await;
    assert_eq!(a.response(), b.response());
}
