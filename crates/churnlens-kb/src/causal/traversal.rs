//! Bounded traversal over `CAUSES` edges.
//!
//! Forward ("what does this cause?") and backward ("what causes this?")
//! neighbourhoods, plus shortest-path discovery between two nodes.

use std::collections::HashSet;

use tracing::{debug, instrument};

use crate::causal::queries::{PreparedQuery, TraversalDepth};
use crate::data::{
    entities::{CausalNode, CausalPath},
    errors::GraphStoreError,
    identity::{NodeIdentity, NodeRef},
    types::Row,
};
use crate::traits::GraphStore;

/// Nodes causally downstream of `node_id`, within `depth` hops.
#[instrument(skip(store), fields(depth = %TraversalDepth::clamped(depth)))]
pub async fn descendants(
    store: &dyn GraphStore,
    node_id: &str,
    depth: i64,
) -> Result<Vec<CausalNode>, GraphStoreError> {
    if node_id.is_empty() {
        return Ok(Vec::new());
    }
    let query = PreparedQuery::descendants(node_id, TraversalDepth::clamped(depth));
    let rows = store.execute(&query.text, query.params).await?;
    Ok(collect_nodes(&rows))
}

/// Nodes causally upstream of `node_id`, within `depth` hops.
#[instrument(skip(store), fields(depth = %TraversalDepth::clamped(depth)))]
pub async fn ancestors(
    store: &dyn GraphStore,
    node_id: &str,
    depth: i64,
) -> Result<Vec<CausalNode>, GraphStoreError> {
    if node_id.is_empty() {
        return Ok(Vec::new());
    }
    let query = PreparedQuery::ancestors(node_id, TraversalDepth::clamped(depth));
    let rows = store.execute(&query.text, query.params).await?;
    Ok(collect_nodes(&rows))
}

/// Every shortest directed causal path from `source_id` to `target_id`
/// within `max_depth` hops. Empty when either endpoint is unknown or no
/// chain connects them.
#[instrument(skip(store), fields(depth = %TraversalDepth::clamped(max_depth)))]
pub async fn shortest_causal_paths(
    store: &dyn GraphStore,
    source_id: &str,
    target_id: &str,
    max_depth: i64,
) -> Result<Vec<CausalPath>, GraphStoreError> {
    if source_id.is_empty() || target_id.is_empty() {
        return Ok(Vec::new());
    }
    let depth = TraversalDepth::clamped(max_depth);
    let query = PreparedQuery::shortest_paths(source_id, target_id, depth);
    let rows = store.execute(&query.text, query.params).await?;

    let mut seen = HashSet::new();
    let mut paths = Vec::new();
    for row in &rows {
        let Some(cells) = row.get("path").and_then(|p| p.as_array()) else {
            continue;
        };
        let path: CausalPath = cells.iter().map(|cell| cell.resolve_identity()).collect();
        if path.iter().all(String::is_empty) {
            continue;
        }
        if seen.insert(path.clone()) {
            paths.push(path);
        }
    }
    debug!(rows = rows.len(), paths = paths.len(), "Collected shortest causal paths");
    Ok(paths)
}

/// Reads `{id, label}` pairs out of neighbourhood rows, first occurrence wins.
fn collect_nodes(rows: &[Row]) -> Vec<CausalNode> {
    let mut seen = HashSet::new();
    let mut nodes = Vec::new();
    for row in rows {
        let id = row_node(row).resolve_identity();
        if id.is_empty() || !seen.insert(id.clone()) {
            continue;
        }
        let label = row.get("label").and_then(|l| l.as_str()).map(str::to_string);
        nodes.push(CausalNode { id, label });
    }
    debug!(rows = rows.len(), nodes = nodes.len(), "Collected causal neighbourhood");
    nodes
}

// Prepared queries project `id`/`name`; stores that return the whole node
// under `x` are accepted too.
fn row_node(row: &Row) -> NodeRef {
    if let Some(node) = row.get("x").and_then(NodeRef::from_packet) {
        return node;
    }
    NodeRef::Record {
        id: row.get("id").and_then(|v| v.as_str()).map(str::to_string),
        name: row.get("name").and_then(|v| v.as_str()).map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::types::DataPacket;
    use crate::traits::MockGraphStore;
    use serde_json::json;

    fn row(value: serde_json::Value) -> Row {
        match DataPacket::from_json(value) {
            DataPacket::Object(map) => map,
            _ => unreachable!("test rows are objects"),
        }
    }

    #[tokio::test]
    async fn test_empty_store_has_no_descendants() {
        let mut store = MockGraphStore::new();
        store.expect_execute().returning(|_, _| Ok(vec![]));

        let result = descendants(&store, "anything", 3).await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_ancestors_dedupes_and_skips_blank_identities() {
        let mut store = MockGraphStore::new();
        store.expect_execute().returning(|_, _| {
            Ok(vec![
                row(json!({"id": "ct1", "name": null, "label": "Contract"})),
                row(json!({"id": null, "name": null, "label": "Offer"})),
                row(json!({"x": {"id": "ct1"}, "label": "Contract"})),
                row(json!({"id": null, "name": "Offer E", "label": "Offer"})),
            ])
        });

        let result = ancestors(&store, "churn:abc", 2).await.unwrap();
        assert_eq!(
            result,
            vec![
                CausalNode { id: "ct1".into(), label: Some("Contract".into()) },
                CausalNode { id: "Offer E".into(), label: Some("Offer".into()) },
            ]
        );
    }

    #[tokio::test]
    async fn test_depth_reaching_the_store_is_clamped() {
        let mut store = MockGraphStore::new();
        store
            .expect_execute()
            .withf(|query, params| {
                query.contains("[:CAUSES*1..20]") && params["depth"] == DataPacket::Integer(20)
            })
            .times(1)
            .returning(|_, _| Ok(vec![]));

        descendants(&store, "ct1", 500).await.unwrap();
    }

    #[tokio::test]
    async fn test_blank_node_id_never_queries() {
        let mut store = MockGraphStore::new();
        store.expect_execute().never();

        assert!(ancestors(&store, "", 2).await.unwrap().is_empty());
        assert!(shortest_causal_paths(&store, "a", "", 2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut store = MockGraphStore::new();
        store
            .expect_execute()
            .returning(|_, _| Err(GraphStoreError::QueryError("syntax".into())));

        let err = shortest_causal_paths(&store, "a", "b", 5).await.unwrap_err();
        assert_eq!(err, GraphStoreError::QueryError("syntax".into()));
    }

    #[tokio::test]
    async fn test_duplicate_paths_collapse() {
        let mut store = MockGraphStore::new();
        store.expect_execute().returning(|_, _| {
            Ok(vec![
                row(json!({"path": ["a", "b", "c"]})),
                row(json!({"path": ["a", "b", "c"]})),
                row(json!({"path": ["a", "d", "c"]})),
                row(json!({"path": []})),
            ])
        });

        let paths = shortest_causal_paths(&store, "a", "c", 5).await.unwrap();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[1], vec!["a", "d", "c"]);
    }
}
