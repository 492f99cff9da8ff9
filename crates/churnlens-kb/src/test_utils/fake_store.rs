//! In-memory `GraphStore` for tests, demos and offline investigation.
//!
//! Holds nodes and directed `CAUSES` edges and answers the prepared causal
//! queries with breadth-first search. Any other query text gets the rows
//! registered for it, or nothing.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::causal::queries::{CausalQueryKind, PreparedQuery, TraversalDepth};
use crate::data::{
    errors::{FixtureError, GraphStoreError},
    identity::NodeIdentity,
    types::{DataPacket, QueryParams, Row},
};
use crate::traits::{GraphDataPatch, GraphStore};

const CAUSES: &str = "CAUSES";

/// Rows to return verbatim for one query text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CannedQuery {
    pub query: String,
    #[serde(default)]
    pub rows: Vec<Value>,
}

/// On-disk fixture: a graph plus optional canned query answers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphFixture {
    #[serde(flatten)]
    pub graph: GraphDataPatch,
    #[serde(default)]
    pub queries: Vec<CannedQuery>,
}

#[derive(Debug, Clone)]
struct StoredNode {
    props: BTreeMap<String, DataPacket>,
    label: Option<String>,
}

impl StoredNode {
    fn prop_str(&self, key: &str) -> Option<&str> {
        self.props.get(key).and_then(DataPacket::as_str)
    }

    fn answers_to(&self, key: &str) -> bool {
        self.prop_str("id") == Some(key) || self.prop_str("name") == Some(key)
    }

    // coalesce(n.id, n.name, '')
    fn path_identity(&self) -> String {
        self.prop_str("id")
            .or_else(|| self.prop_str("name"))
            .unwrap_or_default()
            .to_string()
    }
}

/// Graph store backed by plain vectors.
#[derive(Default)]
pub struct InMemoryGraphStore {
    nodes: Vec<StoredNode>,
    outgoing: Vec<Vec<usize>>,
    incoming: Vec<Vec<usize>>,
    canned: Mutex<HashMap<String, Vec<Row>>>,
    executed: Mutex<Vec<String>>,
}

impl InMemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node addressed by `id`.
    pub fn with_node(mut self, id: &str, label: &str) -> Self {
        let mut props = BTreeMap::new();
        props.insert("id".to_string(), DataPacket::from(id));
        self.push_node(props, Some(label.to_string()));
        self
    }

    /// Adds a node that only carries a `name`.
    pub fn with_named_node(mut self, name: &str, label: &str) -> Self {
        let mut props = BTreeMap::new();
        props.insert("name".to_string(), DataPacket::from(name));
        self.push_node(props, Some(label.to_string()));
        self
    }

    /// Adds `from -[:CAUSES]-> to`. Unknown endpoints are created as
    /// unlabelled nodes with that id.
    pub fn with_cause(mut self, from: &str, to: &str) -> Self {
        let from = self.index_or_insert(from);
        let to = self.index_or_insert(to);
        self.link(from, to);
        self
    }

    /// Registers rows for a query text outside the prepared causal family.
    pub fn with_rows(self, query: &str, rows: Vec<Row>) -> Self {
        self.add_rows_for_query(query, rows);
        self
    }

    pub fn add_rows_for_query(&self, query: &str, rows: Vec<Row>) {
        if let Ok(mut canned) = self.canned.lock() {
            canned.insert(query.to_string(), rows);
        }
    }

    /// Query texts seen so far, in execution order.
    pub fn executed_queries(&self) -> Vec<String> {
        self.executed.lock().map(|q| q.clone()).unwrap_or_default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.outgoing.iter().map(Vec::len).sum()
    }

    /// Builds a store from a node/edge patch. Only `CAUSES` edges are kept.
    pub fn from_patch(patch: &GraphDataPatch) -> Result<Self, FixtureError> {
        let mut store = Self::new();
        for node in &patch.nodes {
            let (props, label) = parse_node(node)?;
            store.push_node(props, label);
        }
        for edge in &patch.edges {
            let Some(obj) = edge.as_object() else {
                return Err(FixtureError::Invalid(format!("edge is not an object: {edge}")));
            };
            let rel_type = obj
                .get("type")
                .or_else(|| obj.get("relationship_type"))
                .and_then(Value::as_str)
                .unwrap_or(CAUSES);
            if rel_type != CAUSES {
                debug!(rel_type, "Skipping non-causal edge");
                continue;
            }
            let from = store.endpoint(obj.get("from"))?;
            let to = store.endpoint(obj.get("to"))?;
            store.link(from, to);
        }
        Ok(store)
    }

    /// Loads a [`GraphFixture`] from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let fixture: GraphFixture = serde_json::from_str(&content)?;
        let store = Self::from_patch(&fixture.graph)?;
        for canned in fixture.queries {
            let mut rows = Vec::with_capacity(canned.rows.len());
            for value in canned.rows {
                match DataPacket::from_json(value) {
                    DataPacket::Object(row) => rows.push(row),
                    other => {
                        return Err(FixtureError::Invalid(format!(
                            "canned row for '{}' is not an object: {:?}",
                            canned.query, other
                        )))
                    }
                }
            }
            store.add_rows_for_query(&canned.query, rows);
        }
        Ok(store)
    }

    fn push_node(&mut self, props: BTreeMap<String, DataPacket>, label: Option<String>) -> usize {
        self.nodes.push(StoredNode { props, label });
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        self.nodes.len() - 1
    }

    fn link(&mut self, from: usize, to: usize) {
        self.outgoing[from].push(to);
        self.incoming[to].push(from);
    }

    fn index_of(&self, key: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.answers_to(key))
    }

    fn index_or_insert(&mut self, key: &str) -> usize {
        match self.index_of(key) {
            Some(idx) => idx,
            None => {
                let mut props = BTreeMap::new();
                props.insert("id".to_string(), DataPacket::from(key));
                self.push_node(props, None)
            }
        }
    }

    fn endpoint(&self, value: Option<&Value>) -> Result<usize, FixtureError> {
        let key = match value {
            Some(Value::String(s)) => s.clone(),
            Some(other) => DataPacket::from_json(other.clone()).resolve_identity(),
            None => String::new(),
        };
        if key.is_empty() {
            return Err(FixtureError::Invalid("edge endpoint has no id or name".to_string()));
        }
        self.index_of(&key)
            .ok_or_else(|| FixtureError::Invalid(format!("edge references unknown node '{key}'")))
    }

    // MATCH (n) WHERE n.id = $key OR n.name = $key
    fn resolve(&self, key: &str) -> Vec<usize> {
        (0..self.nodes.len()).filter(|&i| self.nodes[i].answers_to(key)).collect()
    }

    /// Distinct nodes within `depth` hops of any root, in discovery order.
    /// A root reached again through a cycle is included.
    fn reachable(
        &self,
        roots: &[usize],
        depth: TraversalDepth,
        edges: &[Vec<usize>],
    ) -> Vec<usize> {
        let mut found = Vec::new();
        let mut distinct = HashSet::new();
        for &root in roots {
            let mut visited = HashSet::new();
            let mut frontier = vec![root];
            for _ in 0..depth.get() {
                let mut next = Vec::new();
                for node in frontier {
                    for &neighbour in &edges[node] {
                        if visited.insert(neighbour) {
                            next.push(neighbour);
                            if distinct.insert(neighbour) {
                                found.push(neighbour);
                            }
                        }
                    }
                }
                if next.is_empty() {
                    break;
                }
                frontier = next;
            }
        }
        found
    }

    /// Every shortest forward path from `source` to `target` within `depth` hops.
    fn shortest_paths(
        &self,
        source: usize,
        target: usize,
        depth: TraversalDepth,
    ) -> Vec<Vec<usize>> {
        let mut dist: Vec<Option<usize>> = vec![None; self.nodes.len()];
        let mut preds: Vec<Vec<usize>> = vec![Vec::new(); self.nodes.len()];
        dist[source] = Some(0);

        let mut frontier = vec![source];
        let mut level = 0;
        while !frontier.is_empty() && level < depth.get() as usize && dist[target].is_none() {
            level += 1;
            let mut next = Vec::new();
            for &node in &frontier {
                for &neighbour in &self.outgoing[node] {
                    match dist[neighbour] {
                        None => {
                            dist[neighbour] = Some(level);
                            preds[neighbour].push(node);
                            next.push(neighbour);
                        }
                        Some(d) if d == level && !preds[neighbour].contains(&node) => {
                            preds[neighbour].push(node);
                        }
                        _ => {}
                    }
                }
            }
            frontier = next;
        }

        let mut paths = Vec::new();
        if dist[target].is_some() {
            let mut suffix = Vec::new();
            unwind(target, source, &preds, &mut suffix, &mut paths);
        }
        paths
    }

    fn neighbourhood_row(&self, idx: usize) -> Row {
        let node = &self.nodes[idx];
        let mut row = Row::new();
        row.insert("id".to_string(), node.props.get("id").cloned().unwrap_or(DataPacket::Null));
        row.insert("name".to_string(), node.props.get("name").cloned().unwrap_or(DataPacket::Null));
        row.insert(
            "label".to_string(),
            node.label.clone().map(DataPacket::from).unwrap_or(DataPacket::Null),
        );
        row
    }

    fn answer(
        &self,
        kind: CausalQueryKind,
        depth: TraversalDepth,
        params: &QueryParams,
    ) -> Result<Vec<Row>, GraphStoreError> {
        match kind {
            CausalQueryKind::Descendants | CausalQueryKind::Ancestors => {
                let roots = self.resolve(required_param(params, "node_id")?);
                let edges = if kind == CausalQueryKind::Descendants {
                    &self.outgoing
                } else {
                    &self.incoming
                };
                Ok(self
                    .reachable(&roots, depth, edges)
                    .into_iter()
                    .map(|idx| self.neighbourhood_row(idx))
                    .collect())
            }
            CausalQueryKind::ShortestPaths => {
                let sources = self.resolve(required_param(params, "source_id")?);
                let targets = self.resolve(required_param(params, "target_id")?);
                let mut rows = Vec::new();
                for &s in &sources {
                    for &t in targets.iter().filter(|&&t| t != s) {
                        for path in self.shortest_paths(s, t, depth) {
                            let ids = path
                                .into_iter()
                                .map(|idx| DataPacket::String(self.nodes[idx].path_identity()))
                                .collect();
                            let mut row = Row::new();
                            row.insert("path".to_string(), DataPacket::Array(ids));
                            rows.push(row);
                        }
                    }
                }
                Ok(rows)
            }
        }
    }
}

fn unwind(
    current: usize,
    source: usize,
    preds: &[Vec<usize>],
    suffix: &mut Vec<usize>,
    paths: &mut Vec<Vec<usize>>,
) {
    suffix.push(current);
    if current == source {
        paths.push(suffix.iter().rev().copied().collect());
    } else {
        for &prev in &preds[current] {
            unwind(prev, source, preds, suffix, paths);
        }
    }
    suffix.pop();
}

fn required_param<'a>(params: &'a QueryParams, key: &str) -> Result<&'a str, GraphStoreError> {
    params
        .get(key)
        .and_then(DataPacket::as_str)
        .ok_or_else(|| GraphStoreError::InvalidInput(format!("Missing parameter '{key}'")))
}

fn parse_node(
    value: &Value,
) -> Result<(BTreeMap<String, DataPacket>, Option<String>), FixtureError> {
    let Some(obj) = value.as_object() else {
        return Err(FixtureError::Invalid(format!("node is not an object: {value}")));
    };

    let label = obj
        .get("label")
        .and_then(Value::as_str)
        .or_else(|| {
            obj.get("labels")
                .and_then(Value::as_array)
                .and_then(|labels| labels.first())
                .and_then(Value::as_str)
        })
        .map(str::to_string);

    let mut props = BTreeMap::new();
    if let Some(Value::Object(nested)) = obj.get("properties") {
        for (k, v) in nested {
            props.insert(k.clone(), DataPacket::from_json(v.clone()));
        }
    }
    for (k, v) in obj {
        if matches!(k.as_str(), "label" | "labels" | "properties") {
            continue;
        }
        props.insert(k.clone(), DataPacket::from_json(v.clone()));
    }

    if DataPacket::Object(props.clone()).resolve_identity().is_empty() {
        return Err(FixtureError::Invalid(format!("node has no id or name: {value}")));
    }
    Ok((props, label))
}

impl fmt::Debug for InMemoryGraphStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryGraphStore")
            .field("nodes", &self.nodes.len())
            .field("edges", &self.edge_count())
            .finish()
    }
}

#[async_trait]
impl GraphStore for InMemoryGraphStore {
    #[instrument(skip(self, params), level = "debug")]
    async fn execute(&self, query: &str, params: QueryParams) -> Result<Vec<Row>, GraphStoreError> {
        if let Ok(mut executed) = self.executed.lock() {
            executed.push(query.to_string());
        }

        if let Some((kind, depth)) = PreparedQuery::recognize(query) {
            let rows = self.answer(kind, depth, &params)?;
            debug!(
                ?kind,
                depth = depth.get(),
                rows = rows.len(),
                "Answered causal query in memory"
            );
            return Ok(rows);
        }

        let canned = self
            .canned
            .lock()
            .map_err(|e| GraphStoreError::Unknown(format!("Canned rows unavailable: {e}")))?;
        Ok(canned.get(query).cloned().unwrap_or_default())
    }
}
