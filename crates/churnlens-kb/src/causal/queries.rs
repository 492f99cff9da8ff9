//! Prepared causal queries.
//!
//! Variable-length relationship bounds cannot be bound as Cypher parameters,
//! so the hop bound is baked into the query text. It only ever comes from a
//! [`TraversalDepth`], which keeps it inside `[1, 20]`; there is exactly one
//! query text per (kind, depth) pair. Node identifiers always travel as bound
//! parameters.

use std::fmt;

use crate::data::types::{DataPacket, QueryParams};

/// Smallest hop bound any traversal will use.
pub const MIN_TRAVERSAL_DEPTH: u8 = 1;
/// Largest hop bound any traversal will use.
pub const MAX_TRAVERSAL_DEPTH: u8 = 20;

/// A hop bound clamped to `[MIN_TRAVERSAL_DEPTH, MAX_TRAVERSAL_DEPTH]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TraversalDepth(u8);

impl TraversalDepth {
    /// Clamps any requested depth into range. Out-of-range values are never
    /// rejected.
    pub fn clamped(depth: i64) -> Self {
        let bounded = depth.clamp(MIN_TRAVERSAL_DEPTH as i64, MAX_TRAVERSAL_DEPTH as i64);
        Self(bounded as u8)
    }

    pub fn max() -> Self {
        Self(MAX_TRAVERSAL_DEPTH)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for TraversalDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which causal question a prepared query answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CausalQueryKind {
    /// Nodes reachable by following `CAUSES` edges forward.
    Descendants,
    /// Nodes that reach the root by following `CAUSES` edges.
    Ancestors,
    /// Every shortest directed `CAUSES` path between two nodes.
    ShortestPaths,
}

/// A causal query ready to hand to a `GraphStore`.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedQuery {
    pub kind: CausalQueryKind,
    pub depth: TraversalDepth,
    pub text: String,
    pub params: QueryParams,
}

impl PreparedQuery {
    pub fn descendants(node_id: &str, depth: TraversalDepth) -> Self {
        Self::neighbourhood(CausalQueryKind::Descendants, node_id, depth)
    }

    pub fn ancestors(node_id: &str, depth: TraversalDepth) -> Self {
        Self::neighbourhood(CausalQueryKind::Ancestors, node_id, depth)
    }

    pub fn shortest_paths(source_id: &str, target_id: &str, depth: TraversalDepth) -> Self {
        let mut params = QueryParams::new();
        params.insert("source_id".to_string(), DataPacket::from(source_id));
        params.insert("target_id".to_string(), DataPacket::from(target_id));
        params.insert("depth".to_string(), DataPacket::Integer(depth.get() as i64));
        Self {
            kind: CausalQueryKind::ShortestPaths,
            depth,
            text: query_text(CausalQueryKind::ShortestPaths, depth),
            params,
        }
    }

    fn neighbourhood(kind: CausalQueryKind, node_id: &str, depth: TraversalDepth) -> Self {
        let mut params = QueryParams::new();
        params.insert("node_id".to_string(), DataPacket::from(node_id));
        params.insert("depth".to_string(), DataPacket::Integer(depth.get() as i64));
        Self {
            kind,
            depth,
            text: query_text(kind, depth),
            params,
        }
    }

    /// Identifies a query text produced by this module.
    ///
    /// Lets stores without a Cypher engine answer the prepared family.
    pub fn recognize(text: &str) -> Option<(CausalQueryKind, TraversalDepth)> {
        let kinds = [
            CausalQueryKind::Descendants,
            CausalQueryKind::Ancestors,
            CausalQueryKind::ShortestPaths,
        ];
        for kind in kinds {
            for d in MIN_TRAVERSAL_DEPTH..=MAX_TRAVERSAL_DEPTH {
                let depth = TraversalDepth(d);
                if query_text(kind, depth) == text {
                    return Some((kind, depth));
                }
            }
        }
        None
    }
}

/// Renders the Cypher text for a kind at a given bound.
pub fn query_text(kind: CausalQueryKind, depth: TraversalDepth) -> String {
    let d = depth.get();
    match kind {
        CausalQueryKind::Descendants => format!(
            "MATCH (n) WHERE n.id = $node_id OR n.name = $node_id \
             MATCH (n)-[:CAUSES*1..{d}]->(x) \
             RETURN DISTINCT x.id AS id, x.name AS name, labels(x)[0] AS label"
        ),
        CausalQueryKind::Ancestors => format!(
            "MATCH (n) WHERE n.id = $node_id OR n.name = $node_id \
             MATCH (x)-[:CAUSES*1..{d}]->(n) \
             RETURN DISTINCT x.id AS id, x.name AS name, labels(x)[0] AS label"
        ),
        CausalQueryKind::ShortestPaths => format!(
            "MATCH (s) WHERE s.id = $source_id OR s.name = $source_id \
             MATCH (t) WHERE (t.id = $target_id OR t.name = $target_id) AND t <> s \
             MATCH p = allShortestPaths((s)-[:CAUSES*1..{d}]->(t)) \
             RETURN [n IN nodes(p) | coalesce(n.id, n.name, '')] AS path"
        ),
    }
}
