//! GraphStore trait definition for graph database interaction

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::data::{errors::GraphStoreError, types::{QueryParams, Row}};

/// Represents a set of nodes and relationships used to seed a graph.
/// Fixture files and the in-memory store share this shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDataPatch {
    /// Nodes as JSON objects carrying `id` and/or `name`, plus `label` or `labels`.
    #[serde(default)]
    pub nodes: Vec<serde_json::Value>,

    /// Relationships as JSON objects with `from`, `to` and `type`.
    #[serde(default)]
    pub edges: Vec<serde_json::Value>,
}

/// Represents the interface for interacting with the graph database.
/// This abstracts the underlying database technology (e.g., Neo4j).
///
/// Implementations must tolerate concurrent callers; connection and session
/// handling belong to the implementation.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Executes a query with bound parameters.
    ///
    /// Contract: returns one row per result record, keyed by the query's
    /// return aliases. A query that matches nothing returns an empty vec.
    async fn execute(&self, query: &str, params: QueryParams) -> Result<Vec<Row>, GraphStoreError>;
}
