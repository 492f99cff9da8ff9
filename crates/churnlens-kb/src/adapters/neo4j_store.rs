use async_trait::async_trait;
use neo4rs::{ConfigBuilder, Graph, Node, Query};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    data::{
        errors::GraphStoreError,
        types::{DataPacket, QueryParams, Row},
    },
    traits::GraphStore,
};

/// Configuration for Neo4j connection
#[derive(Debug, Clone)]
pub struct Neo4jConfig {
    pub uri: String,
    pub username: String,
    pub password: String,
    pub database: Option<String>,
    pub pool_size: usize,
    pub connection_retry_count: u32,
    pub connection_retry_delay: Duration,
}

impl Default for Neo4jConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            username: "neo4j".to_string(),
            password: String::new(),
            database: None,
            pool_size: 10,
            connection_retry_count: 3,
            connection_retry_delay: Duration::from_secs(2),
        }
    }
}

/// Neo4j implementation of the `GraphStore` trait
pub struct Neo4jGraphStore {
    graph: Arc<Graph>,
    config: Neo4jConfig,
}

impl Neo4jGraphStore {
    /// Returns the configuration used for this store
    pub fn config(&self) -> &Neo4jConfig {
        &self.config
    }

    /// Connects with retries, verifying each connection with a trivial query.
    pub async fn connect(config: Neo4jConfig) -> Result<Self, GraphStoreError> {
        let mut config_builder = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.username)
            .password(&config.password)
            .max_connections(config.pool_size);

        if let Some(db) = &config.database {
            config_builder = config_builder.db(db.as_str());
        }

        let neo4j_config = config_builder
            .build()
            .map_err(|e| {
                GraphStoreError::ConnectionError(format!("Failed to build Neo4j config: {}", e))
            })?;

        let attempts = config.connection_retry_count.max(1);
        let mut last_error = None;
        for attempt in 1..=attempts {
            match Graph::connect(neo4j_config.clone()).await {
                Ok(graph) => match graph.execute(Query::new("RETURN 1 AS ok".to_string())).await {
                    Ok(_) => {
                        info!("Connected to Neo4j at {} (attempt {})", config.uri, attempt);
                        return Ok(Self {
                            graph: Arc::new(graph),
                            config,
                        });
                    }
                    Err(e) => {
                        error!("Connection test failed: {}", e);
                        last_error = Some(e.to_string());
                    }
                },
                Err(e) => {
                    error!("Failed to connect to Neo4j (attempt {}): {}", attempt, e);
                    last_error = Some(e.to_string());
                }
            }
            if attempt < attempts {
                tokio::time::sleep(config.connection_retry_delay).await;
            }
        }

        Err(GraphStoreError::ConnectionError(format!(
            "Failed to connect to Neo4j at {} after {} attempts: {}",
            config.uri,
            attempts,
            last_error.unwrap_or_else(|| "unknown error".to_string())
        )))
    }

    fn row_to_map(&self, row: &neo4rs::Row, columns: &[String]) -> Row {
        let mut map = Row::new();
        for column in columns {
            let value = if let Ok(value) = row.get::<String>(column) {
                DataPacket::String(value)
            } else if let Ok(value) = row.get::<i64>(column) {
                DataPacket::Integer(value)
            } else if let Ok(value) = row.get::<f64>(column) {
                DataPacket::Number(value)
            } else if let Ok(value) = row.get::<bool>(column) {
                DataPacket::Bool(value)
            } else if let Ok(values) = row.get::<Vec<String>>(column) {
                DataPacket::Array(values.into_iter().map(DataPacket::String).collect())
            } else if let Ok(node) = row.get::<Node>(column) {
                node_to_packet(&node)
            } else {
                DataPacket::Null
            };
            map.insert(column.clone(), value);
        }
        map
    }
}

fn node_to_packet(node: &Node) -> DataPacket {
    let mut props = Row::new();
    for key in node.keys() {
        let value = if let Ok(value) = node.get::<String>(key) {
            DataPacket::String(value)
        } else if let Ok(value) = node.get::<i64>(key) {
            DataPacket::Integer(value)
        } else if let Ok(value) = node.get::<f64>(key) {
            DataPacket::Number(value)
        } else if let Ok(value) = node.get::<bool>(key) {
            DataPacket::Bool(value)
        } else {
            continue;
        };
        props.insert(key.to_string(), value);
    }
    DataPacket::Object(props)
}

fn bind(query: Query, key: &str, value: DataPacket) -> Query {
    match value {
        DataPacket::Null => query,
        DataPacket::Bool(b) => query.param(key, b),
        DataPacket::Integer(i) => query.param(key, i),
        DataPacket::Number(n) => query.param(key, n),
        DataPacket::String(s) => query.param(key, s.as_str()),
        DataPacket::Array(items) => {
            // Lists are bound as strings
            let strings: Vec<String> = items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .unwrap_or_else(|| item.to_json().to_string())
                })
                .collect();
            query.param(key, strings)
        }
        DataPacket::Json(serde_json::Value::Object(_)) | DataPacket::Object(_) => {
            warn!("Skipping object parameter: {}", key);
            query
        }
        DataPacket::Json(json) => bind(query, key, DataPacket::from_json(json)),
    }
}

/// Column names of the final `RETURN` clause: the alias after `AS`, else the
/// expression text. Line breaks and indentation are treated as single spaces.
pub(crate) fn return_columns(query: &str) -> Vec<String> {
    let query = query.split_whitespace().collect::<Vec<_>>().join(" ");
    let upper = query.to_ascii_uppercase();
    let Some(start) = upper.rfind("RETURN ") else {
        return Vec::new();
    };
    let mut clause = &query[start + "RETURN ".len()..];
    let mut clause_upper = &upper[start + "RETURN ".len()..];

    let trimmed = clause_upper.trim_start();
    if trimmed.starts_with("DISTINCT ") {
        let skip = clause_upper.len() - trimmed.len() + "DISTINCT ".len();
        clause = &clause[skip..];
        clause_upper = &clause_upper[skip..];
    }
    for tail in [" ORDER BY ", " SKIP ", " LIMIT "] {
        if let Some(end) = clause_upper.find(tail) {
            clause = &clause[..end];
            clause_upper = &clause_upper[..end];
        }
    }

    split_top_level(clause)
        .into_iter()
        .map(|item| {
            let upper_item = item.to_ascii_uppercase();
            let name = match upper_item.rfind(" AS ") {
                Some(pos) => &item[pos + " AS ".len()..],
                None => item,
            };
            name.trim().trim_matches('`').to_string()
        })
        .filter(|name| !name.is_empty())
        .collect()
}

// Splits on commas outside brackets and string literals.
fn split_top_level(clause: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut begin = 0;
    for (i, c) in clause.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '(' | '[' | '{') => depth += 1,
            (None, ')' | ']' | '}') => depth -= 1,
            (None, ',') if depth == 0 => {
                parts.push(clause[begin..i].trim());
                begin = i + 1;
            }
            _ => {}
        }
    }
    parts.push(clause[begin..].trim());
    parts
}

#[async_trait]
impl GraphStore for Neo4jGraphStore {
    #[instrument(skip(self, query, params))]
    async fn execute(&self, query: &str, params: QueryParams) -> Result<Vec<Row>, GraphStoreError> {
        debug!("Executing query: {}", query);

        let mut q = Query::new(query.to_string());
        for (key, value) in params {
            q = bind(q, &key, value);
        }

        let mut result = self
            .graph
            .execute(q)
            .await
            .map_err(|e| GraphStoreError::QueryError(format!("Failed to execute query: {}", e)))?;

        let columns = return_columns(query);
        let mut rows = Vec::new();
        loop {
            match result.next().await {
                Ok(Some(row)) => rows.push(self.row_to_map(&row, &columns)),
                Ok(None) => break,
                Err(e) => {
                    return Err(GraphStoreError::QueryError(format!(
                        "Failed to read result row: {}",
                        e
                    )))
                }
            }
        }
        debug!(rows = rows.len(), "Query returned");
        Ok(rows)
    }
}
