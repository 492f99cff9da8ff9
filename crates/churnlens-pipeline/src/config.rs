//! Configuration for the investigation pipeline
//!
//! `Settings` is read from the environment (and `.env`) once by the caller and
//! passed down by value; `PipelineConfig` is what a `Pipeline` is built with.

use std::env;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

use churnlens_kb::causal::ranker::{DEFAULT_INTERVENTION_DEPTH, DEFAULT_INTERVENTION_LIMIT};
use churnlens_kb::GraphStore;

pub const DEFAULT_MAX_DEPTH: i64 = 5;

/// Collaborators and knobs for one pipeline.
#[derive(Clone)]
pub struct PipelineConfig {
    /// Graph store; stages that need it produce empty output without one.
    pub client: Option<Arc<dyn GraphStore>>,
    /// Hop bound for causal path explanation.
    pub max_depth: i64,
    /// Maximum number of ranked interventions.
    pub intervention_limit: usize,
    /// Hop bound for the upstream candidate search.
    pub intervention_depth: i64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            client: None,
            max_depth: DEFAULT_MAX_DEPTH,
            intervention_limit: DEFAULT_INTERVENTION_LIMIT,
            intervention_depth: DEFAULT_INTERVENTION_DEPTH,
        }
    }
}

impl PipelineConfig {
    /// Knobs from settings, no store attached.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            client: None,
            max_depth: settings.max_depth,
            intervention_limit: settings.intervention_limit,
            intervention_depth: settings.intervention_depth,
        }
    }

    pub fn with_client(mut self, client: Arc<dyn GraphStore>) -> Self {
        self.client = Some(client);
        self
    }
}

impl fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("client", &self.client.as_ref().map(|_| "<GraphStore>"))
            .field("max_depth", &self.max_depth)
            .field("intervention_limit", &self.intervention_limit)
            .field("intervention_depth", &self.intervention_depth)
            .finish()
    }
}

/// Environment-derived settings
#[derive(Clone, PartialEq)]
pub struct Settings {
    pub neo4j_uri: String,
    pub neo4j_user: String,
    pub neo4j_password: String,
    pub neo4j_database: Option<String>,
    pub max_depth: i64,
    pub intervention_limit: usize,
    pub intervention_depth: i64,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            neo4j_uri: "bolt://localhost:7687".to_string(),
            neo4j_user: "neo4j".to_string(),
            neo4j_password: String::new(),
            neo4j_database: None,
            max_depth: DEFAULT_MAX_DEPTH,
            intervention_limit: DEFAULT_INTERVENTION_LIMIT,
            intervention_depth: DEFAULT_INTERVENTION_DEPTH,
            log_filter: churnlens_kb::DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Settings {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from any key lookup. Unset keys keep their defaults;
    /// unparsable numbers are logged and ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(uri) = lookup("NEO4J_URI") {
            settings.neo4j_uri = uri;
        }
        if let Some(user) = lookup("NEO4J_USER") {
            settings.neo4j_user = user;
        }
        if let Some(password) = lookup("NEO4J_PASSWORD") {
            settings.neo4j_password = password;
        }
        settings.neo4j_database = lookup("NEO4J_DATABASE").filter(|db| !db.is_empty());

        if let Some(value) = lookup("CHURNLENS_MAX_DEPTH") {
            match value.parse::<i64>() {
                Ok(depth) => settings.max_depth = depth,
                Err(_) => warn!("Invalid CHURNLENS_MAX_DEPTH value: {}", value),
            }
        }
        if let Some(value) = lookup("CHURNLENS_INTERVENTION_LIMIT") {
            match value.parse::<usize>() {
                Ok(limit) => settings.intervention_limit = limit,
                Err(_) => warn!("Invalid CHURNLENS_INTERVENTION_LIMIT value: {}", value),
            }
        }
        if let Some(value) = lookup("CHURNLENS_INTERVENTION_DEPTH") {
            match value.parse::<i64>() {
                Ok(depth) => settings.intervention_depth = depth,
                Err(_) => warn!("Invalid CHURNLENS_INTERVENTION_DEPTH value: {}", value),
            }
        }
        if let Some(filter) = lookup("LOG_FILTER") {
            settings.log_filter = filter;
        }

        settings
    }

    /// Connection settings for the Neo4j adapter.
    #[cfg(feature = "adapters")]
    pub fn neo4j_config(&self) -> churnlens_kb::Neo4jConfig {
        churnlens_kb::Neo4jConfig {
            uri: self.neo4j_uri.clone(),
            username: self.neo4j_user.clone(),
            password: self.neo4j_password.clone(),
            database: self.neo4j_database.clone(),
            ..Default::default()
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("neo4j_uri", &self.neo4j_uri)
            .field("neo4j_user", &self.neo4j_user)
            .field("neo4j_password", &"<redacted>")
            .field("neo4j_database", &self.neo4j_database)
            .field("max_depth", &self.max_depth)
            .field("intervention_limit", &self.intervention_limit)
            .field("intervention_depth", &self.intervention_depth)
            .field("log_filter", &self.log_filter)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let settings = Settings::from_lookup(lookup(&[]));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.neo4j_uri, "bolt://localhost:7687");
        assert_eq!(settings.max_depth, 5);
        assert_eq!(settings.intervention_limit, 5);
        assert_eq!(settings.intervention_depth, 2);
    }

    #[test]
    fn test_overrides_and_invalid_values() {
        let settings = Settings::from_lookup(lookup(&[
            ("NEO4J_URI", "bolt://graph:7687"),
            ("NEO4J_PASSWORD", "s3cret"),
            ("NEO4J_DATABASE", ""),
            ("CHURNLENS_MAX_DEPTH", "8"),
            ("CHURNLENS_INTERVENTION_LIMIT", "-1"),
            ("CHURNLENS_INTERVENTION_DEPTH", "three"),
        ]));
        assert_eq!(settings.neo4j_uri, "bolt://graph:7687");
        assert_eq!(settings.neo4j_database, None);
        assert_eq!(settings.max_depth, 8);
        assert_eq!(settings.intervention_limit, 5);
        assert_eq!(settings.intervention_depth, 2);
        assert!(!format!("{:?}", settings).contains("s3cret"));
    }

    #[test]
    fn test_pipeline_config_from_settings() {
        let settings = Settings {
            max_depth: 9,
            intervention_limit: 3,
            ..Settings::default()
        };
        let config = PipelineConfig::from_settings(&settings);
        assert!(config.client.is_none());
        assert_eq!(config.max_depth, 9);
        assert_eq!(config.intervention_limit, 3);
        assert_eq!(config.intervention_depth, 2);
    }
}
