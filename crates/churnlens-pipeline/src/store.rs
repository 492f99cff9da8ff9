//! Graph store selection for binaries

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use churnlens_kb::{test_utils::InMemoryGraphStore, GraphStore};

use crate::config::Settings;
use crate::error::PipelineResult;

/// Where a pipeline's graph comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreSource {
    /// No store; every graph-backed stage degrades to empty output.
    Offline,
    /// In-memory graph loaded from a JSON fixture.
    Fixture(PathBuf),
    /// Neo4j, using the connection settings.
    Neo4j,
}

/// Builds the store for `source`. `Ok(None)` means run without a store.
pub async fn build_store(
    source: &StoreSource,
    settings: &Settings,
) -> PipelineResult<Option<Arc<dyn GraphStore>>> {
    match source {
        StoreSource::Offline => Ok(None),
        StoreSource::Fixture(path) => {
            let store = InMemoryGraphStore::from_json_file(path)?;
            info!("Loaded fixture graph {} {:?}", path.display(), store);
            Ok(Some(Arc::new(store)))
        }
        StoreSource::Neo4j => connect_neo4j(settings).await,
    }
}

#[cfg(feature = "adapters")]
async fn connect_neo4j(settings: &Settings) -> PipelineResult<Option<Arc<dyn GraphStore>>> {
    if settings.neo4j_uri.trim().is_empty() {
        return Err(crate::error::PipelineError::ConfigError("NEO4J_URI is empty".to_string()));
    }
    let store = churnlens_kb::Neo4jGraphStore::connect(settings.neo4j_config()).await?;
    Ok(Some(Arc::new(store)))
}

#[cfg(not(feature = "adapters"))]
async fn connect_neo4j(settings: &Settings) -> PipelineResult<Option<Arc<dyn GraphStore>>> {
    tracing::warn!(
        "Built without the `adapters` feature; ignoring {} and running without a graph store",
        settings.neo4j_uri
    );
    Ok(None)
}
