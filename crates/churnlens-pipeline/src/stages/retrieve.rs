use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use crate::config::PipelineConfig;
use crate::state::{PipelineState, StateDelta};
use super::Stage;

/// Runs the caller's retrieval query and keeps its rows as observed facts.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetrieveFacts;

#[async_trait]
impl Stage for RetrieveFacts {
    fn name(&self) -> &'static str {
        "retrieve_facts"
    }

    #[instrument(name = "retrieve_facts", skip_all)]
    async fn run(&self, state: &PipelineState, config: &PipelineConfig) -> StateDelta {
        let Some(cypher) = state.cypher.as_deref().filter(|q| !q.trim().is_empty()) else {
            debug!("No retrieval query supplied");
            return StateDelta::data(Vec::new());
        };
        let Some(client) = config.client.as_ref() else {
            debug!("No graph store configured, skipping retrieval");
            return StateDelta::data(Vec::new());
        };

        match client.execute(cypher, state.params.clone()).await {
            Ok(rows) => {
                info!(rows = rows.len(), "Retrieved facts");
                StateDelta::data(rows)
            }
            Err(e) => {
                warn!("Fact retrieval failed, continuing without facts: {}", e);
                StateDelta::data(Vec::new()).with_error(format!("retrieve_facts: {}", e))
            }
        }
    }
}
