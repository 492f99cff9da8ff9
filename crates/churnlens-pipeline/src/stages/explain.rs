use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use churnlens_kb::causal::mechanism;

use crate::config::PipelineConfig;
use crate::state::{PipelineState, StateDelta};
use super::Stage;

/// Explains the causal chains from `source_id` to `target_id`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExplainCausality;

#[async_trait]
impl Stage for ExplainCausality {
    fn name(&self) -> &'static str {
        "explain_causality"
    }

    #[instrument(name = "explain_causality", skip_all, fields(max_depth = config.max_depth))]
    async fn run(&self, state: &PipelineState, config: &PipelineConfig) -> StateDelta {
        let (Some(source), Some(target), Some(client)) =
            (state.source(), state.target(), config.client.as_ref())
        else {
            debug!("Missing source, target or graph store; no explanations");
            return StateDelta::causal_explanations(Vec::new());
        };

        match mechanism::explain_paths(client.as_ref(), source, target, config.max_depth).await {
            Ok(explanations) => {
                info!(source, target, explanations = explanations.len(), "Explained causal paths");
                StateDelta::causal_explanations(explanations)
            }
            Err(e) => {
                warn!("Causal explanation failed for {} -> {}: {}", source, target, e);
                StateDelta::causal_explanations(Vec::new())
                    .with_error(format!("explain_causality: {}", e))
            }
        }
    }
}
