use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use churnlens_kb::causal::ranker;

use crate::config::PipelineConfig;
use crate::state::{PipelineState, StateDelta};
use super::Stage;

/// Ranks upstream interventions for `target_id`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RankInterventions;

#[async_trait]
impl Stage for RankInterventions {
    fn name(&self) -> &'static str {
        "rank_interventions"
    }

    #[instrument(
        name = "rank_interventions",
        skip_all,
        fields(depth = config.intervention_depth, limit = config.intervention_limit)
    )]
    async fn run(&self, state: &PipelineState, config: &PipelineConfig) -> StateDelta {
        let (Some(target), Some(client)) = (state.target(), config.client.as_ref()) else {
            debug!("Missing target or graph store; no interventions");
            return StateDelta::interventions(Vec::new());
        };

        match ranker::suggest(
            client.as_ref(),
            target,
            config.intervention_depth,
            config.intervention_limit,
        )
        .await
        {
            Ok(options) => {
                info!(target, interventions = options.len(), "Ranked interventions");
                StateDelta::interventions(options)
            }
            Err(e) => {
                warn!("Intervention ranking failed for {}: {}", target, e);
                StateDelta::interventions(Vec::new())
                    .with_error(format!("rank_interventions: {}", e))
            }
        }
    }
}
