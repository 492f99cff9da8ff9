use async_trait::async_trait;
use tracing::{info, instrument};

use churnlens_kb::context;

use crate::config::PipelineConfig;
use crate::state::{PipelineState, StateDelta};
use super::Stage;

/// Assembles the why-aware context and renders the response. Always runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComposeResponse;

#[async_trait]
impl Stage for ComposeResponse {
    fn name(&self) -> &'static str {
        "compose_response"
    }

    #[instrument(name = "compose_response", skip_all)]
    async fn run(&self, state: &PipelineState, _config: &PipelineConfig) -> StateDelta {
        let ctx = context::assemble(
            state.query_text(),
            state.data.clone().unwrap_or_default(),
            state.causal_explanations.clone().unwrap_or_default(),
            state.interventions.clone().unwrap_or_default(),
            None,
        );
        let response = context::render(&ctx);
        info!(lines = response.lines().count(), "Composed response");

        StateDelta {
            context: Some(ctx),
            response: Some(response),
            ..Default::default()
        }
    }
}
