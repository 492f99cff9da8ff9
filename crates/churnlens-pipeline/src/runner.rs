//! Sequential stage runner

use tracing::{debug, info, info_span, Instrument};

use churnlens_kb::TraceContext;

use crate::config::PipelineConfig;
use crate::stages::{default_stages, Stage};
use crate::state::{InvestigationRequest, PipelineOutcome, PipelineState};

/// An ordered list of stages run one after another against a fresh state.
///
/// A `Pipeline` holds no per-run state and can serve concurrent invocations.
pub struct Pipeline {
    config: PipelineConfig,
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    /// The standard facts -> causality -> interventions -> response pipeline.
    pub fn new(config: PipelineConfig) -> Self {
        Self::with_stages(config, default_stages())
    }

    pub fn with_stages(config: PipelineConfig, stages: Vec<Box<dyn Stage>>) -> Self {
        Self { config, stages }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Runs every stage in order and returns the final state.
    pub async fn invoke(&self, request: InvestigationRequest) -> PipelineOutcome {
        let trace = TraceContext::new_root();
        let span = info_span!("investigation", trace_id = %trace.trace_id);

        async {
            let mut state = PipelineState::from(request);
            for stage in &self.stages {
                let stage_trace = trace.child();
                debug!(stage = stage.name(), span_id = %stage_trace.span_id, "Running stage");
                let delta = stage.run(&state, &self.config).await;
                state.merge(delta);
            }
            info!(degraded = state.errors.len(), "Investigation complete");
            PipelineOutcome { trace, state }
        }
        .instrument(span)
        .await
    }
}
