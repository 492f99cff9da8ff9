//! Pipeline stages
//!
//! Each stage reads the running state and returns a partial update. Stages
//! never fail: missing inputs or store errors yield an empty result for that
//! stage, so the response is always composed.

use async_trait::async_trait;

use crate::config::PipelineConfig;
use crate::state::{PipelineState, StateDelta};

pub mod compose;
pub mod explain;
pub mod rank;
pub mod retrieve;

pub use compose::ComposeResponse;
pub use explain::ExplainCausality;
pub use rank::RankInterventions;
pub use retrieve::RetrieveFacts;

/// One step of the investigation pipeline
#[async_trait]
pub trait Stage: Send + Sync {
    /// Stage name, used in logs
    fn name(&self) -> &'static str;

    /// Computes this stage's update from the current state
    async fn run(&self, state: &PipelineState, config: &PipelineConfig) -> StateDelta;
}

/// Facts, causality, interventions, response, in that order.
pub fn default_stages() -> Vec<Box<dyn Stage>> {
    vec![
        Box::new(RetrieveFacts),
        Box::new(ExplainCausality),
        Box::new(RankInterventions),
        Box::new(ComposeResponse),
    ]
}
