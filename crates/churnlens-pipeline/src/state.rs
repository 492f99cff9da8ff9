//! Pipeline state and the partial updates stages return.

use serde::{Deserialize, Serialize};

use churnlens_kb::{
    CausalMechanism, DataPacket, InterventionOption, QueryParams, Row, TraceContext,
    WhyAwareContext,
};

/// One investigation: the question plus optional retrieval query and
/// causal endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvestigationRequest {
    pub query: String,
    #[serde(default, alias = "query_text")]
    pub cypher: Option<String>,
    #[serde(default)]
    pub params: QueryParams,
    #[serde(default)]
    pub source_id: Option<String>,
    #[serde(default)]
    pub target_id: Option<String>,
}

impl InvestigationRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_cypher(mut self, cypher: impl Into<String>) -> Self {
        self.cypher = Some(cypher.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<DataPacket>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_source(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }

    pub fn with_target(mut self, target_id: impl Into<String>) -> Self {
        self.target_id = Some(target_id.into());
        self
    }
}

/// Running state of one pipeline invocation.
///
/// Inputs come from the request; every other field is filled in by a stage.
/// Merging a [`StateDelta`] only ever sets or extends fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineState {
    pub query: Option<String>,
    pub cypher: Option<String>,
    pub params: QueryParams,
    pub source_id: Option<String>,
    pub target_id: Option<String>,
    pub data: Option<Vec<Row>>,
    pub causal_explanations: Option<Vec<CausalMechanism>>,
    pub interventions: Option<Vec<InterventionOption>>,
    pub context: Option<WhyAwareContext>,
    pub response: Option<String>,
    /// Store failures that degraded a stage, in stage order.
    pub errors: Vec<String>,
}

impl PipelineState {
    /// The query text, `""` when absent.
    pub fn query_text(&self) -> &str {
        self.query.as_deref().unwrap_or_default()
    }

    /// Source id, treating an empty string as absent.
    pub fn source(&self) -> Option<&str> {
        self.source_id.as_deref().filter(|s| !s.is_empty())
    }

    /// Target id, treating an empty string as absent.
    pub fn target(&self) -> Option<&str> {
        self.target_id.as_deref().filter(|s| !s.is_empty())
    }

    pub fn merge(&mut self, delta: StateDelta) {
        if let Some(data) = delta.data {
            self.data = Some(data);
        }
        if let Some(explanations) = delta.causal_explanations {
            self.causal_explanations = Some(explanations);
        }
        if let Some(interventions) = delta.interventions {
            self.interventions = Some(interventions);
        }
        if let Some(context) = delta.context {
            self.context = Some(context);
        }
        if let Some(response) = delta.response {
            self.response = Some(response);
        }
        self.errors.extend(delta.errors);
    }
}

impl From<InvestigationRequest> for PipelineState {
    fn from(request: InvestigationRequest) -> Self {
        Self {
            query: Some(request.query),
            cypher: request.cypher,
            params: request.params,
            source_id: request.source_id,
            target_id: request.target_id,
            ..Default::default()
        }
    }
}

/// Partial update produced by one stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateDelta {
    pub data: Option<Vec<Row>>,
    pub causal_explanations: Option<Vec<CausalMechanism>>,
    pub interventions: Option<Vec<InterventionOption>>,
    pub context: Option<WhyAwareContext>,
    pub response: Option<String>,
    pub errors: Vec<String>,
}

impl StateDelta {
    pub fn data(rows: Vec<Row>) -> Self {
        Self {
            data: Some(rows),
            ..Default::default()
        }
    }

    pub fn causal_explanations(explanations: Vec<CausalMechanism>) -> Self {
        Self {
            causal_explanations: Some(explanations),
            ..Default::default()
        }
    }

    pub fn interventions(interventions: Vec<InterventionOption>) -> Self {
        Self {
            interventions: Some(interventions),
            ..Default::default()
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.errors.push(error.into());
        self
    }
}

/// Final state of a run plus the trace it ran under.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutcome {
    pub trace: TraceContext,
    pub state: PipelineState,
}

impl PipelineOutcome {
    /// Rendered response, `""` if composition never ran.
    pub fn response(&self) -> &str {
        self.state.response.as_deref().unwrap_or_default()
    }

    pub fn context(&self) -> Option<&WhyAwareContext> {
        self.state.context.as_ref()
    }
}
