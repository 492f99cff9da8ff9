//! Structured records produced by causal reasoning.
//!
//! These keep observations ("what") separate from causal hypotheses ("why"),
//! intervention options and uncertainty disclosures so downstream rendering
//! never has to re-derive them from text.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::data::types::Row;

/// Ordered node identities along a directed chain of `CAUSES` edges.
pub type CausalPath = Vec<String>;

/// A node reached by a causal traversal, tagged with its primary label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CausalNode {
    pub id: String,
    pub label: Option<String>,
}

/// A single graph-derived causal chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CausalMechanism {
    pub path: CausalPath,
    pub mechanism: String,
    pub confidence: f64,
    pub assumptions: Vec<String>,
}

/// Expected direction of an intervention's effect on its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectDirection {
    RiskDecreaseIfMitigated,
    Unknown,
}

impl EffectDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            EffectDirection::RiskDecreaseIfMitigated => "risk_decrease_if_mitigated",
            EffectDirection::Unknown => "unknown",
        }
    }
}

impl fmt::Display for EffectDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Heuristic effect estimate for one (intervention, outcome) pair.
///
/// `estimated_effect` is `None` only for the placeholder returned when no
/// graph store is available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectEstimate {
    pub estimated_effect: Option<f64>,
    pub direction: EffectDirection,
    pub confidence: f64,
    pub method: String,
    pub rationale: Option<String>,
}

/// A candidate action to alter an outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterventionOption {
    pub node_id: String,
    pub recommendation: String,
    pub expected_direction: EffectDirection,
    pub expected_effect_score: f64,
    pub confidence: f64,
    pub caveats: Vec<String>,
}

/// Context object passed into response generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhyAwareContext {
    pub query: String,
    pub what_evidence: Vec<Row>,
    pub why_hypotheses: Vec<CausalMechanism>,
    pub interventions: Vec<InterventionOption>,
    pub uncertainty: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_serializes_as_snake_case() {
        let json = serde_json::to_string(&EffectDirection::RiskDecreaseIfMitigated).unwrap();
        assert_eq!(json, "\"risk_decrease_if_mitigated\"");
        assert_eq!(EffectDirection::Unknown.to_string(), "unknown");
    }
}
