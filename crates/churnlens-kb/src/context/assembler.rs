//! Builds the why-aware context handed to response generation.

use crate::data::{
    entities::{CausalMechanism, InterventionOption, WhyAwareContext},
    types::Row,
};

/// Caveats attached whenever the caller supplies none.
pub const DEFAULT_UNCERTAINTY: [&str; 2] = [
    "The graph structure alone does not prove effect magnitude.",
    "Potential confounders may be unobserved in the current dataset.",
];

/// Packages observations, hypotheses and interventions into one context.
///
/// An absent or empty `uncertainty` list is replaced with
/// [`DEFAULT_UNCERTAINTY`]; every response discloses some uncertainty.
pub fn assemble(
    query: impl Into<String>,
    what_evidence: Vec<Row>,
    why_hypotheses: Vec<CausalMechanism>,
    interventions: Vec<InterventionOption>,
    uncertainty: Option<Vec<String>>,
) -> WhyAwareContext {
    let uncertainty = match uncertainty {
        Some(items) if !items.is_empty() => items,
        _ => DEFAULT_UNCERTAINTY.iter().map(|s| s.to_string()).collect(),
    };

    WhyAwareContext {
        query: query.into(),
        what_evidence,
        why_hypotheses,
        interventions,
        uncertainty,
    }
}
