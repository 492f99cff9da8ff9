//! Deterministic text rendering of a [`WhyAwareContext`].

use crate::data::{entities::WhyAwareContext, types::Row};

pub const NO_EVIDENCE: &str = "- No factual rows were retrieved.";
pub const NO_HYPOTHESIS: &str = "- No causal path hypothesis was found.";
pub const NO_INTERVENTION: &str = "- No intervention candidate could be ranked.";

/// Renders the context as a line-oriented prompt.
///
/// Output depends only on the context; equal contexts render byte-identical.
pub fn render(context: &WhyAwareContext) -> String {
    let mut lines: Vec<String> = vec![
        format!("User query: {}", context.query),
        String::new(),
        "Observed facts (what):".to_string(),
    ];
    if context.what_evidence.is_empty() {
        lines.push(NO_EVIDENCE.to_string());
    } else {
        lines.extend(context.what_evidence.iter().map(|row| format!("- {}", row_json(row))));
    }

    lines.push(String::new());
    lines.push("Causal hypotheses (why):".to_string());
    if context.why_hypotheses.is_empty() {
        lines.push(NO_HYPOTHESIS.to_string());
    } else {
        for item in &context.why_hypotheses {
            lines.push(format!("- Path: {}", item.path.join(" -> ")));
            lines.push(format!("  Mechanism: {}", item.mechanism));
            lines.push(format!("  Confidence: {:.2}", item.confidence));
        }
    }

    lines.push(String::new());
    lines.push("Candidate interventions:".to_string());
    if context.interventions.is_empty() {
        lines.push(NO_INTERVENTION.to_string());
    } else {
        for item in &context.interventions {
            lines.push(format!(
                "- {} (effect={:.2}, confidence={:.2})",
                item.recommendation, item.expected_effect_score, item.confidence
            ));
        }
    }

    lines.push(String::new());
    lines.push("Uncertainty and caveats:".to_string());
    lines.extend(context.uncertainty.iter().map(|item| format!("- {item}")));

    lines.join("\n")
}

// Compact JSON with keys in sorted order.
fn row_json(row: &Row) -> String {
    let object: serde_json::Map<String, serde_json::Value> =
        row.iter().map(|(k, v)| (k.clone(), v.to_json())).collect();
    serde_json::Value::Object(object).to_string()
}
