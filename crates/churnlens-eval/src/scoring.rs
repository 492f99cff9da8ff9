//! Answer scoring
//!
//! Each answer gets three substring checks; its score is the fraction passed.

use serde::Serialize;
use tracing::debug;

use crate::rubric::{EvalCase, Responses, Rubric};

/// Words that count as disclosing uncertainty, matched case-insensitively.
pub const UNCERTAINTY_MARKERS: [&str; 4] = ["assumption", "uncertain", "confound", "caveat"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    CausalChain,
    InterventionOption,
    UncertaintyDisclosure,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseResult {
    pub id: String,
    pub query: String,
    pub score: f64,
    pub passed_checks: Vec<Check>,
    pub missing_response: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvalReport {
    pub cases: Vec<CaseResult>,
    pub mean_score: f64,
}

/// Case-insensitive: does `text` contain any of `options`?
pub fn contains_any<S: AsRef<str>>(text: &str, options: &[S]) -> bool {
    let normalized = text.to_lowercase();
    options
        .iter()
        .any(|option| normalized.contains(&option.as_ref().to_lowercase()))
}

/// Scores one answer, returning the rounded score and the checks it passed.
pub fn score_case(case: &EvalCase, response: &str) -> (f64, Vec<Check>) {
    let checks = [
        (Check::CausalChain, contains_any(response, &case.must_include_any)),
        (Check::InterventionOption, contains_any(response, &case.intervention_any)),
        (Check::UncertaintyDisclosure, contains_any(response, &UNCERTAINTY_MARKERS)),
    ];
    let passed: Vec<Check> = checks.iter().filter(|(_, ok)| *ok).map(|(check, _)| *check).collect();
    (round4(passed.len() as f64 / checks.len() as f64), passed)
}

/// Scores every rubric case. A case without an answer is scored against `""`.
pub fn evaluate(rubric: &Rubric, responses: &Responses) -> EvalReport {
    let cases: Vec<CaseResult> = rubric
        .cases
        .iter()
        .map(|case| {
            let response = responses.get(&case.id).map(String::as_str).unwrap_or_default();
            let (score, passed_checks) = score_case(case, response);
            debug!(case = %case.id, score, "Scored case");
            CaseResult {
                id: case.id.clone(),
                query: case.query.clone(),
                score,
                passed_checks,
                missing_response: response.is_empty(),
            }
        })
        .collect();

    let total: f64 = cases.iter().map(|c| c.score).sum();
    let mean_score = round4(total / cases.len().max(1) as f64);
    EvalReport { cases, mean_score }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn case() -> EvalCase {
        EvalCase {
            id: "c1".into(),
            query: "Why?".into(),
            must_include_any: vec!["Contract".into(), "->".into()],
            intervention_any: vec!["retention offer".into()],
        }
    }

    #[test]
    fn test_all_checks_pass_case_insensitively() {
        let (score, passed) = score_case(
            &case(),
            "The CONTRACT drives churn. Send a Retention Offer. Caveat: confounders.",
        );
        assert_eq!(score, 1.0);
        assert_eq!(
            passed,
            vec![Check::CausalChain, Check::InterventionOption, Check::UncertaintyDisclosure]
        );
    }

    #[test]
    fn test_partial_scores_are_rounded() {
        let (score, passed) = score_case(&case(), "a -> b, with some uncertainty");
        assert_eq!(score, 0.6667);
        assert_eq!(passed, vec![Check::CausalChain, Check::UncertaintyDisclosure]);
    }

    #[test]
    fn test_empty_phrase_list_never_matches() {
        let empty = EvalCase { must_include_any: vec![], ..case() };
        let (_, passed) = score_case(&empty, "anything at all");
        assert!(!passed.contains(&Check::CausalChain));
    }

    #[test]
    fn test_missing_response_scores_zero() {
        let rubric = Rubric { cases: vec![case()] };
        let report = evaluate(&rubric, &Responses::new());
        assert_eq!(report.cases[0].score, 0.0);
        assert!(report.cases[0].missing_response);
        assert!(report.cases[0].passed_checks.is_empty());
        assert_eq!(report.mean_score, 0.0);
    }

    #[test]
    fn test_empty_rubric_mean_is_zero() {
        let report = evaluate(&Rubric::default(), &Responses::new());
        assert!(report.cases.is_empty());
        assert_eq!(report.mean_score, 0.0);
    }

    #[test]
    fn test_checks_serialize_snake_case() {
        let json = serde_json::to_string(&Check::UncertaintyDisclosure).unwrap();
        assert_eq!(json, "\"uncertainty_disclosure\"");
    }
}
