//! Churnlens answer evaluation
//!
//! Scores why-aware answers against a YAML rubric: does the answer name a
//! causal chain, offer an intervention, and disclose uncertainty?

pub mod error;
pub mod rubric;
pub mod scoring;

pub use error::{EvalError, EvalResult};
pub use rubric::{load_responses, EvalCase, Responses, Rubric, DEFAULT_RUBRIC};
pub use scoring::{evaluate, score_case, CaseResult, Check, EvalReport};
