//! Rubric and response loading

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::error::{EvalError, EvalResult};

/// Rubric shipped with the crate.
pub const DEFAULT_RUBRIC: &str = include_str!("../rubrics/why_aware_eval.yml");

/// One question and the phrases a good answer should contain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalCase {
    pub id: String,
    pub query: String,
    /// Any of these marks the causal chain as present.
    #[serde(default)]
    pub must_include_any: Vec<String>,
    /// Any of these marks an intervention option as present.
    #[serde(default)]
    pub intervention_any: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rubric {
    #[serde(default)]
    pub cases: Vec<EvalCase>,
}

impl Rubric {
    pub fn from_yaml_str(yaml: &str) -> EvalResult<Self> {
        let rubric: Rubric = serde_yaml::from_str(yaml)?;
        let mut seen = HashSet::new();
        for case in &rubric.cases {
            if !seen.insert(case.id.as_str()) {
                return Err(EvalError::InvalidRubric(format!("duplicate case id '{}'", case.id)));
            }
        }
        Ok(rubric)
    }

    pub fn from_path(path: impl AsRef<Path>) -> EvalResult<Self> {
        Self::from_yaml_str(&read(path.as_ref())?)
    }

    pub fn builtin() -> EvalResult<Self> {
        Self::from_yaml_str(DEFAULT_RUBRIC)
    }
}

/// Answers keyed by case id.
pub type Responses = BTreeMap<String, String>;

pub fn load_responses(path: impl AsRef<Path>) -> EvalResult<Responses> {
    Ok(serde_json::from_str(&read(path.as_ref())?)?)
}

fn read(path: &Path) -> EvalResult<String> {
    std::fs::read_to_string(path).map_err(|source| EvalError::Io {
        path: path.display().to_string(),
        source,
    })
}
