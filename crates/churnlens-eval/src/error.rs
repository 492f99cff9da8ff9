//! Error types for rubric evaluation

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvalError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid rubric YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid responses JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid rubric: {0}")]
    InvalidRubric(String),
}

pub type EvalResult<T> = Result<T, EvalError>;
