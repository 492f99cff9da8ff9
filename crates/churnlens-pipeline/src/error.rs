//! Error types for the investigation pipeline

use thiserror::Error;

use churnlens_kb::{FixtureError, GraphStoreError};

/// Pipeline error types
///
/// Stage-level store failures never surface here; stages log them and
/// degrade. These cover setup: configuration and store construction.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Graph store could not be built or reached
    #[error("Graph store error: {0}")]
    StoreError(#[from] GraphStoreError),

    /// Fixture graph could not be loaded
    #[error("Fixture error: {0}")]
    FixtureError(#[from] FixtureError),
}

/// Result type for pipeline setup
pub type PipelineResult<T> = Result<T, PipelineError>;
