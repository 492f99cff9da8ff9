//! Error types for the churnlens knowledge base

use thiserror::Error;

/// Errors raised by a `GraphStore` implementation.
///
/// Resolution misses and missing paths are not errors; they come back as
/// empty rows.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphStoreError {
    #[error("Graph database connection error: {0}")]
    ConnectionError(String),
    #[error("Graph query execution error: {0}")]
    QueryError(String),
    #[error("Data mapping error from graph result: {0}")]
    MappingError(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Unknown database error: {0}")]
    Unknown(String),
}

/// Convert a String into a GraphStoreError::Unknown
impl From<String> for GraphStoreError {
    fn from(error: String) -> Self {
        GraphStoreError::Unknown(error)
    }
}

/// Errors raised while loading graph fixtures.
#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("Failed to read fixture: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization/Deserialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Invalid fixture: {0}")]
    Invalid(String),
}
