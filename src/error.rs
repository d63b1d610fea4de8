//! Error types for the datascience workflow

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Main error type shared by every stage and by the serving path
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A required input file (raw data, schema, artifact) does not exist
    #[error("Missing file: {}", .0.display())]
    MissingInput(PathBuf),

    /// Required columns are absent, or request keys do not match the trained features
    #[error("{detail}")]
    SchemaViolation { detail: String, keys: Vec<String> },

    /// A value could not be converted to a number where one is required
    #[error("{0}")]
    CoercionFailure(String),

    /// A prediction request body is not shaped as documented
    #[error("{0}")]
    MalformedRequest(String),

    #[error("Data error: {0}")]
    Data(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Training error: {0}")]
    Training(String),

    #[error("Diagnostics error: {0}")]
    Diagnostics(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Computation error: {0}")]
    Computation(String),
}

impl PipelineError {
    /// Schema violation naming every offending key
    pub fn schema(detail: impl Into<String>, keys: Vec<String>) -> Self {
        PipelineError::SchemaViolation {
            detail: detail.into(),
            keys,
        }
    }
}

impl From<polars::error::PolarsError> for PipelineError {
    fn from(err: polars::error::PolarsError) -> Self {
        PipelineError::Data(err.to_string())
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        PipelineError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for PipelineError {
    fn from(err: serde_yaml::Error) -> Self {
        PipelineError::Serialization(err.to_string())
    }
}

impl From<ndarray::ShapeError> for PipelineError {
    fn from(err: ndarray::ShapeError) -> Self {
        PipelineError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}
