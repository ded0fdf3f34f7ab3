//! Error types for the ride demand pipeline

use thiserror::Error;

/// Result type alias for ride demand operations
pub type Result<T> = std::result::Result<T, RideDemandError>;

/// Main error type for training and inference
#[derive(Error, Debug)]
pub enum RideDemandError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Feature error: {0}")]
    FeatureError(String),

    #[error("Training error: {0}")]
    TrainingError(String),

    #[error("Inference error: {0}")]
    InferenceError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Artifact mismatch: {0}")]
    ArtifactMismatch(String),
}

impl From<polars::error::PolarsError> for RideDemandError {
    fn from(err: polars::error::PolarsError) -> Self {
        RideDemandError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for RideDemandError {
    fn from(err: serde_json::Error) -> Self {
        RideDemandError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for RideDemandError {
    fn from(err: ndarray::ShapeError) -> Self {
        RideDemandError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}
