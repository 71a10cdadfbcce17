//! Error types for prediction operations.
//!
//! "No prediction possible" is not an error: predictors report it as
//! [`Prediction::NoPrediction`](crate::types::Prediction::NoPrediction).
//! Every variant here is a fault.

/// The main error type for prediction operations.
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    /// Request body is not a list of `{key, time}` records
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// Model artifact does not exist at the resolved location
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Model artifact exists but cannot be decoded into a usable model
    #[error("Model load error: {0}")]
    ModelLoad(String),

    /// Predictor-specific invocation failures
    #[error("Predictor error: {0}")]
    Predictor(String),

    /// I/O errors while reading a model artifact
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl PredictError {
    /// Create a malformed request error
    pub fn malformed_request(msg: impl Into<String>) -> Self {
        Self::MalformedRequest(msg.into())
    }

    /// Create a model not found error
    pub fn model_not_found(msg: impl Into<String>) -> Self {
        Self::ModelNotFound(msg.into())
    }

    /// Create a model load error
    pub fn model_load(msg: impl Into<String>) -> Self {
        Self::ModelLoad(msg.into())
    }

    /// Create a predictor error
    pub fn predictor(msg: impl Into<String>) -> Self {
        Self::Predictor(msg.into())
    }

    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Stable, low-cardinality name of the error class for structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedRequest(_) => "malformed_request",
            Self::ModelNotFound(_) => "model_not_found",
            Self::ModelLoad(_) => "model_load",
            Self::Predictor(_) => "predictor",
            Self::Io(_) => "io",
            Self::Configuration(_) => "configuration",
        }
    }

    /// Whether the fault was caused by the client's request rather than the service
    pub fn is_malformed_request(&self) -> bool {
        matches!(self, PredictError::MalformedRequest(_))
    }
}
