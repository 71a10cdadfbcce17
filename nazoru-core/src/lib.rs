//! # Nazoru Core
//!
//! Core abstractions and runtime for the keystroke prediction service.
//!
//! This crate provides the request normalizer, the prediction invoker and
//! the traits a prediction engine plugs into. The engine itself is an
//! external collaborator behind the [`Predictor`] trait.

pub mod error;
pub mod layer;
pub mod normalizer;
pub mod predictor;
pub mod runtime;
pub mod types;

// Re-exports
pub use error::PredictError;
pub use layer::{Layer, LayeredPredictor};
pub use normalizer::{normalize, normalize_body, KeyEventRecord};
pub use predictor::Predictor;
pub use runtime::{PredictionInvoker, PredictionInvokerBuilder, DEFAULT_TOP_N};
pub use types::*;

/// Result type alias for prediction operations
pub type Result<T> = std::result::Result<T, PredictError>;
