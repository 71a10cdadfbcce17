//! # Nazoru Predictors
//!
//! Prediction engine implementations and model artifact resolution.

pub mod graph;
pub mod model;

// Re-exports
pub use graph::{GraphPredictor, GraphPredictorBuilder, LoadPolicy};
pub use model::KeyGraph;

use std::ffi::OsString;
use std::path::PathBuf;

/// Environment variable consulted for the model artifact location
pub const GRAPH_PATH_ENV: &str = "NAZORU_GRAPH_PATH";

/// Artifact location used when nothing else is configured
pub const DEFAULT_GRAPH_PATH: &str = "data/nazoru.graph.json";

/// Resolve the location of the active model artifact.
///
/// Precedence: the explicit path, then `NAZORU_GRAPH_PATH`, then
/// [`DEFAULT_GRAPH_PATH`]. The path is not checked for existence; an
/// unusable artifact is reported by the predictor when it loads.
///
/// # Example
///
/// ```ignore
/// use nazoru_predictor::{resolve_model_location, GraphPredictor};
///
/// let predictor = GraphPredictor::new(resolve_model_location(None));
/// ```
pub fn resolve_model_location(explicit: Option<PathBuf>) -> PathBuf {
    resolve_with(explicit, std::env::var_os(GRAPH_PATH_ENV))
}

fn resolve_with(explicit: Option<PathBuf>, env: Option<OsString>) -> PathBuf {
    explicit
        .or_else(|| env.filter(|v| !v.is_empty()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_GRAPH_PATH))
}
