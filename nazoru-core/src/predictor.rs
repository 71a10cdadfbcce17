//! Predictor trait and core abstractions.

use crate::error::PredictError;
use crate::types::*;
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

/// Core predictor trait for prediction engines.
///
/// A predictor turns a keystroke sequence into ranked character candidates.
/// How it gets there (model structure, graph representation) is its own
/// business; the service only relies on this contract.
///
/// Implementations must:
/// - return candidates ordered by descending probability, at most `req.n`
/// - return [`Prediction::NoPrediction`] when the model has no path for the
///   sequence, never an error
/// - return `Err` only for faults (unreadable model, bad input shape, ...)
#[async_trait]
pub trait Predictor: Send + Sync + Debug + 'static {
    /// Get predictor information
    fn info(&self) -> Arc<PredictorInfo>;

    /// Top-N prediction
    async fn predict_top_n(&self, req: TopNRequest) -> Result<Prediction, PredictError>;
}

#[async_trait]
impl<P: Predictor + ?Sized> Predictor for Arc<P> {
    fn info(&self) -> Arc<PredictorInfo> {
        (**self).info()
    }

    async fn predict_top_n(&self, req: TopNRequest) -> Result<Prediction, PredictError> {
        (**self).predict_top_n(req).await
    }
}
