//! Logging layer for predictor operations.

use async_trait::async_trait;
use nazoru_core::error::PredictError;
use nazoru_core::impl_layered_predictor;
use nazoru_core::layer::{Layer, LayeredPredictor};
use nazoru_core::predictor::Predictor;
use nazoru_core::types::*;

/// Logging layer that logs predictor operations.
#[derive(Debug, Clone)]
pub struct LoggingLayer {
    prefix: String,
}

impl LoggingLayer {
    /// Create a new logging layer
    pub fn new() -> Self {
        Self {
            prefix: "[Nazoru]".to_string(),
        }
    }

    /// Create a logging layer with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for LoggingLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Predictor> Layer<P> for LoggingLayer {
    type LayeredPredictor = LoggingPredictor<P>;

    fn layer(&self, inner: P) -> Self::LayeredPredictor {
        LoggingPredictor {
            inner,
            prefix: self.prefix.clone(),
        }
    }
}

/// Predictor wrapped with logging
#[derive(Debug)]
pub struct LoggingPredictor<P> {
    inner: P,
    prefix: String,
}

#[async_trait]
impl<P: Predictor> LayeredPredictor for LoggingPredictor<P> {
    type Inner = P;

    fn inner(&self) -> &Self::Inner {
        &self.inner
    }

    async fn layered_predict_top_n(&self, req: TopNRequest) -> Result<Prediction, PredictError> {
        tracing::debug!(
            "{} predict_top_n request: events={}, n={}",
            self.prefix,
            req.sequence.len(),
            req.n
        );

        let start = std::time::Instant::now();
        let result = self.inner.predict_top_n(req).await;
        let elapsed = start.elapsed();

        match &result {
            Ok(Prediction::Ranked(candidates)) => {
                tracing::debug!(
                    "{} predict_top_n success: candidates={}, elapsed={:?}",
                    self.prefix,
                    candidates.len(),
                    elapsed
                );
            }
            Ok(Prediction::NoPrediction) => {
                tracing::debug!(
                    "{} predict_top_n no prediction, elapsed={:?}",
                    self.prefix,
                    elapsed
                );
            }
            // The invoker owns the warn-level fault record.
            Err(e) => {
                tracing::debug!(
                    "{} predict_top_n fault: kind={}, elapsed={:?}",
                    self.prefix,
                    e.kind(),
                    elapsed
                );
            }
        }

        result
    }
}

impl_layered_predictor!(LoggingPredictor);
