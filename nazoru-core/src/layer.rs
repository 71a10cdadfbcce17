//! Layer trait and abstractions.
//!
//! Layers wrap a predictor with cross-cutting concerns like logging or
//! caching, following the OpenDAL layering model.

use crate::error::PredictError;
use crate::predictor::Predictor;
use crate::types::*;
use async_trait::async_trait;
use std::sync::Arc;

/// Layer trait for wrapping predictors.
///
/// Each layer wraps an inner predictor and returns a new predictor with
/// enhanced capabilities.
pub trait Layer<P: Predictor> {
    /// The type of the layered predictor
    type LayeredPredictor: Predictor;

    /// Wrap the inner predictor with this layer
    fn layer(&self, inner: P) -> Self::LayeredPredictor;
}

/// Helper trait for layered predictors.
///
/// Provides default forwarding implementations for predictor methods.
/// Implementers only override the methods they want to intercept.
#[async_trait]
pub trait LayeredPredictor: Sized + Predictor {
    /// The inner predictor type
    type Inner: Predictor;

    /// Get a reference to the inner predictor
    fn inner(&self) -> &Self::Inner;

    /// Default implementation for info - forwards to inner
    fn layered_info(&self) -> Arc<PredictorInfo> {
        self.inner().info()
    }

    /// Default implementation for predict_top_n - forwards to inner
    async fn layered_predict_top_n(&self, req: TopNRequest) -> Result<Prediction, PredictError> {
        self.inner().predict_top_n(req).await
    }
}

/// Macro to implement Predictor trait by forwarding to LayeredPredictor methods.
#[macro_export]
macro_rules! impl_layered_predictor {
    ($type:ident) => {
        #[async_trait::async_trait]
        impl<P: $crate::predictor::Predictor> $crate::predictor::Predictor for $type<P> {
            fn info(&self) -> std::sync::Arc<$crate::types::PredictorInfo> {
                $crate::layer::LayeredPredictor::layered_info(self)
            }

            async fn predict_top_n(
                &self,
                req: $crate::types::TopNRequest,
            ) -> Result<$crate::types::Prediction, $crate::error::PredictError> {
                $crate::layer::LayeredPredictor::layered_predict_top_n(self, req).await
            }
        }
    };
}
