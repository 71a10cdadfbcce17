//! PredictionInvoker implementation.
//!
//! The invoker owns the configured result bound and a type-erased predictor
//! (with its layers applied), and turns a keystroke sequence into a
//! [`ServiceResponse`].
//!
//! Per-request state machine:
//! `Received -> Normalized -> Predicting -> {Succeeded | NoPrediction | Faulted}`.
//! Only `NoPrediction` is downgraded to a normal (`ng`) response; every fault
//! propagates to the caller unchanged, and nothing is retried.

use crate::error::PredictError;
use crate::layer::Layer;
use crate::normalizer::normalize_body;
use crate::predictor::Predictor;
use crate::types::*;
use std::sync::Arc;
use tracing::Instrument;

/// Number of candidates returned when no bound is configured
pub const DEFAULT_TOP_N: usize = 5;

/// Type-erased predictor that can be shared across threads
type BoxedPredictor = Arc<dyn Predictor>;

/// Builder for composing a predictor with layers and a result bound.
///
/// # Example
///
/// ```ignore
/// let invoker = PredictionInvoker::builder(graph_predictor)
///     .layer(CacheLayer::new(1024))
///     .layer(LoggingLayer::new())
///     .top_n(5)
///     .finish();
/// ```
pub struct PredictionInvokerBuilder<P> {
    predictor: P,
    top_n: usize,
}

impl<P: Predictor> PredictionInvokerBuilder<P> {
    /// Create a new builder with a predictor
    pub fn new(predictor: P) -> Self {
        Self {
            predictor,
            top_n: DEFAULT_TOP_N,
        }
    }

    /// Add a layer to wrap the predictor
    ///
    /// Each call creates a new concrete type by wrapping the previous predictor.
    pub fn layer<L>(self, layer: L) -> PredictionInvokerBuilder<L::LayeredPredictor>
    where
        L: Layer<P>,
    {
        PredictionInvokerBuilder {
            predictor: layer.layer(self.predictor),
            top_n: self.top_n,
        }
    }

    /// Set the maximum number of candidates per response
    pub fn top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Finish building and create a PredictionInvoker
    pub fn finish(self) -> PredictionInvoker {
        PredictionInvoker {
            predictor: Arc::new(self.predictor),
            top_n: self.top_n,
        }
    }
}

/// Stateless prediction invoker.
///
/// Holds no per-request state, so a single instance is shared by every
/// concurrent request.
#[derive(Clone)]
pub struct PredictionInvoker {
    predictor: BoxedPredictor,
    top_n: usize,
}

impl std::fmt::Debug for PredictionInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictionInvoker")
            .field("predictor", &self.predictor.info().id)
            .field("top_n", &self.top_n)
            .finish()
    }
}

impl PredictionInvoker {
    /// Create a new builder
    pub fn builder<P: Predictor>(predictor: P) -> PredictionInvokerBuilder<P> {
        PredictionInvokerBuilder::new(predictor)
    }

    /// Get predictor information
    pub fn info(&self) -> Arc<PredictorInfo> {
        self.predictor.info()
    }

    /// Configured result bound
    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Fresh request context for a sequence
    pub fn context(&self, sequence: &KeystrokeSequence) -> RequestContext {
        RequestContext::new(self.predictor.info().id.clone(), sequence.len())
    }

    /// Predict for an already normalized sequence
    pub async fn invoke(&self, sequence: KeystrokeSequence) -> Result<ServiceResponse, PredictError> {
        let ctx = self.context(&sequence);
        self.invoke_with_context(&ctx, sequence).await
    }

    /// Normalize a raw request body, then predict.
    ///
    /// `request_id` replaces the generated request id when the caller
    /// already has one.
    pub async fn invoke_body(
        &self,
        body: &[u8],
        request_id: Option<String>,
    ) -> Result<ServiceResponse, PredictError> {
        let sequence = normalize_body(body).map_err(|err| {
            tracing::warn!(kind = err.kind(), error = %err, "rejected keystroke body");
            err
        })?;

        let mut ctx = self.context(&sequence);
        if let Some(request_id) = request_id {
            ctx = ctx.with_request_id(request_id);
        }

        self.invoke_with_context(&ctx, sequence).await
    }

    /// Predict with a caller-supplied context
    pub async fn invoke_with_context(
        &self,
        ctx: &RequestContext,
        sequence: KeystrokeSequence,
    ) -> Result<ServiceResponse, PredictError> {
        let span = tracing::debug_span!(
            "predict",
            request_id = %ctx.request_id,
            predictor = %ctx.predictor_id,
            events = ctx.events,
        );

        async move {
            let req = TopNRequest::new(sequence, self.top_n);

            match self.predictor.predict_top_n(req).await {
                Ok(Prediction::Ranked(candidates)) => {
                    if candidates.len() > self.top_n {
                        tracing::debug!(
                            returned = candidates.len(),
                            top_n = self.top_n,
                            "predictor over-delivered, truncating"
                        );
                    }

                    // Predictor order is authoritative; never re-sorted here.
                    let result: Vec<RankedCharacter> = candidates
                        .into_iter()
                        .take(self.top_n)
                        .map(RankedCharacter::from)
                        .collect();

                    tracing::debug!(candidates = result.len(), "prediction succeeded");
                    Ok(ServiceResponse::Ok { result })
                }
                Ok(Prediction::NoPrediction) => {
                    tracing::debug!("no prediction for sequence");
                    Ok(ServiceResponse::Ng)
                }
                Err(err) => {
                    tracing::warn!(kind = err.kind(), error = %err, "prediction faulted");
                    Err(err)
                }
            }
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Predictor double that replays a fixed outcome and records requests.
    #[derive(Debug)]
    struct ScriptedPredictor {
        outcome: fn() -> Result<Prediction, PredictError>,
        calls: AtomicUsize,
        last_request: Mutex<Option<TopNRequest>>,
    }

    impl ScriptedPredictor {
        fn new(outcome: fn() -> Result<Prediction, PredictError>) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl Predictor for ScriptedPredictor {
        fn info(&self) -> Arc<PredictorInfo> {
            Arc::new(PredictorInfo {
                id: "scripted".to_string(),
                name: "Scripted".to_string(),
            })
        }

        async fn predict_top_n(&self, req: TopNRequest) -> Result<Prediction, PredictError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(req);
            (self.outcome)()
        }
    }

    fn seven_candidates() -> Result<Prediction, PredictError> {
        Ok(Prediction::Ranked(vec![
            PredictionCandidate::new("か", 3.0, 0.62),
            PredictionCandidate::new("が", 2.0, 0.15),
            PredictionCandidate::new("き", 1.5, 0.09),
            PredictionCandidate::new("く", 1.0, 0.06),
            PredictionCandidate::new("け", 0.5, 0.04),
            PredictionCandidate::new("こ", 0.2, 0.03),
            PredictionCandidate::new("さ", 0.1, 0.01),
        ]))
    }

    fn no_prediction() -> Result<Prediction, PredictError> {
        Ok(Prediction::NoPrediction)
    }

    fn model_fault() -> Result<Prediction, PredictError> {
        Err(PredictError::model_not_found("/missing/graph.json"))
    }

    fn ka_sequence() -> KeystrokeSequence {
        KeystrokeSequence::new(vec![KeyEvent::new("k", 100.0), KeyEvent::new("a", 150.0)])
    }

    #[tokio::test]
    async fn test_result_is_bounded_to_top_n() {
        let predictor = ScriptedPredictor::new(seven_candidates);
        let invoker = PredictionInvoker::builder(predictor.clone()).finish();

        let response = invoker.invoke(ka_sequence()).await.unwrap();

        let characters: Vec<&str> = response
            .result()
            .iter()
            .map(|c| c.character.as_str())
            .collect();
        assert_eq!(characters, vec!["か", "が", "き", "く", "け"]);
        assert!(response.result().windows(2).all(|w| w[0].probability >= w[1].probability));
    }

    #[tokio::test]
    async fn test_predictor_receives_sequence_and_bound_unchanged() {
        let predictor = ScriptedPredictor::new(seven_candidates);
        let invoker = PredictionInvoker::builder(predictor.clone())
            .top_n(3)
            .finish();

        let response = invoker.invoke(ka_sequence()).await.unwrap();
        assert_eq!(response.result().len(), 3);

        let seen = predictor.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(seen.n, 3);
        assert_eq!(seen.sequence, ka_sequence());
    }

    #[tokio::test]
    async fn test_no_prediction_becomes_ng() {
        let invoker = PredictionInvoker::builder(ScriptedPredictor::new(no_prediction)).finish();

        let response = invoker.invoke(KeystrokeSequence::default()).await.unwrap();

        assert_eq!(response, ServiceResponse::Ng);
    }

    #[tokio::test]
    async fn test_fault_propagates_instead_of_ng() {
        let predictor = ScriptedPredictor::new(model_fault);
        let invoker = PredictionInvoker::builder(predictor.clone()).finish();

        let err = invoker.invoke(ka_sequence()).await.unwrap_err();

        assert!(matches!(err, PredictError::ModelNotFound(_)));
        assert_eq!(predictor.calls.load(Ordering::SeqCst), 1, "no retry");
    }

    #[tokio::test]
    async fn test_malformed_body_never_reaches_predictor() {
        let predictor = ScriptedPredictor::new(no_prediction);
        let invoker = PredictionInvoker::builder(predictor.clone()).finish();

        let err = invoker
            .invoke_body(br#"[{"key":"k"}]"#, None)
            .await
            .unwrap_err();

        assert!(err.is_malformed_request());
        assert_eq!(predictor.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invoke_body_is_idempotent() {
        let invoker = PredictionInvoker::builder(ScriptedPredictor::new(seven_candidates)).finish();
        let body = br#"[{"key":"k","time":100},{"key":"a","time":150}]"#;

        let first = invoker.invoke_body(body, None).await.unwrap();
        let second = invoker
            .invoke_body(body, Some("req-2".to_string()))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert!(first.is_ok());
    }

    #[test]
    fn test_context_uses_predictor_id() {
        let invoker = PredictionInvoker::builder(ScriptedPredictor::new(no_prediction)).finish();
        let ctx = invoker.context(&ka_sequence());

        assert_eq!(ctx.predictor_id, "scripted");
        assert_eq!(ctx.events, 2);
        assert!(!ctx.request_id.is_empty());
    }
}
