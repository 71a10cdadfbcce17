//! Cache layer memoizing prediction outcomes.
//!
//! Prediction over a read-only model artifact is idempotent, so an outcome
//! can be replayed for the exact same keystroke sequence and bound. Faults are
//! never cached.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use nazoru_core::error::PredictError;
use nazoru_core::impl_layered_predictor;
use nazoru_core::layer::{Layer, LayeredPredictor};
use nazoru_core::predictor::Predictor;
use nazoru_core::types::*;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Cache layer configuration
#[derive(Debug, Clone)]
pub struct CacheLayer {
    capacity: usize,
}

impl CacheLayer {
    /// Create a cache holding at most `capacity` outcomes.
    ///
    /// A capacity of zero disables caching.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Disabled cache, every call reaches the inner predictor
    pub fn disabled() -> Self {
        Self::new(0)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<P: Predictor> Layer<P> for CacheLayer {
    type LayeredPredictor = CachePredictor<P>;

    fn layer(&self, inner: P) -> Self::LayeredPredictor {
        CachePredictor {
            inner,
            capacity: self.capacity,
            admitted: AtomicUsize::new(0),
            entries: DashMap::new(),
        }
    }
}

/// Exact-match cache key. Timestamps are compared bit for bit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    events: Vec<(String, u64)>,
    n: usize,
}

impl CacheKey {
    fn new(req: &TopNRequest) -> Self {
        Self {
            events: req
                .sequence
                .events()
                .iter()
                .map(|event| (event.key.clone(), event.time.to_bits()))
                .collect(),
            n: req.n,
        }
    }
}

/// Predictor wrapped with an outcome cache
#[derive(Debug)]
pub struct CachePredictor<P> {
    inner: P,
    capacity: usize,
    /// Slots claimed so far; entries are never evicted, so this only grows
    admitted: AtomicUsize,
    entries: DashMap<CacheKey, Prediction>,
}

impl<P> CachePredictor<P> {
    /// Number of cached outcomes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn try_admit(&self) -> bool {
        self.admitted
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < self.capacity).then_some(n + 1)
            })
            .is_ok()
    }
}

#[async_trait]
impl<P: Predictor> LayeredPredictor for CachePredictor<P> {
    type Inner = P;

    fn inner(&self) -> &Self::Inner {
        &self.inner
    }

    async fn layered_predict_top_n(&self, req: TopNRequest) -> Result<Prediction, PredictError> {
        if self.capacity == 0 {
            return self.inner.predict_top_n(req).await;
        }

        let key = CacheKey::new(&req);
        let cached = self.entries.get(&key).map(|entry| entry.value().clone());
        if let Some(outcome) = cached {
            tracing::trace!(events = key.events.len(), n = key.n, "prediction cache hit");
            return Ok(outcome);
        }

        let outcome = self.inner.predict_top_n(req).await?;

        // A slot is claimed atomically, so concurrent misses cannot overshoot
        // the capacity. A full cache keeps its entries and admits nothing new.
        if let Entry::Vacant(slot) = self.entries.entry(key) {
            if self.try_admit() {
                slot.insert(outcome.clone());
            }
        }

        Ok(outcome)
    }
}

impl_layered_predictor!(CachePredictor);
