//! Key-graph predictor.
//!
//! Binds a [`Predictor`] to a key graph artifact on disk. How often the
//! artifact is read is governed by [`LoadPolicy`].

use crate::model::KeyGraph;
use async_trait::async_trait;
use nazoru_core::error::PredictError;
use nazoru_core::predictor::Predictor;
use nazoru_core::types::*;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// When the model artifact is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// Read and decode the artifact on every prediction
    PerRequest,
    /// Read once on first use and share the read-only graph afterwards.
    /// A failed load is not remembered; the next prediction tries again.
    #[default]
    Shared,
}

impl LoadPolicy {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PerRequest => "per-request",
            Self::Shared => "shared",
        }
    }
}

impl fmt::Display for LoadPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoadPolicy {
    type Err = PredictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "per-request" | "per_request" => Ok(Self::PerRequest),
            "shared" => Ok(Self::Shared),
            other => Err(PredictError::configuration(format!(
                "unknown load policy {other:?} (expected \"per-request\" or \"shared\")"
            ))),
        }
    }
}

/// Predictor backed by a key graph artifact
#[derive(Clone)]
pub struct GraphPredictor {
    graph_path: PathBuf,
    load_policy: LoadPolicy,
    shared: Arc<OnceCell<Arc<KeyGraph>>>,
    info: Arc<PredictorInfo>,
}

impl fmt::Debug for GraphPredictor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphPredictor")
            .field("info", &self.info)
            .field("graph_path", &self.graph_path)
            .field("load_policy", &self.load_policy)
            .field("loaded", &self.shared.initialized())
            .finish()
    }
}

impl GraphPredictor {
    /// Create a predictor for the artifact at `graph_path` with the default policy
    pub fn new(graph_path: impl Into<PathBuf>) -> Self {
        Self {
            graph_path: graph_path.into(),
            load_policy: LoadPolicy::default(),
            shared: Arc::new(OnceCell::new()),
            info: Self::default_info(),
        }
    }

    /// Create a builder for more configuration options
    pub fn builder() -> GraphPredictorBuilder {
        GraphPredictorBuilder::default()
    }

    pub fn graph_path(&self) -> &Path {
        &self.graph_path
    }

    pub fn load_policy(&self) -> LoadPolicy {
        self.load_policy
    }

    fn default_info() -> Arc<PredictorInfo> {
        Arc::new(PredictorInfo {
            id: "key-graph".to_string(),
            name: "Key Graph".to_string(),
        })
    }

    async fn graph(&self) -> Result<Arc<KeyGraph>, PredictError> {
        match self.load_policy {
            LoadPolicy::PerRequest => Ok(Arc::new(KeyGraph::load(&self.graph_path).await?)),
            LoadPolicy::Shared => self
                .shared
                .get_or_try_init(|| async {
                    KeyGraph::load(&self.graph_path).await.map(Arc::new)
                })
                .await
                .map(Arc::clone),
        }
    }
}

#[async_trait]
impl Predictor for GraphPredictor {
    fn info(&self) -> Arc<PredictorInfo> {
        self.info.clone()
    }

    async fn predict_top_n(&self, req: TopNRequest) -> Result<Prediction, PredictError> {
        let graph = self.graph().await?;
        Ok(graph.top_n(&req.sequence, req.n))
    }
}

/// Builder for a graph predictor with custom configuration
#[derive(Debug, Default)]
pub struct GraphPredictorBuilder {
    graph_path: Option<PathBuf>,
    load_policy: LoadPolicy,
}

impl GraphPredictorBuilder {
    /// Set the model artifact location
    pub fn graph_path(mut self, graph_path: impl Into<PathBuf>) -> Self {
        self.graph_path = Some(graph_path.into());
        self
    }

    /// Set the load policy
    pub fn load_policy(mut self, load_policy: LoadPolicy) -> Self {
        self.load_policy = load_policy;
        self
    }

    /// Build the predictor
    ///
    /// The artifact is not touched here; a missing or corrupt artifact
    /// surfaces as a fault on the first prediction.
    pub fn build(self) -> Result<GraphPredictor, PredictError> {
        let graph_path = self
            .graph_path
            .ok_or_else(|| PredictError::configuration("graph path is required"))?;

        Ok(GraphPredictor {
            load_policy: self.load_policy,
            ..GraphPredictor::new(graph_path)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const GRAPH: &str = r#"{
        "name": "test",
        "paths": [
            {"keys": ["k", "a"], "logits": {"か": 2.0, "が": 0.5}}
        ]
    }"#;

    fn write_graph(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn ka() -> TopNRequest {
        TopNRequest::new(
            KeystrokeSequence::new(vec![KeyEvent::new("k", 100.0), KeyEvent::new("a", 150.0)]),
            5,
        )
    }

    #[tokio::test]
    async fn test_predicts_from_artifact() {
        let file = write_graph(GRAPH);
        let predictor = GraphPredictor::new(file.path());

        match predictor.predict_top_n(ka()).await.unwrap() {
            Prediction::Ranked(candidates) => {
                assert_eq!(candidates.len(), 2);
                assert_eq!(candidates[0].character, "か");
            }
            Prediction::NoPrediction => panic!("expected candidates"),
        }
    }

    #[tokio::test]
    async fn test_missing_artifact_is_a_fault_not_no_prediction() {
        for policy in [LoadPolicy::PerRequest, LoadPolicy::Shared] {
            let predictor = GraphPredictor::builder()
                .graph_path("/nonexistent/nazoru.graph.json")
                .load_policy(policy)
                .build()
                .unwrap();

            let err = predictor.predict_top_n(ka()).await.unwrap_err();
            assert!(matches!(err, PredictError::ModelNotFound(_)), "{policy}");
        }
    }

    #[tokio::test]
    async fn test_per_request_policy_rereads_artifact() {
        let file = write_graph(GRAPH);
        let predictor = GraphPredictor::builder()
            .graph_path(file.path())
            .load_policy(LoadPolicy::PerRequest)
            .build()
            .unwrap();

        assert!(!predictor.predict_top_n(ka()).await.unwrap().is_no_prediction());

        std::fs::write(file.path(), r#"{"paths": []}"#).unwrap();
        assert!(predictor.predict_top_n(ka()).await.unwrap().is_no_prediction());
    }

    #[tokio::test]
    async fn test_shared_policy_loads_once() {
        let file = write_graph(GRAPH);
        let predictor = GraphPredictor::builder()
            .graph_path(file.path())
            .load_policy(LoadPolicy::Shared)
            .build()
            .unwrap();

        let first = predictor.predict_top_n(ka()).await.unwrap();
        std::fs::write(file.path(), r#"{"paths": []}"#).unwrap();
        let second = predictor.predict_top_n(ka()).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_shared_policy_does_not_cache_failed_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("late.graph.json");
        let predictor = GraphPredictor::new(&path);

        assert!(predictor.predict_top_n(ka()).await.is_err());

        std::fs::write(&path, GRAPH).unwrap();
        assert!(!predictor.predict_top_n(ka()).await.unwrap().is_no_prediction());
    }

    #[test]
    fn test_builder_requires_graph_path() {
        let err = GraphPredictor::builder().build().unwrap_err();
        assert!(matches!(err, PredictError::Configuration(_)));
    }

    #[test]
    fn test_load_policy_parses() {
        assert_eq!("shared".parse::<LoadPolicy>().unwrap(), LoadPolicy::Shared);
        assert_eq!(
            "per-request".parse::<LoadPolicy>().unwrap(),
            LoadPolicy::PerRequest
        );
        assert!("sometimes".parse::<LoadPolicy>().is_err());
    }
}
