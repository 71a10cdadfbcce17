//! Key graph model artifact.
//!
//! The artifact is a JSON document listing key paths and, for each path, the
//! logits of the characters it may spell:
//!
//! ```json
//! { "name": "demo", "paths": [ { "keys": ["k", "a"], "logits": { "か": 2.1, "が": 0.4 } } ] }
//! ```
//!
//! Paths are loaded into a trie keyed by key symbol. A lookup walks the trie
//! with the sequence's keys; falling off the trie means there is no
//! prediction for that sequence.

use nazoru_core::error::PredictError;
use nazoru_core::types::{KeystrokeSequence, Prediction, PredictionCandidate};
use serde::Deserialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

#[derive(Debug, Deserialize)]
struct GraphFile {
    #[serde(default)]
    name: String,
    #[serde(default)]
    paths: Vec<PathEntry>,
}

#[derive(Debug, Deserialize)]
struct PathEntry {
    keys: Vec<String>,
    #[serde(default)]
    logits: BTreeMap<String, f64>,
}

#[derive(Debug, Default)]
struct Node {
    children: HashMap<String, usize>,
    /// `None` for interior nodes that no path ends on
    logits: Option<Vec<(String, f64)>>,
}

/// Read-only, loaded key graph.
#[derive(Debug)]
pub struct KeyGraph {
    name: String,
    nodes: Vec<Node>,
    paths: usize,
}

impl KeyGraph {
    /// Read and decode a graph artifact from disk.
    pub async fn load(path: &Path) -> Result<Self, PredictError> {
        let bytes = tokio::fs::read(path).await.map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                PredictError::model_not_found(path.display().to_string())
            } else {
                PredictError::Io(err)
            }
        })?;

        let graph = Self::from_slice(&bytes)?;
        tracing::debug!(
            path = %path.display(),
            name = %graph.name,
            paths = graph.paths,
            "loaded key graph"
        );
        Ok(graph)
    }

    /// Decode a graph artifact from bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, PredictError> {
        let file: GraphFile = serde_json::from_slice(bytes)
            .map_err(|e| PredictError::model_load(format!("invalid graph document: {e}")))?;

        let mut nodes = vec![Node::default()];
        for entry in &file.paths {
            if entry.keys.is_empty() {
                return Err(PredictError::model_load("graph path with no keys"));
            }
            if let Some((character, _)) = entry.logits.iter().find(|(_, l)| !l.is_finite()) {
                return Err(PredictError::model_load(format!(
                    "non-finite logit for {character:?} at path {:?}",
                    entry.keys
                )));
            }

            let mut current = 0;
            for key in &entry.keys {
                current = match nodes[current].children.get(key) {
                    Some(&next) => next,
                    None => {
                        nodes.push(Node::default());
                        let next = nodes.len() - 1;
                        nodes[current].children.insert(key.clone(), next);
                        next
                    }
                };
            }

            if nodes[current].logits.is_some() {
                return Err(PredictError::model_load(format!(
                    "duplicate graph path {:?}",
                    entry.keys
                )));
            }
            nodes[current].logits = Some(
                entry
                    .logits
                    .iter()
                    .map(|(character, logit)| (character.clone(), *logit))
                    .collect(),
            );
        }

        Ok(Self {
            name: file.name,
            nodes,
            paths: file.paths.len(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of key paths in the graph
    pub fn len(&self) -> usize {
        self.paths
    }

    pub fn is_empty(&self) -> bool {
        self.paths == 0
    }

    /// Rank the characters for a sequence's key path.
    ///
    /// Timestamps do not take part in the lookup.
    pub fn top_n(&self, sequence: &KeystrokeSequence, n: usize) -> Prediction {
        let Some(logits) = self.lookup(sequence) else {
            return Prediction::NoPrediction;
        };
        if logits.is_empty() {
            return Prediction::NoPrediction;
        }

        let mut candidates = softmax(logits);
        candidates.sort_by(|a, b| {
            b.probability
                .partial_cmp(&a.probability)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.character.cmp(&b.character))
        });
        candidates.truncate(n);

        Prediction::Ranked(candidates)
    }

    fn lookup(&self, sequence: &KeystrokeSequence) -> Option<&[(String, f64)]> {
        if sequence.is_empty() {
            return None;
        }

        let mut current = 0;
        for key in sequence.keys() {
            current = *self.nodes[current].children.get(key)?;
        }
        self.nodes[current].logits.as_deref()
    }
}

fn softmax(logits: &[(String, f64)]) -> Vec<PredictionCandidate> {
    let max = logits
        .iter()
        .map(|(_, logit)| *logit)
        .fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|(_, logit)| (logit - max).exp()).collect();
    let total: f64 = exps.iter().sum();

    logits
        .iter()
        .zip(exps)
        .map(|((character, logit), exp)| {
            PredictionCandidate::new(character.clone(), *logit, (exp / total) as f32)
        })
        .collect()
}
