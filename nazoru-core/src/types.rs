//! Core types for keystroke prediction.

use serde::{Deserialize, Serialize};

/// One physical keystroke: the key symbol and when it was pressed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: String,
    pub time: f64,
}

impl KeyEvent {
    /// Create a new key event
    pub fn new(key: impl Into<String>, time: f64) -> Self {
        Self {
            key: key.into(),
            time,
        }
    }
}

/// Ordered keystrokes in typing order.
///
/// Never deduplicated or re-sorted by time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeystrokeSequence(Vec<KeyEvent>);

impl KeystrokeSequence {
    /// Create a sequence from events in typing order
    pub fn new(events: Vec<KeyEvent>) -> Self {
        Self(events)
    }

    pub fn events(&self) -> &[KeyEvent] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the key symbols only, in typing order
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().map(|event| event.key.as_str())
    }

    pub fn into_events(self) -> Vec<KeyEvent> {
        self.0
    }
}

impl From<Vec<KeyEvent>> for KeystrokeSequence {
    fn from(events: Vec<KeyEvent>) -> Self {
        Self(events)
    }
}

impl FromIterator<KeyEvent> for KeystrokeSequence {
    fn from_iter<I: IntoIterator<Item = KeyEvent>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Top-N prediction request handed to a predictor
#[derive(Debug, Clone, PartialEq)]
pub struct TopNRequest {
    pub sequence: KeystrokeSequence,
    pub n: usize,
}

impl TopNRequest {
    /// Create a new top-N request
    pub fn new(sequence: KeystrokeSequence, n: usize) -> Self {
        Self { sequence, n }
    }
}

/// A ranked character guess as produced by a predictor.
///
/// `score` is the engine's internal value and never leaves the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionCandidate {
    pub character: String,
    pub score: f64,
    pub probability: f32,
}

impl PredictionCandidate {
    /// Create a new candidate
    pub fn new(character: impl Into<String>, score: f64, probability: f32) -> Self {
        Self {
            character: character.into(),
            score,
            probability,
        }
    }
}

/// Outcome of a successful predictor invocation.
///
/// Faults travel on the `Err` side of `Result<Prediction, PredictError>`.
#[derive(Debug, Clone, PartialEq)]
pub enum Prediction {
    /// Candidates ordered by descending probability
    Ranked(Vec<PredictionCandidate>),
    /// The model has no resolvable path for the sequence
    NoPrediction,
}

impl Prediction {
    pub fn is_no_prediction(&self) -> bool {
        matches!(self, Prediction::NoPrediction)
    }
}

/// Public view of a candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCharacter {
    pub character: String,
    pub probability: f64,
}

impl From<PredictionCandidate> for RankedCharacter {
    fn from(candidate: PredictionCandidate) -> Self {
        Self {
            character: candidate.character,
            probability: f64::from(candidate.probability),
        }
    }
}

/// Client-facing response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ServiceResponse {
    Ok { result: Vec<RankedCharacter> },
    Ng,
}

impl ServiceResponse {
    pub fn is_ok(&self) -> bool {
        matches!(self, ServiceResponse::Ok { .. })
    }

    /// Ranked characters, empty for `ng`
    pub fn result(&self) -> &[RankedCharacter] {
        match self {
            ServiceResponse::Ok { result } => result,
            ServiceResponse::Ng => &[],
        }
    }
}

/// Predictor information
#[derive(Debug, Clone)]
pub struct PredictorInfo {
    pub id: String,
    pub name: String,
}

/// Per-request context used to correlate log lines
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
    pub predictor_id: String,
    pub events: usize,
}

impl RequestContext {
    /// Create a new request context
    pub fn new(predictor_id: impl Into<String>, events: usize) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            predictor_id: predictor_id.into(),
            events,
        }
    }

    /// Use a caller-supplied request id (e.g. from an `x-request-id` header)
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_response_shape() {
        let response = ServiceResponse::Ok {
            result: vec![RankedCharacter {
                character: "か".to_string(),
                probability: 0.5,
            }],
        };

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"status": "ok", "result": [{"character": "か", "probability": 0.5}]})
        );
    }

    #[test]
    fn test_ng_response_shape() {
        assert_eq!(
            serde_json::to_value(ServiceResponse::Ng).unwrap(),
            json!({"status": "ng"})
        );
        assert!(ServiceResponse::Ng.result().is_empty());
    }

    #[test]
    fn test_candidate_probability_widens_to_f64() {
        let ranked = RankedCharacter::from(PredictionCandidate::new("き", 1.5, 0.25));
        assert_eq!(ranked.character, "き");
        assert_eq!(ranked.probability, 0.25_f64);
    }

    #[test]
    fn test_sequence_is_transparent_on_the_wire() {
        let sequence = KeystrokeSequence::new(vec![KeyEvent::new("k", 100.0)]);
        assert_eq!(
            serde_json::to_value(&sequence).unwrap(),
            json!([{"key": "k", "time": 100.0}])
        );
    }
}
