//! Request normalization.
//!
//! Turns the wire-level request body, a JSON list of `{key, time}` records,
//! into a [`KeystrokeSequence`]. Records are projected one-to-one in input
//! order. Nothing is coerced, range-checked or reordered here: a body of the
//! wrong shape is a [`PredictError::MalformedRequest`], and an empty list is
//! a perfectly valid (empty) sequence.

use crate::error::PredictError;
use crate::types::{KeyEvent, KeystrokeSequence};
use serde::Deserialize;

/// One record of the request body.
///
/// Fields other than `key` and `time` are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KeyEventRecord {
    pub key: String,
    pub time: f64,
}

impl From<KeyEventRecord> for KeyEvent {
    fn from(record: KeyEventRecord) -> Self {
        KeyEvent {
            key: record.key,
            time: record.time,
        }
    }
}

/// Project records to key events, preserving order exactly.
pub fn normalize(records: Vec<KeyEventRecord>) -> KeystrokeSequence {
    records.into_iter().map(KeyEvent::from).collect()
}

/// Parse a raw request body and normalize it.
pub fn normalize_body(body: &[u8]) -> Result<KeystrokeSequence, PredictError> {
    let records: Vec<KeyEventRecord> = serde_json::from_slice(body)
        .map_err(|e| PredictError::malformed_request(format!("invalid keystroke list: {e}")))?;
    Ok(normalize(records))
}
