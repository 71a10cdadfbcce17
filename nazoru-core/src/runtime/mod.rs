//! Runtime layer for prediction requests.
//!
//! The runtime sits between the HTTP surface and the predictor interface
//! (`predict_top_n`). It is responsible for:
//! - Bounding each request to the configured result count
//! - Shaping predictor output into the public response
//! - Keeping "no prediction" apart from faults
//! - Managing layers (logging, caching, etc.)

pub mod invoker;

pub use invoker::{PredictionInvoker, PredictionInvokerBuilder, DEFAULT_TOP_N};
