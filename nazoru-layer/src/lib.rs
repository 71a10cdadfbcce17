//! # Nazoru Layers
//!
//! Built-in layers for predictors.
//!
//! Currently implemented layers:
//! - `LoggingLayer`: Logs all predictor operations with timing information
//! - `CacheLayer`: Memoizes outcomes for repeated keystroke sequences
//!
//! There is no retry layer: a prediction is single-shot.
//!
//! ## Usage
//!
//! ```ignore
//! use nazoru_core::PredictionInvoker;
//! use nazoru_layer::{CacheLayer, LoggingLayer};
//!
//! let invoker = PredictionInvoker::builder(predictor)
//!     .layer(CacheLayer::new(1024))
//!     .layer(LoggingLayer::new())
//!     .finish();
//! ```

pub mod cache;
pub mod logging;

// Re-exports
pub use cache::{CacheLayer, CachePredictor};
pub use logging::{LoggingLayer, LoggingPredictor};
