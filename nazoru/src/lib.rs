//! # Nazoru
//!
//! Keystroke-to-character prediction, as a composable toolkit.
//!
//! A client streams raw key events (`key`, `time`) and gets back the most
//! probable intended characters, ranked by probability. Nazoru splits that
//! into a request normalizer, a prediction invoker and a pluggable
//! prediction engine behind the [`Predictor`] trait, with middleware layers
//! in between.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! nazoru = { version = "0.1", features = ["graph", "layers"] }
//! ```
//!
//! ```ignore
//! use nazoru::prelude::*;
//! use nazoru::predictor::{resolve_model_location, GraphPredictor, LoadPolicy};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let predictor = GraphPredictor::builder()
//!     .graph_path(resolve_model_location(None))
//!     .load_policy(LoadPolicy::Shared)
//!     .build()?;
//!
//! let invoker = PredictionInvoker::builder(predictor)
//!     .layer(LoggingLayer::new())
//!     .top_n(5)
//!     .finish();
//!
//! let body = br#"[{"key":"k","time":100},{"key":"a","time":150}]"#;
//! let response = invoker.invoke_body(body, None).await?;
//! println!("{}", serde_json::to_string(&response)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `default`: `graph` and `layers`
//! - `graph`: key-graph prediction engine
//! - `predictors`: all available prediction engines
//! - `layers`: built-in layers (logging, caching)
//! - `full`: all features enabled

// Re-export core types and traits
pub use nazoru_core::*;

// Re-export predictors under `predictor` module
#[cfg(feature = "nazoru-predictor")]
pub mod predictor {
    //! Prediction engine implementations.
    pub use nazoru_predictor::*;
}

// Re-export layers under `layer` module
#[cfg(feature = "nazoru-layer")]
pub mod layer {
    //! Built-in middleware layers.
    pub use nazoru_layer::*;
}

// Convenience re-exports at root level for common types
pub use nazoru_core::{
    error::PredictError,
    layer::{Layer, LayeredPredictor},
    predictor::Predictor,
    runtime::PredictionInvoker,
    types::{
        KeyEvent, KeystrokeSequence, Prediction, PredictionCandidate, PredictorInfo,
        RankedCharacter, RequestContext, ServiceResponse, TopNRequest,
    },
    Result,
};

/// Prelude module for convenient imports
pub mod prelude {
    //! Prelude module containing the most commonly used types and traits.
    //!
    //! ```
    //! use nazoru::prelude::*;
    //! ```

    pub use crate::{
        KeyEvent, KeystrokeSequence, Layer, PredictError, Prediction, PredictionCandidate,
        PredictionInvoker, Predictor, Result, ServiceResponse, TopNRequest,
    };

    #[cfg(feature = "nazoru-predictor")]
    pub use crate::predictor::*;

    #[cfg(feature = "nazoru-layer")]
    pub use crate::layer::*;
}
