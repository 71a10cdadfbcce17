use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use nazoru::layer::{CacheLayer, LoggingLayer};
use nazoru::predictor::{resolve_model_location, GraphPredictor};
use nazoru::{PredictError, PredictionInvoker};
use serde::Serialize;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone, Debug)]
pub struct PredictState {
    pub invoker: PredictionInvoker,
    pub max_body_bytes: usize,
}

impl PredictState {
    pub fn new(invoker: PredictionInvoker, max_body_bytes: usize) -> Self {
        Self {
            invoker,
            max_body_bytes,
        }
    }

    /// Wire the graph predictor and layers described by `cfg`.
    ///
    /// The model location is resolved here, once, and stays fixed for the
    /// lifetime of the returned state.
    pub fn from_config(cfg: &ServerConfig) -> Result<Self, PredictError> {
        let graph_path = resolve_model_location(cfg.graph_path.clone());
        tracing::info!(
            graph = %graph_path.display(),
            load_policy = %cfg.load_policy,
            top_n = cfg.top_n,
            cache_capacity = cfg.cache_capacity,
            "configured key-graph predictor"
        );

        let predictor = GraphPredictor::builder()
            .graph_path(graph_path)
            .load_policy(cfg.load_policy)
            .build()?;

        let invoker = PredictionInvoker::builder(predictor)
            .layer(CacheLayer::new(cfg.cache_capacity))
            .layer(LoggingLayer::new())
            .top_n(cfg.top_n)
            .finish();

        Ok(Self::new(invoker, cfg.max_body_bytes))
    }
}

pub fn router(state: PredictState) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .layer(RequestBodyLimitLayer::new(state.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(
    listener: tokio::net::TcpListener,
    state: PredictState,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn predict(
    State(state): State<PredictState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request_id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_owned);

    match state.invoker.invoke_body(&body, request_id).await {
        Ok(resp) => (StatusCode::OK, Json(resp)).into_response(),
        Err(err) => HttpErr::from(&err).into_response(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicErrorCode {
    MalformedRequest,
    Internal,
}

impl PublicErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MalformedRequest => "MALFORMED_REQUEST",
            Self::Internal => "INTERNAL",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorBody {
    pub status: &'static str,
    pub code: &'static str,
}

/// Client-facing rendering of a fault.
///
/// Pure mapping; the fault itself is logged once by the invoker.
#[derive(Debug)]
pub struct HttpErr {
    pub(crate) status: StatusCode,
    pub(crate) code: PublicErrorCode,
}

impl From<&PredictError> for HttpErr {
    fn from(err: &PredictError) -> Self {
        if err.is_malformed_request() {
            Self {
                status: StatusCode::BAD_REQUEST,
                code: PublicErrorCode::MalformedRequest,
            }
        } else {
            Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                code: PublicErrorCode::Internal,
            }
        }
    }
}

impl HttpErr {
    fn body(&self) -> ErrorBody {
        ErrorBody {
            status: "error",
            code: self.code.as_str(),
        }
    }
}

impl IntoResponse for HttpErr {
    fn into_response(self) -> Response {
        (self.status, Json(self.body())).into_response()
    }
}
