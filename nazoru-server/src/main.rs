#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use anyhow::Context;
use clap::Parser;

use nazoru_server::config::{ServerArgs, ServerConfig};
use nazoru_server::http::{self, PredictState};
use nazoru_server::logging::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServerArgs::parse();
    init_logging(&args.log, args.log_format)?;

    let cfg = ServerConfig::from(&args);
    let addr = cfg.validate()?;
    let state = PredictState::from_config(&cfg)?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(%addr, "starting Nazoru prediction server");

    http::serve(listener, state, shutdown_signal()).await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for ctrl-c; shutting down");
    }
}
