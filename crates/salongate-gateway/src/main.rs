//! salongate gateway
//!
//! - Host -> tenant resolution on every request
//! - Bearer-token roles checked against the RBAC table per route
//! - `/healthz`, `/readyz`, `/metrics`
//! - Graceful shutdown on ctrl-c (readyz flips to 503 first)

use std::env;

use tracing_subscriber::{fmt, EnvFilter};

use salongate_core::error::{GateError, Result};
use salongate_gateway::{app_state, config, router};

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = env::var("SALONGATE_CONFIG").unwrap_or_else(|_| "salongate.yaml".into());
    let cfg = config::load_from_file(&path)?;
    let listen = cfg.gateway.listen_addr()?;

    let state = app_state::AppState::new(cfg)?;
    let metrics = state.metrics();
    let app = router::build_router(state);

    tracing::info!(%listen, config = %path, "salongate-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| GateError::Internal(format!("failed to bind {listen}: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            metrics.set_draining();
            tracing::info!("shutdown signal received; draining");
        })
        .await
        .map_err(|e| GateError::Internal(format!("server failed: {e}")))
}
