//! `irbot serve`: run the HTTP gateway until Ctrl-C.

use anyhow::{Context, Result};
use irbot_core::GatewayConfig;
use irbot_server::{AppState, create_router};
use std::sync::Arc;
use tokio::net::TcpListener;

pub async fn run(config: GatewayConfig, bind: Option<String>) -> Result<()> {
    let addr = bind.unwrap_or_else(|| config.service.bind.clone());

    let state = Arc::new(AppState::from_config(&config));
    let app = create_router(state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!(
        address = %addr,
        service = %config.service.name,
        audit_log = %config.audit.log_path().display(),
        scripts_dir = %config.executor.scripts_dir.display(),
        "IR Bot gateway listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("IR Bot gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
