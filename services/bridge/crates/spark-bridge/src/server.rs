//! Transports: Streamable HTTP behind axum, or stdio.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::StatusCode;
use axum_server::tls_rustls::RustlsConfig;
use rmcp::ServiceExt;
use rmcp::transport::streamable_http_server::{
    StreamableHttpService, session::local::LocalSessionManager,
};

use crate::client::ControllerClient;
use crate::config::BridgeConfig;
use crate::tools::SparkTools;

/// Minimal health-check handler for Docker / load-balancer probes.
async fn health() -> StatusCode {
    StatusCode::OK
}

/// Compose the axum router:
///   - `/mcp`    → MCP Streamable-HTTP transport
///   - `/health` → health-check probe
///
/// Every MCP session gets a fresh [`SparkTools`] sharing `client`.
pub fn router(client: Arc<ControllerClient>) -> axum::Router {
    let service = StreamableHttpService::new(
        move || Ok(SparkTools::new(client.clone())),
        LocalSessionManager::default().into(),
        Default::default(),
    );

    axum::Router::new()
        .nest_service("/mcp", service)
        .route("/health", axum::routing::get(health))
}

/// Bind and serve over HTTP, or HTTPS when both TLS paths are set.
pub async fn serve_http(config: &BridgeConfig, client: Arc<ControllerClient>) -> Result<()> {
    let router = router(client);
    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .context("invalid listen address")?;

    if let Some((cert_path, key_path)) = config.tls_paths() {
        tracing::info!(cert = cert_path, "TLS enabled");
        let tls_config = RustlsConfig::from_pem_file(cert_path, key_path)
            .await
            .context("failed to load TLS certificates")?;

        tracing::info!("MCP server ready on https://{addr}/mcp");

        axum_server::bind_rustls(addr, tls_config)
            .serve(router.into_make_service())
            .await
            .context("HTTPS server error")?;
    } else {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .context("failed to bind TCP listener")?;

        tracing::info!("MCP server ready on http://{addr}/mcp (TLS disabled)");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP server error")?;
    }

    Ok(())
}

/// Serve a single MCP session over stdin/stdout until the host hangs up.
pub async fn serve_stdio(client: Arc<ControllerClient>) -> Result<()> {
    let running = SparkTools::new(client)
        .serve(rmcp::transport::stdio())
        .await
        .context("failed to start MCP session on stdio")?;

    tracing::info!("MCP server ready on stdio");

    let reason = running.waiting().await.context("MCP stdio session failed")?;
    tracing::info!(?reason, "stdio session ended");
    Ok(())
}

/// Wait for SIGINT (Ctrl-C) for graceful shutdown.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("received shutdown signal");
}
