//! DGX Spark bridge entry point.
//!
//! Initialises tracing, loads configuration from `SPARK_BRIDGE_*`
//! environment variables, and serves the three DGX Spark tools over MCP
//! (Streamable HTTP or stdio), forwarding every call to the platform
//! controller.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use spark_bridge::{BridgeConfig, ControllerClient, Transport, server};

#[tokio::main]
async fn main() -> Result<()> {
    // Install the default crypto provider (ring) for rustls 0.23+.
    // Ignore the error if a dependency already installed one.
    let _ = rustls::crypto::ring::default_provider().install_default();

    // 1. Tracing goes to stderr so stdout stays free for the stdio transport.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("spark-bridge starting");

    // 2. Configuration.
    let config = BridgeConfig::from_env()?;
    let base_url = config
        .controller()
        .validated_base_url()
        .context("invalid SPARK_BRIDGE_CONTROLLER_URL")?;

    tracing::info!(
        controller_url = %base_url,
        transport      = ?config.transport,
        listen_addr    = %config.listen_addr,
        tls_enabled    = config.tls_paths().is_some(),
        "configuration loaded",
    );

    // 3. One client for the whole process; sessions share it.
    let client = Arc::new(ControllerClient::new(&base_url)?);

    match config.transport {
        Transport::Http => server::serve_http(&config, client).await?,
        Transport::Stdio => server::serve_stdio(client).await?,
    }

    tracing::info!("spark-bridge shut down");
    Ok(())
}
