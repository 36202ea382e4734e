//! Server configuration loaded from `SPARK_BRIDGE_*` environment variables.

use anyhow::{Context, Result};
use serde::Deserialize;

use spark_common::ControllerConfig;

pub const ENV_PREFIX: &str = "SPARK_BRIDGE_";

/// How the MCP host reaches this server.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Streamable HTTP on `listen_addr`.
    #[default]
    Http,
    /// stdin/stdout, for hosts that spawn the bridge as a child process.
    Stdio,
}

/// Each field maps to `SPARK_BRIDGE_<FIELD>`:
///   - `SPARK_BRIDGE_CONTROLLER_URL` (default `http://127.0.0.1:5001`)
///   - `SPARK_BRIDGE_TRANSPORT`      (`http` or `stdio`, default `http`)
///   - `SPARK_BRIDGE_LISTEN_ADDR`    (default `127.0.0.1:8080`)
///   - `SPARK_BRIDGE_TLS_CERT`       (optional, path to TLS cert)
///   - `SPARK_BRIDGE_TLS_KEY`        (optional, path to TLS key)
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
    /// Base URL of the DGX Spark Platform Controller.
    #[serde(default)]
    pub controller_url: Option<String>,

    #[serde(default)]
    pub transport: Transport,

    /// Socket address to bind the HTTP server to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Path to TLS certificate (enables HTTPS when set with `tls_key`).
    pub tls_cert: Option<String>,

    /// Path to TLS private key.
    pub tls_key: Option<String>,
}

fn default_listen_addr() -> String {
    "127.0.0.1:8080".to_string()
}

impl BridgeConfig {
    pub fn from_env() -> Result<Self> {
        envy::prefixed(ENV_PREFIX)
            .from_env()
            .context("failed to load config from SPARK_BRIDGE_* env vars")
    }

    /// Load from explicit key/value pairs (keys carry the prefix).
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(ENV_PREFIX)
            .from_iter(pairs)
            .context("invalid SPARK_BRIDGE_* configuration")
    }

    #[must_use]
    pub fn controller(&self) -> ControllerConfig {
        ControllerConfig {
            base_url: self.controller_url.clone(),
        }
    }

    /// Certificate and key paths, only when both are set.
    #[must_use]
    pub fn tls_paths(&self) -> Option<(&str, &str)> {
        match (&self.tls_cert, &self.tls_key) {
            (Some(cert), Some(key)) => Some((cert.as_str(), key.as_str())),
            _ => None,
        }
    }
}
