use serde::Deserialize;
use thiserror::Error;

/// Controller endpoint used when no base URL is configured.
pub const DEFAULT_CONTROLLER_URL: &str = "http://127.0.0.1:5001";

/// Errors raised while resolving the controller configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("controller url {0:?} must start with http:// or https://")]
    UnsupportedScheme(String),
    #[error("controller url {0:?} has no host")]
    MissingHost(String),
}

/// Where the DGX Spark Platform Controller lives.
///
/// Read once at startup; the resolved base URL never changes afterwards.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ControllerConfig {
    /// Base URL of the controller, e.g. `http://127.0.0.1:5001`.
    /// Trailing slashes are stripped when resolved.
    #[serde(default)]
    pub base_url: Option<String>,
}

impl ControllerConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
        }
    }

    /// Resolve the base URL requests are sent to.
    ///
    /// Unset, blank, or slash-only values fall back to
    /// [`DEFAULT_CONTROLLER_URL`].
    #[must_use]
    pub fn resolved_base_url(&self) -> String {
        self.base_url
            .as_deref()
            .map(normalize_base_url)
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_CONTROLLER_URL.to_string())
    }

    /// Resolve and sanity-check the base URL.
    ///
    /// Only the scheme and the presence of a host are checked here; the
    /// HTTP client does full parsing.
    pub fn validated_base_url(&self) -> Result<String, ConfigError> {
        let url = self.resolved_base_url();
        let rest = url
            .strip_prefix("http://")
            .or_else(|| url.strip_prefix("https://"))
            .ok_or_else(|| ConfigError::UnsupportedScheme(url.clone()))?;
        if rest.is_empty() || rest.starts_with('/') {
            return Err(ConfigError::MissingHost(url));
        }
        Ok(url)
    }
}

/// Trim surrounding whitespace and every trailing `/`.
#[must_use]
pub fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}
