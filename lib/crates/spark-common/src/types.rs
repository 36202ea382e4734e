use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Whether to install or remove an apt package
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PackageAction {
    Install,
    Remove,
}

/// Host setting readable through the controller
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SettingKey {
    CudaVersion,
    OsName,
    HomeDirectory,
}

/// Body of `POST /run_command`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RunCommandRequest {
    /// Shell command to execute in the sandbox
    pub command: String,
}

/// Body of `POST /manage_package`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ManagePackageRequest {
    /// Whether to install or remove the package
    pub action: PackageAction,
    /// Name of the apt package
    pub package_name: String,
}

/// Body of `POST /get_settings`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GetSettingRequest {
    /// Setting to retrieve
    pub setting_key: SettingKey,
}

/// Failure reported back to the agent as data.
///
/// `status` is absent when the controller was never reached or its
/// answer could not be read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorEnvelope {
    pub error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub detail: Value,
}

/// Outcome of one forwarded call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Invocation {
    /// Controller answered with a 2xx JSON body, relayed untouched.
    Relayed(Value),
    Failed(ErrorEnvelope),
}

impl Invocation {
    /// The controller could not be reached or its body could not be read.
    pub fn transport_failure(detail: impl Into<String>) -> Self {
        Invocation::Failed(ErrorEnvelope {
            error: true,
            status: None,
            detail: Value::String(detail.into()),
        })
    }

    /// The controller answered with a non-2xx status.
    ///
    /// `detail` comes from the body's `detail` field when the body is a
    /// JSON object carrying one, otherwise from `reason`.
    #[must_use]
    pub fn http_failure(status: u16, reason: &str, body: &Value) -> Self {
        let detail = body
            .as_object()
            .and_then(|obj| obj.get("detail"))
            .cloned()
            .unwrap_or_else(|| Value::String(reason.to_string()));
        Invocation::Failed(ErrorEnvelope {
            error: true,
            status: Some(status),
            detail,
        })
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Invocation::Failed(_))
    }

    /// Render as two-space indented JSON, the text handed to the agent.
    #[must_use]
    pub fn to_text(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| {
            serde_json::json!({
                "error": true,
                "detail": format!("failed to serialize result: {e}"),
            })
            .to_string()
        })
    }
}
