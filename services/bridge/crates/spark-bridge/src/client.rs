//! HTTP client for the DGX Spark Platform Controller.
//!
//! Every call is a single POST. Whatever happens (network failure, non-2xx
//! status, body that is not JSON) the outcome is an [`Invocation`]; nothing is
//! retried and no error escapes to the caller.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use spark_common::{Invocation, Operation, normalize_base_url};

/// Shared, stateless handle on the controller.
#[derive(Debug, Clone)]
pub struct ControllerClient {
    http: Client,
    base_url: String,
}

impl ControllerClient {
    /// Build a client with its own connection pool.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("spark-bridge/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self::with_client(http, base_url))
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(http: Client, base_url: impl AsRef<str>) -> Self {
        Self {
            http,
            base_url: normalize_base_url(base_url.as_ref()),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an operation, e.g. `http://127.0.0.1:5001/run_command`.
    #[must_use]
    pub fn endpoint(&self, operation: Operation) -> String {
        format!("{}{}", self.base_url, operation.path())
    }

    /// POST `body` as JSON to the operation's path and shape the answer.
    pub async fn invoke<B>(&self, operation: Operation, body: &B) -> Invocation
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(operation);
        tracing::debug!(tool = operation.name(), %url, "forwarding tool call");

        let response = match self.http.post(&url).json(body).send().await {
            Ok(response) => response,
            Err(e) => {
                let detail = error_chain(&e);
                tracing::warn!(tool = operation.name(), %url, error = %detail, "controller unreachable");
                return Invocation::transport_failure(detail);
            }
        };

        let status = response.status();
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                let detail = error_chain(&e);
                tracing::warn!(tool = operation.name(), %status, error = %detail, "failed to read controller response");
                return Invocation::transport_failure(detail);
            }
        };
        let decoded = match serde_json::from_slice::<Value>(&bytes) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(tool = operation.name(), %status, error = %e, "controller returned non-JSON body");
                return Invocation::transport_failure(format!(
                    "invalid JSON in controller response: {e}"
                ));
            }
        };

        if status.is_success() {
            return Invocation::Relayed(decoded);
        }

        tracing::warn!(tool = operation.name(), status = status.as_u16(), "controller returned error status");
        Invocation::http_failure(
            status.as_u16(),
            status.canonical_reason().unwrap_or_default(),
            &decoded,
        )
    }
}

/// Render an error and all of its sources on one line.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;
    use spark_common::{ControllerConfig, ErrorEnvelope, RunCommandRequest};

    fn exec_body(command: &str) -> RunCommandRequest {
        RunCommandRequest {
            command: command.to_string(),
        }
    }

    #[test]
    fn endpoint_joins_base_and_path() {
        let client = ControllerClient::new("http://spark:5001/").unwrap();
        assert_eq!(client.base_url(), "http://spark:5001");
        assert_eq!(
            client.endpoint(Operation::GetSetting),
            "http://spark:5001/get_settings"
        );
    }

    #[tokio::test]
    async fn success_body_is_relayed_verbatim() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/run_command")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"command": "nvidia-smi -L"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"stdout":"GPU 0: GB10\n","stderr":"","exit_code":0}"#)
            .create_async()
            .await;

        let client = ControllerClient::new(server.url()).unwrap();
        let inv = client
            .invoke(Operation::ExecuteCommand, &exec_body("nvidia-smi -L"))
            .await;

        mock.assert_async().await;
        assert_eq!(
            inv,
            Invocation::Relayed(json!({"stdout": "GPU 0: GB10\n", "stderr": "", "exit_code": 0}))
        );
    }

    #[tokio::test]
    async fn errors_embedded_in_success_body_pass_through() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/run_command")
            .with_status(200)
            .with_body(r#"{"error":"image missing","exit_code":125}"#)
            .create_async()
            .await;

        let client = ControllerClient::new(server.url()).unwrap();
        let inv = client.invoke(Operation::ExecuteCommand, &exec_body("ls")).await;
        assert_eq!(
            inv,
            Invocation::Relayed(json!({"error": "image missing", "exit_code": 125}))
        );
    }

    #[tokio::test]
    async fn server_error_uses_detail_field() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/run_command")
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(r#"{"detail":"boom"}"#)
            .create_async()
            .await;

        let client = ControllerClient::new(server.url()).unwrap();
        let inv = client.invoke(Operation::ExecuteCommand, &exec_body("ls")).await;
        assert_eq!(
            serde_json::to_value(&inv).unwrap(),
            json!({"error": true, "status": 500, "detail": "boom"})
        );
    }

    #[tokio::test]
    async fn error_status_with_html_body_has_no_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/run_command")
            .with_status(502)
            .with_body("<html>Bad Gateway</html>")
            .create_async()
            .await;

        let client = ControllerClient::new(server.url()).unwrap();
        let inv = client.invoke(Operation::ExecuteCommand, &exec_body("ls")).await;
        let value = serde_json::to_value(&inv).unwrap();

        assert_eq!(value["error"], json!(true));
        assert!(value.get("status").is_none());
        assert!(
            value["detail"]
                .as_str()
                .is_some_and(|d| d.starts_with("invalid JSON in controller response"))
        );
    }

    #[tokio::test]
    async fn not_found_with_json_array_uses_reason_phrase() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/get_settings")
            .with_status(404)
            .with_body(r#"["no", "such", "route"]"#)
            .create_async()
            .await;

        let client = ControllerClient::new(server.url()).unwrap();
        let inv = client
            .invoke(Operation::GetSetting, &json!({"setting_key": "os_name"}))
            .await;
        assert_eq!(
            inv,
            Invocation::Failed(ErrorEnvelope {
                error: true,
                status: Some(404),
                detail: json!("Not Found"),
            })
        );
    }

    #[tokio::test]
    async fn not_found_without_detail_field_uses_reason_phrase() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/manage_package")
            .with_status(404)
            .with_body(r#"{"message":"unknown package"}"#)
            .create_async()
            .await;

        let client = ControllerClient::new(server.url()).unwrap();
        let inv = client
            .invoke(
                Operation::ManagePackage,
                &json!({"action": "install", "package_name": "nope"}),
            )
            .await;
        assert_eq!(
            serde_json::to_value(&inv).unwrap(),
            json!({"error": true, "status": 404, "detail": "Not Found"})
        );
    }

    #[tokio::test]
    async fn non_json_success_body_is_a_transport_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/run_command")
            .with_status(200)
            .with_body("<html>proxy page</html>")
            .create_async()
            .await;

        let client = ControllerClient::new(server.url()).unwrap();
        let inv = client.invoke(Operation::ExecuteCommand, &exec_body("ls")).await;
        let Invocation::Failed(env) = inv else {
            panic!("expected failure");
        };
        assert!(env.error);
        assert_eq!(env.status, None);
        assert!(
            env.detail
                .as_str()
                .is_some_and(|d| d.starts_with("invalid JSON in controller response"))
        );
    }

    #[tokio::test]
    async fn connection_refused_has_no_status() {
        // Grab a free port, then close it so nothing is listening.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ControllerClient::new(format!("http://{addr}")).unwrap();
        let inv = client.invoke(Operation::ExecuteCommand, &exec_body("ls")).await;
        let value = serde_json::to_value(&inv).unwrap();

        assert_eq!(value["error"], json!(true));
        assert!(value.get("status").is_none());
        assert!(value["detail"].as_str().is_some_and(|d| !d.is_empty()));
    }

    #[tokio::test]
    async fn trailing_slashes_do_not_double_up() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/run_command")
            .with_status(200)
            .with_body(r#"{"ok":true}"#)
            .create_async()
            .await;

        let base = ControllerConfig::new(format!("{}///", server.url())).resolved_base_url();
        let client = ControllerClient::new(base).unwrap();
        assert_eq!(client.endpoint(Operation::ExecuteCommand), format!("{}/run_command", server.url()));

        let inv = client.invoke(Operation::ExecuteCommand, &exec_body("true")).await;
        mock.assert_async().await;
        assert_eq!(inv, Invocation::Relayed(json!({"ok": true})));
    }
}
