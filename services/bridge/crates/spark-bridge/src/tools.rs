//! MCP tool implementations for the DGX Spark bridge.
//!
//! Exposes exactly 3 tools via the `rmcp` `#[tool]` macro:
//!   - `dgx_spark_exec`     -> `POST /run_command`
//!   - `dgx_spark_package`  -> `POST /manage_package`
//!   - `dgx_spark_settings` -> `POST /get_settings`
//!
//! Tools never fail at the MCP level: controller errors come back as an
//! `{"error": true, ...}` JSON document in the text content. Invalid
//! enum values are rejected by parameter deserialization before any
//! request is made.

use std::sync::Arc;

use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use serde::Serialize;

use spark_common::{GetSettingRequest, ManagePackageRequest, Operation, RunCommandRequest};

use crate::client::ControllerClient;

// ===================================================================
// SparkTools — the MCP server handler
// ===================================================================

/// MCP server handler exposing the controller's three operations.
///
/// Cheap to clone; every session shares the same [`ControllerClient`].
#[derive(Clone)]
pub struct SparkTools {
    client: Arc<ControllerClient>,
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for SparkTools {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SparkTools")
            .field("base_url", &self.client.base_url())
            .finish_non_exhaustive()
    }
}

impl SparkTools {
    #[must_use]
    pub fn new(client: Arc<ControllerClient>) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }

    /// Tools registered with the router, in registration order.
    #[must_use]
    pub fn list_tools(&self) -> Vec<rmcp::model::Tool> {
        self.tool_router.list_all()
    }

    async fn forward<B: Serialize>(&self, operation: Operation, body: &B) -> String {
        let invocation = self.client.invoke(operation, body).await;
        if invocation.is_error() {
            tracing::info!(tool = operation.name(), "tool call returned an error envelope");
        } else {
            tracing::debug!(tool = operation.name(), "tool call relayed");
        }
        invocation.to_text()
    }
}

// -------------------------------------------------------------------
// Tool implementations
// -------------------------------------------------------------------

#[tool_router]
impl SparkTools {
    /// Run a shell command in the controller's GPU sandbox.
    #[tool(
        name = "dgx_spark_exec",
        title = "DGX Spark Exec",
        description = "Execute a shell command inside a sandboxed Docker container on the DGX Spark host. \
            The container has GPU access but no network. Use for compiling/running CUDA code or diagnostics."
    )]
    pub async fn execute_command(&self, params: Parameters<RunCommandRequest>) -> String {
        self.forward(Operation::ExecuteCommand, &params.0).await
    }

    #[tool(
        name = "dgx_spark_package",
        title = "DGX Spark Package",
        description = "Install or remove a system package (apt) on the DGX Spark host."
    )]
    pub async fn manage_package(&self, params: Parameters<ManagePackageRequest>) -> String {
        self.forward(Operation::ManagePackage, &params.0).await
    }

    #[tool(
        name = "dgx_spark_settings",
        title = "DGX Spark Settings",
        description = "Retrieve a system setting from the DGX Spark host \
            (CUDA version, OS name, or home directory)."
    )]
    pub async fn get_setting(&self, params: Parameters<GetSettingRequest>) -> String {
        self.forward(Operation::GetSetting, &params.0).await
    }
}

// -------------------------------------------------------------------
// ServerHandler implementation (via tool_handler macro)
// -------------------------------------------------------------------

#[tool_handler]
impl ServerHandler for SparkTools {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "DGX Spark: run sandboxed GPU commands, manage apt packages \
                 and read host settings through the platform controller. \
                 Failures are returned as JSON with \"error\": true."
                    .into(),
            ),
            ..Default::default()
        }
    }
}
