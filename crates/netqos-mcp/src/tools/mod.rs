//! MCP tool registry.
//!
//! Every tool is a read-only query against one NetQoS endpoint, so a tool is
//! fully described by its name, LLM-facing description, input schema, and
//! downstream endpoint path; execution is the shared proxy path.

mod catalog;

pub use catalog::register_all_tools;

use std::sync::Arc;

use crate::client::NetQosClient;
use crate::error::ToolResult;

/// Tool execution context.
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// Downstream API client.
    pub client: Arc<NetQosClient>,
}

impl ToolContext {
    /// Create a new tool context.
    #[must_use]
    pub fn new(client: Arc<NetQosClient>) -> Self {
        Self { client }
    }
}

/// Trait for NetQoS MCP tools.
#[async_trait::async_trait]
pub trait QosTool: Send + Sync {
    /// Tool name (e.g., "get_locations").
    fn name(&self) -> &'static str;

    /// Tool description for the LLM.
    fn description(&self) -> &'static str;

    /// JSON Schema for input parameters.
    fn input_schema(&self) -> serde_json::Value;

    /// Downstream endpoint path this tool queries.
    fn endpoint(&self) -> &'static str;

    /// Execute the tool: proxy the arguments to the downstream endpoint and
    /// return the raw JSON result.
    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<serde_json::Value> {
        Ok(ctx.client.query(self.endpoint(), &input).await?)
    }
}

/// Find a registered tool by name.
#[must_use]
pub fn find_tool<'a>(tools: &'a [Box<dyn QosTool>], name: &str) -> Option<&'a dyn QosTool> {
    tools.iter().find(|tool| tool.name() == name).map(|tool| tool.as_ref())
}
