//! Error types for the NetQoS MCP gateway.
//!
//! Uses `thiserror` for structured error handling with automatic `From`
//! implementations. OAuth protocol outcomes (invalid client, invalid grant,
//! invalid token) are not errors: the credential subsystem reports them as
//! plain results and the HTTP layer translates them into OAuth responses.

/// Errors from the downstream HTTP client layer.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// HTTP transport error (connection, DNS, TLS, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Non-success HTTP status from the NetQoS API
    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },
}

impl ClientError {
    /// Create an unexpected-status error.
    #[must_use]
    pub fn unexpected_status(status: u16, message: impl Into<String>) -> Self {
        Self::UnexpectedStatus { status, message: message.into() }
    }
}

/// Errors from MCP tool execution.
#[derive(thiserror::Error, Debug)]
pub enum ToolError {
    /// Error from the downstream API client, surfaced as an opaque message.
    /// Downstream failures are terminal: they are never retried.
    #[error("API error: {0}")]
    Client(#[from] ClientError),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Request named a tool that is not registered
    #[error("Tool not found: {0}")]
    UnknownTool(String),
}

impl ToolError {
    /// Create an unknown-tool error.
    #[must_use]
    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool(name.into())
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_is_opaque_through_tool_error() {
        let err = ToolError::from(ClientError::unexpected_status(502, "bad gateway"));
        let message = err.to_string();
        assert!(message.starts_with("API error:"));
        assert!(message.contains("502"));
    }

    #[test]
    fn test_unknown_tool_message() {
        let err = ToolError::unknown_tool("get_weather");
        assert_eq!(err.to_string(), "Tool not found: get_weather");
    }
}
