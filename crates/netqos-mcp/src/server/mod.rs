//! Gateway server: HTTP transport plus the background expiry sweeper.

pub mod consent;
pub mod oauth;
pub mod transport;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::auth::AuthService;
use crate::client::NetQosClient;
use crate::tools::{self, QosTool, ToolContext};

/// The NetQoS MCP gateway.
pub struct GatewayServer {
    /// Tool execution context.
    ctx: ToolContext,

    /// Registered tools.
    tools: Vec<Box<dyn QosTool>>,

    /// Credential subsystem.
    auth: AuthService,
}

impl GatewayServer {
    /// Create a new gateway server.
    #[must_use]
    pub fn new(client: NetQosClient, auth: AuthService) -> Self {
        let ctx = ToolContext::new(Arc::new(client));
        let tools = tools::register_all_tools();

        Self { ctx, tools, auth }
    }

    /// Run the HTTP server until shutdown.
    ///
    /// Starts the expiry sweeper for the lifetime of the server and stops it
    /// on the way out.
    ///
    /// # Errors
    ///
    /// Returns error on bind or server failure.
    pub async fn run_http(self, port: u16) -> anyhow::Result<()> {
        tracing::info!("Registered {} tools", self.tools.len());

        let sweeper = self.auth.start_sweeper();
        let router = transport::create_router(self.tools, self.ctx, self.auth);
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        tracing::info!("HTTP server listening on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

        sweeper.stop();
        tracing::info!("HTTP server shut down");
        Ok(())
    }
}

impl std::fmt::Debug for GatewayServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayServer").field("tools", &self.tools.len()).finish()
    }
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.expect("Failed to install CTRL+C handler");
    tracing::info!("Received shutdown signal");
}
