//! NetQoS MCP Gateway
//!
//! An MCP (Model Context Protocol) gateway that exposes a fixed set of
//! read-only query tools against the NetQoS measurement API, gated by an
//! OAuth 2.0 authorization-code flow.
//!
//! # Features
//!
//! - **6 MCP tools**: locations, KPI data, operator scoring, operators,
//!   coverage, analytics
//! - **OAuth 2.0**: one-time authorization codes and signed bearer tokens
//!   backed by a concurrency-safe in-memory store with a background expiry
//!   sweeper
//! - **Async-first**: Built on Tokio and axum
//!
//! # Example
//!
//! ```no_run
//! use netqos_mcp::{auth::AuthService, client::NetQosClient, config::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let client = NetQosClient::new(&config)?;
//!     let auth = AuthService::new(&config.oauth)?;
//!
//!     // Hand both to the gateway server
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod server;
pub mod tools;

pub use auth::AuthService;
pub use client::NetQosClient;
pub use config::Config;
pub use error::{ClientError, ToolError};
pub use server::GatewayServer;
