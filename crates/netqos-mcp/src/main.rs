//! NetQoS MCP Gateway - Entry Point

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use netqos_mcp::config::{Config, OAuthConfig, api, oauth};
use netqos_mcp::{AuthService, GatewayServer, NetQosClient};

#[derive(Parser, Debug)]
#[command(name = "netqos-mcp")]
#[command(about = "MCP gateway for the NetQoS measurement API")]
#[command(version)]
struct Cli {
    /// HTTP server port
    #[arg(long, default_value = "4000", env = "PORT")]
    port: u16,

    /// Base URL of the NetQoS measurement API
    #[arg(long, default_value = api::BASE_URL, env = "NETQOS_API_URL")]
    api_url: String,

    /// OAuth client identity
    #[arg(long, default_value = oauth::DEFAULT_CLIENT_ID, env = "OAUTH_CLIENT_ID")]
    oauth_client_id: String,

    /// OAuth client secret
    #[arg(long, env = "OAUTH_CLIENT_SECRET")]
    oauth_client_secret: String,

    /// Symmetric secret for signing access tokens
    #[arg(long, env = "JWT_SECRET")]
    jwt_secret: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        api_url = %cli.api_url,
        "Starting NetQoS MCP gateway"
    );

    let config = Config::new(
        cli.api_url,
        OAuthConfig {
            client_id: cli.oauth_client_id,
            client_secret: cli.oauth_client_secret,
            jwt_secret: cli.jwt_secret,
            code_lifetime: oauth::AUTH_CODE_LIFETIME,
            token_lifetime: oauth::ACCESS_TOKEN_LIFETIME,
            sweep_interval: oauth::SWEEP_INTERVAL,
        },
    );

    let client = NetQosClient::new(&config)?;
    let auth = AuthService::new(&config.oauth)?;
    let server = GatewayServer::new(client, auth);

    tracing::info!(port = cli.port, "Running in HTTP mode");
    server.run_http(cli.port).await?;

    Ok(())
}
