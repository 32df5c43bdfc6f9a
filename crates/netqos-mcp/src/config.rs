//! Configuration for the NetQoS MCP gateway.

use std::time::Duration;

/// Downstream API configuration constants.
pub mod api {
    use std::time::Duration;

    /// Default base URL for the NetQoS measurement API.
    pub const BASE_URL: &str = "http://localhost:8000/api/mcp";

    /// Request timeout for downstream queries.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Maximum keepalive connections.
    pub const MAX_KEEPALIVE: usize = 10;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);
}

/// OAuth lifetime constants.
pub mod oauth {
    use std::time::Duration;

    /// Authorization code lifetime: 10 minutes.
    pub const AUTH_CODE_LIFETIME: Duration = Duration::from_secs(10 * 60);

    /// Access token lifetime: 24 hours.
    pub const ACCESS_TOKEN_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

    /// Interval between expiry sweeps: hourly.
    pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

    /// Default client identity when none is configured.
    pub const DEFAULT_CLIENT_ID: &str = "netqos-mcp-client";
}

/// OAuth configuration: the static client credential pair, the token signing
/// secret, and the lifetime knobs.
///
/// The authorization-code and access-token lifetimes feed two independent
/// expiry clocks each (store-tracked and, for tokens, claims-embedded); both
/// clocks derive from the same duration here.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    /// Configured client identity.
    pub client_id: String,

    /// Configured client secret.
    pub client_secret: String,

    /// Symmetric secret for signing access tokens.
    pub jwt_secret: String,

    /// Authorization code validity window.
    pub code_lifetime: Duration,

    /// Access token validity window.
    pub token_lifetime: Duration,

    /// Interval between background expiry sweeps.
    pub sweep_interval: Duration,
}

impl OAuthConfig {
    /// Reject a missing or placeholder signing secret.
    ///
    /// This is the only fatal misconfiguration: a gateway that signs tokens
    /// with a known default must not start.
    ///
    /// # Errors
    ///
    /// Returns an error when the secret is empty or left at a placeholder.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.jwt_secret.is_empty() || self.jwt_secret == "change-me-in-production" {
            anyhow::bail!("JWT_SECRET must be set to a non-placeholder value");
        }
        Ok(())
    }
}

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the NetQoS measurement API.
    pub api_base_url: String,

    /// Downstream request timeout.
    pub request_timeout: Duration,

    /// Downstream connection timeout.
    pub connect_timeout: Duration,

    /// OAuth settings.
    pub oauth: OAuthConfig,
}

impl Config {
    /// Create a new configuration with the given downstream base URL and
    /// OAuth settings.
    #[must_use]
    pub fn new(api_base_url: String, oauth: OAuthConfig) -> Self {
        Self {
            api_base_url,
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            oauth,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when `JWT_SECRET` is unset or a placeholder.
    pub fn from_env() -> anyhow::Result<Self> {
        let api_base_url =
            std::env::var("NETQOS_API_URL").unwrap_or_else(|_| api::BASE_URL.to_string());
        let client_id = std::env::var("OAUTH_CLIENT_ID")
            .unwrap_or_else(|_| oauth::DEFAULT_CLIENT_ID.to_string());
        let client_secret = std::env::var("OAUTH_CLIENT_SECRET").unwrap_or_default();
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_default();

        let config = Self::new(
            api_base_url,
            OAuthConfig {
                client_id,
                client_secret,
                jwt_secret,
                code_lifetime: oauth::AUTH_CODE_LIFETIME,
                token_lifetime: oauth::ACCESS_TOKEN_LIFETIME,
                sweep_interval: oauth::SWEEP_INTERVAL,
            },
        );
        config.oauth.validate()?;
        Ok(config)
    }

    /// Create a test configuration pointed at a mock downstream server.
    #[must_use]
    pub fn for_testing(api_base_url: &str) -> Self {
        Self {
            api_base_url: api_base_url.to_string(),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            oauth: OAuthConfig {
                client_id: "test-client".to_string(),
                client_secret: "test-secret".to_string(),
                jwt_secret: "unit-test-signing-secret".to_string(),
                code_lifetime: oauth::AUTH_CODE_LIFETIME,
                token_lifetime: oauth::ACCESS_TOKEN_LIFETIME,
                sweep_interval: Duration::from_secs(1),
            },
        }
    }
}
