//! NetQoS measurement API client.
//!
//! Thin read-only proxy: every tool call becomes a single
//! `GET <base>/<endpoint>?<args>` with a 30-second timeout. Downstream
//! failures are wrapped into an opaque error and never retried.

use reqwest::Client;

use crate::config::{Config, api};
use crate::error::{ClientError, ClientResult};

/// HTTP client for the NetQoS measurement API.
#[derive(Debug, Clone)]
pub struct NetQosClient {
    client: Client,
    api_base_url: String,
}

impl NetQosClient {
    /// Create a new client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if HTTP client initialization fails.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            "application/json".parse().expect("valid accept header"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(api::MAX_KEEPALIVE)
            .pool_idle_timeout(api::KEEPALIVE_EXPIRY)
            .gzip(true)
            .build()?;

        Ok(Self { client, api_base_url: config.api_base_url.clone() })
    }

    /// Query a NetQoS endpoint with the given tool arguments.
    ///
    /// Arguments must be a JSON object (or null); scalar members are
    /// flattened into query parameters. The response is returned as raw
    /// JSON; the gateway does not interpret measurement payloads.
    pub async fn query(
        &self,
        endpoint: &str,
        args: &serde_json::Value,
    ) -> ClientResult<serde_json::Value> {
        let url = format!("{}/{}", self.api_base_url, endpoint);
        let params = flatten_args(args);

        let response = self.client.get(&url).query(&params).send().await?;
        let response = self.handle_response(response).await?;

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Map non-success statuses into an error carrying the response body.
    async fn handle_response(&self, response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        Err(ClientError::unexpected_status(status.as_u16(), message))
    }
}

/// Flatten a JSON argument object into query parameters.
///
/// Strings pass through unquoted; other scalars are rendered with their JSON
/// representation. Nested arrays/objects are rendered as compact JSON so the
/// downstream API decides what to do with them.
fn flatten_args(args: &serde_json::Value) -> Vec<(String, String)> {
    let Some(object) = args.as_object() else {
        return Vec::new();
    };

    object
        .iter()
        .map(|(key, value)| {
            let rendered = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.clone(), rendered)
        })
        .collect()
}
