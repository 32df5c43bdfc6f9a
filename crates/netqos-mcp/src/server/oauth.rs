//! OAuth 2.0 endpoint handlers: authorization and token exchange.
//!
//! Implements the authorization-code grant (RFC 6749) for the single
//! configured client. The credential subsystem reports outcomes as plain
//! results; these handlers translate them into OAuth error responses:
//! `invalid_request`, `invalid_client`, `invalid_grant`,
//! `unsupported_grant_type`.

use std::sync::Arc;

use axum::{
    Form, Json,
    extract::{Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use base64::Engine;
use serde::Deserialize;

use super::consent;
use super::transport::AppState;

// ─── Authorization Endpoint ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AuthorizeQuery {
    pub client_id: Option<String>,
    pub redirect_uri: Option<String>,
    pub response_type: Option<String>,
    pub state: Option<String>,
}

/// `GET /authorize`
///
/// Validates the request parameters and renders the consent page. The
/// supplied client identity is not checked against the configured pair here:
/// that happens at the token-exchange boundary.
pub async fn handle_authorize_get(Query(query): Query<AuthorizeQuery>) -> Response {
    let (Some(client_id), Some(redirect_uri)) =
        (query.client_id.as_deref(), query.redirect_uri.as_deref())
    else {
        return oauth_error(
            StatusCode::BAD_REQUEST,
            "invalid_request",
            "Missing or invalid parameters",
        );
    };

    if query.response_type.as_deref() != Some("code") {
        return oauth_error(
            StatusCode::BAD_REQUEST,
            "invalid_request",
            "response_type must be 'code'",
        );
    }

    Html(consent::render_consent_page(
        client_id,
        redirect_uri,
        query.state.as_deref().unwrap_or(""),
    ))
    .into_response()
}

#[derive(Debug, Deserialize)]
pub struct ConsentForm {
    pub client_id: String,
    pub redirect_uri: String,
    #[serde(default)]
    pub state: String,
    pub action: String,
}

/// `POST /authorize`
///
/// Consent decision. Deny redirects back with `error=access_denied`; approve
/// issues an authorization code and redirects back with it.
pub async fn handle_authorize_post(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ConsentForm>,
) -> Response {
    let Ok(mut redirect_url) = url::Url::parse(&form.redirect_uri) else {
        return oauth_error(
            StatusCode::BAD_REQUEST,
            "invalid_request",
            "redirect_uri must be an absolute URL",
        );
    };

    if form.action != "allow" {
        tracing::info!(client_id = %form.client_id, "Authorization denied by user");
        redirect_url.query_pairs_mut().append_pair("error", "access_denied");
        if !form.state.is_empty() {
            redirect_url.query_pairs_mut().append_pair("state", &form.state);
        }
        return found(redirect_url);
    }

    let code = state.auth.codes.issue(&form.client_id);
    tracing::info!(client_id = %form.client_id, "Authorization code issued");

    redirect_url.query_pairs_mut().append_pair("code", &code);
    if !form.state.is_empty() {
        redirect_url.query_pairs_mut().append_pair("state", &form.state);
    }
    found(redirect_url)
}

// ─── Token Endpoint ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub grant_type: Option<String>,
    pub code: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

/// `POST /token`
///
/// Exchange a one-time authorization code for a bearer access token. Client
/// credentials are accepted in the form body or as an HTTP Basic header.
pub async fn handle_token(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<TokenRequest>,
) -> Response {
    let credentials = match (form.client_id.clone(), form.client_secret.clone()) {
        (Some(id), Some(secret)) => Some((id, secret)),
        _ => basic_credentials(&headers),
    };

    if form.grant_type.as_deref() != Some("authorization_code") {
        return oauth_error(
            StatusCode::BAD_REQUEST,
            "unsupported_grant_type",
            "Only authorization_code grant type is supported",
        );
    }

    let (Some(code), Some((client_id, client_secret))) = (form.code.as_deref(), credentials)
    else {
        return oauth_error(
            StatusCode::BAD_REQUEST,
            "invalid_request",
            "Missing required parameters",
        );
    };

    if !state.auth.credentials.verify(&client_id, &client_secret) {
        tracing::warn!(client_id = %client_id, "Token request with invalid client credentials");
        return oauth_error(
            StatusCode::UNAUTHORIZED,
            "invalid_client",
            "Invalid client credentials",
        );
    }

    if !state.auth.codes.verify_and_consume(code, &client_id) {
        return oauth_error(
            StatusCode::BAD_REQUEST,
            "invalid_grant",
            "Invalid or expired authorization code",
        );
    }

    match state.auth.tokens.issue(&client_id) {
        Ok(access_token) => {
            tracing::info!(client_id = %client_id, "Access token issued");
            token_success(&access_token, state.auth.token_lifetime().as_secs())
        }
        Err(error) => {
            tracing::error!(error = %error, "Failed to sign access token");
            oauth_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "server_error",
                "Token issuance failed",
            )
        }
    }
}

/// Extract client credentials from an `Authorization: Basic` header.
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let encoded = value.strip_prefix("Basic ")?;
    let decoded = base64::engine::general_purpose::STANDARD.decode(encoded).ok()?;
    let text = String::from_utf8(decoded).ok()?;
    let (id, secret) = text.split_once(':')?;
    Some((id.to_string(), secret.to_string()))
}

/// Build a token response with the OAuth 2.0 cache headers (RFC 6749 §5.1).
fn token_success(access_token: &str, expires_in: u64) -> Response {
    let mut response = Json(serde_json::json!({
        "access_token": access_token,
        "token_type": "Bearer",
        "expires_in": expires_in
    }))
    .into_response();

    let headers = response.headers_mut();
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    response
}

fn oauth_error(status: StatusCode, error: &str, description: &str) -> Response {
    (
        status,
        Json(serde_json::json!({
            "error": error,
            "error_description": description
        })),
    )
        .into_response()
}

fn found(url: url::Url) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, url.to_string())]).into_response()
}
