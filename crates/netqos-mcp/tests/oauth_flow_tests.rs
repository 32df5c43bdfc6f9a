//! Integration tests for the OAuth 2.0 flow over the HTTP router:
//! consent → authorization code → token exchange → gated requests.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use base64::Engine;
use serde_json::json;
use tower::ServiceExt;

use netqos_mcp::auth::AuthService;
use netqos_mcp::client::NetQosClient;
use netqos_mcp::config::Config;
use netqos_mcp::server::transport::create_router;
use netqos_mcp::tools::{self, ToolContext};

const CLIENT_ID: &str = "test-client";
const CLIENT_SECRET: &str = "test-secret";
const REDIRECT_URI: &str = "https://claude.ai/api/mcp/auth_callback";

fn build_test_router() -> (axum::Router, AuthService) {
    let config = Config::for_testing("http://unused.localhost");
    let client = NetQosClient::new(&config).unwrap();
    let auth = AuthService::new(&config.oauth).unwrap();
    let ctx = ToolContext::new(Arc::new(client));

    (create_router(tools::register_all_tools(), ctx, auth.clone()), auth)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn form_request(uri: &str, pairs: &[(&str, &str)]) -> Request<Body> {
    let body = serde_urlencoded::to_string(pairs).unwrap();
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

/// Drive the consent step and return the issued authorization code.
async fn obtain_code(app: &axum::Router, state: &str) -> String {
    let response = app
        .clone()
        .oneshot(form_request(
            "/authorize",
            &[
                ("client_id", CLIENT_ID),
                ("redirect_uri", REDIRECT_URI),
                ("state", state),
                ("action", "allow"),
            ],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    let location = response.headers().get(header::LOCATION).unwrap().to_str().unwrap();
    let url = url::Url::parse(location).unwrap();
    url.query_pairs()
        .find(|(key, _)| key == "code")
        .map(|(_, value)| value.into_owned())
        .expect("redirect carries an authorization code")
}

async fn exchange_code(app: &axum::Router, code: &str) -> axum::response::Response {
    app.clone()
        .oneshot(form_request(
            "/token",
            &[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("client_id", CLIENT_ID),
                ("client_secret", CLIENT_SECRET),
            ],
        ))
        .await
        .unwrap()
}

// ─── Consent page ────────────────────────────────────────────────────────────

#[tokio::test]
async fn authorize_get_renders_consent_page() {
    let (app, _) = build_test_router();

    let uri = format!(
        "/authorize?client_id={CLIENT_ID}&redirect_uri={REDIRECT_URI}&response_type=code&state=xyz"
    );
    let response = app.oneshot(Request::get(&uri).body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("Approve"));
    assert!(html.contains("Deny"));
    assert!(html.contains(CLIENT_ID));
}

#[tokio::test]
async fn authorize_get_rejects_missing_parameters() {
    let (app, _) = build_test_router();

    let response = app
        .oneshot(Request::get("/authorize?client_id=x").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "invalid_request");
}

#[tokio::test]
async fn authorize_get_rejects_wrong_response_type() {
    let (app, _) = build_test_router();

    let uri =
        format!("/authorize?client_id={CLIENT_ID}&redirect_uri={REDIRECT_URI}&response_type=token");
    let response = app.oneshot(Request::get(&uri).body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn denied_consent_redirects_with_access_denied() {
    let (app, _) = build_test_router();

    let response = app
        .oneshot(form_request(
            "/authorize",
            &[
                ("client_id", CLIENT_ID),
                ("redirect_uri", REDIRECT_URI),
                ("state", "xyz"),
                ("action", "deny"),
            ],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    let location = response.headers().get(header::LOCATION).unwrap().to_str().unwrap();
    assert!(location.contains("error=access_denied"));
    assert!(location.contains("state=xyz"));
    assert!(!location.contains("code="));
}

#[tokio::test]
async fn approved_consent_redirects_with_code_and_state() {
    let (app, auth) = build_test_router();

    let code = obtain_code(&app, "opaque-state").await;
    assert!(!code.is_empty());
    assert!(auth.store.get_code(&code).is_some());
}

// ─── Token exchange ──────────────────────────────────────────────────────────

#[tokio::test]
async fn token_exchange_issues_bearer_token() {
    let (app, _) = build_test_router();

    let code = obtain_code(&app, "s").await;
    let response = exchange_code(&app, &code).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).unwrap().to_str().unwrap(),
        "no-store"
    );

    let json = body_json(response).await;
    assert_eq!(json["token_type"], "Bearer");
    assert_eq!(json["expires_in"], 86_400);
    assert!(json["access_token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn token_exchange_accepts_basic_auth_credentials() {
    let (app, _) = build_test_router();

    let code = obtain_code(&app, "s").await;
    let encoded = base64::engine::general_purpose::STANDARD
        .encode(format!("{CLIENT_ID}:{CLIENT_SECRET}"));
    let body = serde_urlencoded::to_string([
        ("grant_type", "authorization_code"),
        ("code", code.as_str()),
    ])
    .unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::post("/token")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .header(header::AUTHORIZATION, format!("Basic {encoded}"))
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["access_token"].as_str().is_some());
}

#[tokio::test]
async fn token_exchange_rejects_wrong_grant_type() {
    let (app, _) = build_test_router();

    let response = app
        .oneshot(form_request(
            "/token",
            &[
                ("grant_type", "client_credentials"),
                ("client_id", CLIENT_ID),
                ("client_secret", CLIENT_SECRET),
            ],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "unsupported_grant_type");
}

#[tokio::test]
async fn token_exchange_rejects_missing_parameters() {
    let (app, _) = build_test_router();

    let response = app
        .oneshot(form_request("/token", &[("grant_type", "authorization_code")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "invalid_request");
}

#[tokio::test]
async fn token_exchange_rejects_bad_client_secret() {
    let (app, _) = build_test_router();

    let code = obtain_code(&app, "s").await;
    let response = app
        .clone()
        .oneshot(form_request(
            "/token",
            &[
                ("grant_type", "authorization_code"),
                ("code", &code),
                ("client_id", CLIENT_ID),
                ("client_secret", "wrong-secret"),
            ],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "invalid_client");
}

#[tokio::test]
async fn token_exchange_rejects_replayed_code() {
    let (app, _) = build_test_router();

    let code = obtain_code(&app, "s").await;
    assert_eq!(exchange_code(&app, &code).await.status(), StatusCode::OK);

    let replay = exchange_code(&app, &code).await;
    assert_eq!(replay.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(replay).await["error"], "invalid_grant");
}

#[tokio::test]
async fn token_exchange_rejects_unknown_code() {
    let (app, _) = build_test_router();

    let response = exchange_code(&app, "completely-unknown-code").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "invalid_grant");
}

#[tokio::test]
async fn failed_client_auth_leaves_code_redeemable() {
    let (app, _) = build_test_router();

    let code = obtain_code(&app, "s").await;

    // A wrong-secret attempt must not consume the code.
    let response = app
        .clone()
        .oneshot(form_request(
            "/token",
            &[
                ("grant_type", "authorization_code"),
                ("code", &code),
                ("client_id", CLIENT_ID),
                ("client_secret", "wrong-secret"),
            ],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    assert_eq!(exchange_code(&app, &code).await.status(), StatusCode::OK);
}

// ─── Request gate ────────────────────────────────────────────────────────────

#[tokio::test]
async fn gated_routes_require_bearer_token() {
    let (app, _) = build_test_router();

    let response = app
        .clone()
        .oneshot(Request::get("/mcp/tools").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(
            Request::get("/mcp/tools")
                .header(header::AUTHORIZATION, "Bearer not-a-real-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn full_flow_reaches_tool_listing() {
    let (app, _) = build_test_router();

    let code = obtain_code(&app, "s").await;
    let token_response = exchange_code(&app, &code).await;
    let access_token =
        body_json(token_response).await["access_token"].as_str().unwrap().to_string();

    let response = app
        .oneshot(
            Request::get("/mcp/tools")
                .header(header::AUTHORIZATION, format!("Bearer {access_token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let tools = json["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 6);
    assert!(tools.iter().any(|tool| tool["name"] == "get_kpi_data"));
    assert!(tools.iter().all(|tool| tool["inputSchema"]["type"] == "object"));
}

#[tokio::test]
async fn revoked_token_is_rejected_at_the_gate() {
    let (app, auth) = build_test_router();

    let code = obtain_code(&app, "s").await;
    let access_token = body_json(exchange_code(&app, &code).await).await["access_token"]
        .as_str()
        .unwrap()
        .to_string();

    auth.store.remove_token(&access_token);

    let response = app
        .oneshot(
            Request::get("/mcp/tools")
                .header(header::AUTHORIZATION, format!("Bearer {access_token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ─── Open endpoints ──────────────────────────────────────────────────────────

#[tokio::test]
async fn health_and_info_stay_open() {
    let (app, _) = build_test_router();

    let response = app
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["timestamp"].as_str().is_some());

    let response =
        app.oneshot(Request::get("/mcp").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["protocol"], "mcp-remote");
    assert_eq!(json["capabilities"]["tools"], json!(true));
}

#[tokio::test]
async fn responses_carry_security_headers() {
    let (app, _) = build_test_router();

    let response =
        app.oneshot(Request::get("/health").body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.headers().get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(response.headers().get("x-frame-options").unwrap(), "DENY");
}
