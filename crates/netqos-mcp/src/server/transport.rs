//! HTTP transport: router, request gate, and MCP endpoints.
//!
//! Every protected route passes the bearer-token gate before reaching its
//! handler. The OAuth endpoints and the health/info endpoints stay open.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Request, State},
    http::{HeaderValue, StatusCode, header},
    middleware::{self, Next},
    response::{
        IntoResponse, Response,
        sse::{Event, Sse},
    },
    routing::{get, post},
};
use axum_extra::TypedHeader;
use axum_extra::headers::{Authorization, authorization::Bearer};
use futures::stream;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use super::oauth;
use crate::auth::AuthService;
use crate::error::{ToolError, ToolResult};
use crate::tools::{QosTool, ToolContext, find_tool};

/// Shared state for HTTP handlers.
pub struct AppState {
    /// Registered tools.
    pub tools: Vec<Box<dyn QosTool>>,

    /// Tool execution context.
    pub ctx: ToolContext,

    /// Credential subsystem.
    pub auth: AuthService,
}

/// Identity attached to a request that passed the bearer gate.
#[derive(Debug, Clone)]
pub struct AuthenticatedClient {
    /// Client identity from the verified token claims.
    pub client_id: String,
}

/// Tool info for the tool listing response.
#[derive(Debug, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}

/// Create the HTTP router.
pub fn create_router(tools: Vec<Box<dyn QosTool>>, ctx: ToolContext, auth: AuthService) -> Router {
    let state = Arc::new(AppState { tools, ctx, auth });

    let protected = Router::new()
        .route("/mcp/tools", get(handle_tools_list))
        .route("/mcp/call-tool", post(handle_call_tool))
        .route("/mcp/sse", post(handle_call_tool_sse))
        .route_layer(middleware::from_fn_with_state(Arc::clone(&state), require_bearer));

    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route("/mcp", get(server_info))
        .route("/authorize", get(oauth::handle_authorize_get).post(oauth::handle_authorize_post))
        .route("/token", post(oauth::handle_token))
        .merge(protected)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bearer-token gate applied to every protected route.
async fn require_bearer(
    State(state): State<Arc<AppState>>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(TypedHeader(Authorization(bearer))) = bearer else {
        return unauthorized("Unauthorized");
    };

    let verification = state.auth.tokens.verify(bearer.token());
    if !verification.valid {
        tracing::debug!("Rejected request with invalid bearer token");
        return unauthorized("Invalid token");
    }
    if let Some(client_id) = verification.client_id {
        request.extensions_mut().insert(AuthenticatedClient { client_id });
    }

    next.run(request).await
}

fn unauthorized(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(serde_json::json!({ "error": message }))).into_response()
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// `GET /mcp`
///
/// Server identity and capabilities.
async fn server_info() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": "NetQoS MCP Gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "protocol": "mcp-remote",
        "capabilities": {
            "tools": true
        }
    }))
}

/// `GET /mcp/tools`
///
/// The static tool list.
async fn handle_tools_list(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let tools: Vec<ToolInfo> = state
        .tools
        .iter()
        .map(|tool| ToolInfo {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            input_schema: tool.input_schema(),
        })
        .collect();

    Json(serde_json::json!({ "tools": tools }))
}

#[derive(Debug, Deserialize)]
pub struct CallToolRequest {
    pub name: Option<String>,
    #[serde(default)]
    pub arguments: serde_json::Value,
}

/// `POST /mcp/call-tool`
///
/// Proxy one tool invocation downstream.
async fn handle_call_tool(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CallToolRequest>,
) -> Response {
    let Some(name) = request.name.as_deref() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "Tool name is required" })),
        )
            .into_response();
    };

    match execute_tool(&state, name, request.arguments).await {
        Ok(result) => Json(serde_json::json!({
            "content": [{
                "type": "text",
                "text": serde_json::to_string_pretty(&result).unwrap_or_default()
            }]
        }))
        .into_response(),
        Err(error @ ToolError::UnknownTool(_)) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": error.to_string() })),
        )
            .into_response(),
        Err(error) => {
            tracing::error!(tool = %name, error = %error, "Tool execution failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": error.to_string() })),
            )
                .into_response()
        }
    }
}

/// `POST /mcp/sse`
///
/// Same proxy, delivered as a one-shot SSE stream.
async fn handle_call_tool_sse(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CallToolRequest>,
) -> Response {
    let payload = match request.name.as_deref() {
        None => serde_json::json!({ "type": "error", "error": "Tool name is required" }),
        Some(name) => match execute_tool(&state, name, request.arguments).await {
            Ok(result) => serde_json::json!({ "type": "result", "data": result }),
            Err(error) => serde_json::json!({ "type": "error", "error": error.to_string() }),
        },
    };

    let stream = stream::once(async move {
        Ok::<_, Infallible>(Event::default().data(payload.to_string()))
    });

    Sse::new(stream).into_response()
}

/// Resolve a tool by name and run the downstream query.
async fn execute_tool(
    state: &AppState,
    name: &str,
    arguments: serde_json::Value,
) -> ToolResult<serde_json::Value> {
    let Some(tool) = find_tool(&state.tools, name) else {
        return Err(ToolError::unknown_tool(name));
    };

    tracing::info!(tool = %name, "Executing tool");
    tool.execute(&state.ctx, arguments).await
}
