//! HTTP transport for the MCP server
//!
//! JSON-RPC over `POST /mcp`, plus a health probe for local testing.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::mcp::handler::McpHandler;
use crate::Result;

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub handler: McpHandler,
}

/// =============================
/// Health Endpoint
/// =============================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// MCP Endpoint
/// =============================

async fn mcp_endpoint(State(state): State<ApiState>, body: String) -> Response {
    match state.handler.handle_message(&body).await {
        Some(response) => (StatusCode::OK, Json(response)).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// =============================
/// Router
/// =============================

pub fn create_router(handler: McpHandler) -> Router {
    let state = ApiState { handler };

    Router::new()
        .route("/health", get(health))
        .route("/mcp", post(mcp_endpoint))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(handler: McpHandler, host: &str, port: u16) -> Result<()> {
    let router = create_router(handler);

    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    let addr: SocketAddr = listener.local_addr()?;

    info!("MCP HTTP server listening on http://{}", addr);
    info!("JSON-RPC endpoint: http://{}/mcp", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
