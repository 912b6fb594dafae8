//! HTTP API gateway for Switchboard.
//!
//! Endpoints:
//!
//! - `POST /route-query`   — Route a message, get the handler's response
//! - `GET  /health`        — Liveness plus registry summary
//! - `GET  /capabilities`  — Registered capability listing
//!
//! Built on Axum. The orchestrator contract guarantees a well-formed
//! envelope for every query, so the only client-visible error here is
//! request validation.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use switchboard_core::turn::SessionId;
use switchboard_orchestrator::Orchestrator;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub orchestrator: Arc<Orchestrator>,
    pub start_time: DateTime<Utc>,
}

impl GatewayState {
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self {
            orchestrator,
            start_time: Utc::now(),
        }
    }
}

pub type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
///
/// Layers: permissive CORS (browser chat clients), 1 MB body limit,
/// HTTP trace logging.
pub fn build_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/route-query", post(route_query_handler))
        .route("/health", get(health_handler))
        .route("/capabilities", get(capabilities_handler))
        .with_state(state)
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Start the gateway HTTP server.
pub async fn start(
    addr: &str,
    orchestrator: Arc<Orchestrator>,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(GatewayState::new(orchestrator));
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Gateway listening");
    axum::serve(listener, router).await?;
    Ok(())
}

async fn route_query_handler(
    State(state): State<SharedState>,
    body: axum::body::Bytes,
) -> impl IntoResponse {
    // Validated by hand so the client always gets a JSON error body,
    // including for syntactically invalid JSON.
    let Ok(body) = serde_json::from_slice::<serde_json::Value>(&body) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "request body must be valid JSON"})),
        )
            .into_response();
    };
    let Some(message) = body.get("message").and_then(|v| v.as_str()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "message is required and must be a string"})),
        )
            .into_response();
    };

    let session_id = body
        .get("sessionId")
        .and_then(|v| v.as_str())
        .map(SessionId::from)
        .unwrap_or_default();

    let envelope = state.orchestrator.process_query(message, &session_id).await;

    Json(json!({
        "id": envelope.id,
        "content": envelope.content,
        "role": "assistant",
        "timestamp": envelope.timestamp.to_rfc3339(),
        "sessionId": session_id.to_string(),
        "agentType": envelope.handler_id,
        "intentAnalysis": {
            "intent": envelope.intent.handler_id,
            "confidence": envelope.intent.confidence.to_string(),
            "score": envelope.intent.score,
            "fallbackApplied": envelope.intent.fallback_applied,
            "errorHandled": envelope.error_handled,
        },
    }))
    .into_response()
}

async fn health_handler(State(state): State<SharedState>) -> Json<serde_json::Value> {
    let registry = state.orchestrator.registry();
    let enabled = registry.read().await.list_enabled().len();
    let uptime = (Utc::now() - state.start_time).num_seconds();

    Json(json!({
        "status": "ok",
        "uptimeSecs": uptime,
        "enabledCapabilities": enabled,
    }))
}

async fn capabilities_handler(State(state): State<SharedState>) -> Json<serde_json::Value> {
    let registry = state.orchestrator.registry();
    let registry = registry.read().await;
    let capabilities: Vec<serde_json::Value> = registry
        .list_all()
        .map(|(capability, enabled)| {
            json!({
                "handlerId": capability.handler_id,
                "enabled": enabled,
                "priority": capability.priority,
                "confidenceThreshold": capability.confidence_threshold,
            })
        })
        .collect();

    Json(json!({ "capabilities": capabilities }))
}
