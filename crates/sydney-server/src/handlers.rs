//! HTTP Handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use sydney_core::ContextStats;

use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub provider: String,
    pub provider_connected: bool,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub user_id: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub message: String,
    pub live_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub switched_session: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct GreetingParams {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GreetingResponse {
    pub greeting: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let provider_connected = state.provider.health_check().await.unwrap_or(false);

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        provider: state.provider.name().to_string(),
        provider_connected,
    })
}

/// Main chat endpoint. The router never errors user-visibly, so the only
/// failure mode here is a malformed request.
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ErrorResponse>)> {
    if payload.user_id.trim().is_empty() || payload.message.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "user_id and message must be non-empty".into(),
                code: "INVALID_REQUEST".into(),
            }),
        ));
    }

    let reply = state
        .sydney
        .handle_message(&payload.user_id, &payload.message)
        .await;

    Ok(Json(ChatResponse {
        message: reply.text,
        live_data: reply.live_data,
        switched_session: reply.switched_session,
    }))
}

/// Greeting of the day
pub async fn greeting_handler(
    Query(params): Query<GreetingParams>,
) -> Json<GreetingResponse> {
    Json(GreetingResponse {
        greeting: sydney_chat::greeting(params.name.as_deref(), chrono::Local::now()),
    })
}

/// Per-user conversation stats
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<ContextStats> {
    Json(state.memory.stats(&user_id))
}
