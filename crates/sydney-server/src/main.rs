//! Sydney HTTP Server
//!
//! Axum-based server exposing the trading assistant: chat, greeting of
//! the day, per-user stats, and a health endpoint.

mod handlers;
mod state;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use market_data::MarketDataGateway;
use sydney_chat::Sydney;
use sydney_core::{CompletionProvider, ConversationMemory, GenerationOptions};
use sydney_runtime::{GeminiProvider, OllamaProvider};
use trading_store::{MemoryTradingStore, RestTradingStore, TradingStore};

use crate::handlers::{chat_handler, greeting_handler, health_check, stats_handler};
use crate::state::AppState;

/// Users idle longer than this lose their conversation context
const IDLE_EVICTION_MINUTES: i64 = 30;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    // Completion backend: hosted when a key is configured, local otherwise
    let (provider, options): (Arc<dyn CompletionProvider>, GenerationOptions) =
        if std::env::var("GEMINI_API_KEY").is_ok() {
            (
                Arc::new(GeminiProvider::from_env()?),
                GenerationOptions::default(),
            )
        } else {
            tracing::warn!("GEMINI_API_KEY not set - falling back to local Ollama");
            (
                Arc::new(OllamaProvider::from_env()),
                GenerationOptions {
                    model: std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3.2".into()),
                    ..GenerationOptions::default()
                },
            )
        };

    match provider.health_check().await {
        Ok(true) => tracing::info!("✓ Connected to {} backend", provider.name()),
        Ok(false) | Err(_) => {
            tracing::warn!("⚠ {} backend not reachable - chat will apologize", provider.name());
        }
    }

    // Trading data store: hosted when configured, in-memory otherwise
    let store: Arc<dyn TradingStore> = if std::env::var("SUPABASE_URL").is_ok() {
        tracing::info!("✓ Using hosted trading store");
        Arc::new(RestTradingStore::from_env()?)
    } else {
        tracing::warn!("⚠ SUPABASE_URL not set - using empty in-memory trading store");
        Arc::new(MemoryTradingStore::new())
    };

    // Market/news data gateway
    let gateway = Arc::new(MarketDataGateway::from_env());

    // Conversation memory + idle eviction
    let memory = Arc::new(ConversationMemory::new());
    let eviction_memory = memory.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(300));
        loop {
            interval.tick().await;
            eviction_memory.evict_idle(chrono::Duration::minutes(IDLE_EVICTION_MINUTES));
        }
    });

    // The router itself
    let sydney = Arc::new(
        Sydney::new(memory.clone(), gateway, store, provider.clone()).with_options(options),
    );

    let state = AppState {
        sydney,
        memory,
        provider,
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        .route("/health", get(health_check))
        .route("/api/chat", post(chat_handler))
        .route("/api/greeting", get(greeting_handler))
        .route("/api/stats/{user_id}", get(stats_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 sydney-server running on http://{}", addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health               - Health check");
    tracing::info!("  POST /api/chat             - Send message");
    tracing::info!("  GET  /api/greeting         - Greeting of the day");
    tracing::info!("  GET  /api/stats/{{user_id}}  - Conversation stats");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
