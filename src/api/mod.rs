//! HTTP API for the SpeedyAI plugin.
//!
//! Endpoints:
//! - POST /openai, /gemini, /vibe - Generate a script with one provider
//! - POST /hybrid - Generate a script, falling back OpenAI → Gemini → Anthropic
//! - POST /chat - Answer from the local knowledge base
//! - GET /logs - All logged generations
//! - GET /logs/count - Log statistics
//! - GET /health - Health check
//! - GET / - Endpoint listing

mod handlers;
mod types;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::dispatch::FallbackDispatcher;
use crate::generation_log::{GenerationLog, LogForwarder};
use crate::knowledge::KnowledgeBase;
use crate::provider::ProviderSet;

pub use handlers::{GenerationRoute, CHAT_ASSISTANT, CHAT_STYLE};
pub use types::*;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub providers: ProviderSet,
    pub dispatcher: FallbackDispatcher,
    pub log: GenerationLog,
    pub knowledge: Arc<KnowledgeBase>,
}

impl AppState {
    /// Build state from configuration.
    pub fn from_config(config: &Config) -> Self {
        let mut log = GenerationLog::new().with_verbosity(config.app.log_verbosity);
        if let Some(url) = &config.forwarding.url {
            log = log.with_forwarder(LogForwarder::new(url.clone()));
        }

        Self {
            providers: ProviderSet::from_config(&config.providers),
            dispatcher: FallbackDispatcher::new(),
            log,
            knowledge: Arc::new(KnowledgeBase::roblox()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Create the API router.
pub fn create_router() -> Router {
    create_router_with_state(AppState::default())
}

/// Create the API router with custom state.
pub fn create_router_with_state(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health_check))
        .route("/openai", post(handlers::openai))
        .route("/gemini", post(handlers::gemini))
        .route("/vibe", post(handlers::vibe))
        .route("/hybrid", post(handlers::hybrid))
        .route("/chat", post(handlers::chat))
        .route("/logs", get(handlers::list_logs))
        .route("/logs/count", get(handlers::count_logs))
        .with_state(Arc::new(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}
