//! HTTP handlers for the relay API.

use super::types::*;
use super::AppState;
use crate::error::RelayError;
use crate::generation_log::ResultType;
use crate::provider::TextProvider;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Assistant and style recorded for knowledge-base chats.
pub const CHAT_ASSISTANT: &str = "Chat Assistant";
pub const CHAT_STYLE: &str = "N/A";

/// Script generation routes and the providers each one uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationRoute {
    OpenAi,
    Gemini,
    Vibe,
    Hybrid,
}

impl GenerationRoute {
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::OpenAi => "/openai",
            Self::Gemini => "/gemini",
            Self::Vibe => "/vibe",
            Self::Hybrid => "/hybrid",
        }
    }

    /// Whether the prompt gets the "unique vibe" clause.
    pub fn vibe(self) -> bool {
        matches!(self, Self::Vibe)
    }

    /// Providers to try, in order.
    pub fn provider_order(self, state: &AppState) -> Vec<Arc<dyn TextProvider>> {
        let providers = &state.providers;
        match self {
            Self::OpenAi => vec![providers.openai.clone()],
            Self::Gemini => vec![providers.gemini.clone()],
            Self::Vibe => vec![providers.anthropic.clone()],
            Self::Hybrid => vec![
                providers.openai.clone(),
                providers.gemini.clone(),
                providers.anthropic.clone(),
            ],
        }
    }
}

// ============================================================================
// Script generation handlers
// ============================================================================

async fn generate_script(
    state: &AppState,
    route: GenerationRoute,
    request: GenerationRequest,
) -> Result<Json<ScriptResponse>, RelayError> {
    let full_prompt = request.full_prompt(route.vibe());
    let order = route.provider_order(state);

    let source = state.dispatcher.generate(&full_prompt, &order).await?;

    state.log.append(
        route.endpoint(),
        &request.prompt,
        &request.assistant,
        &request.style,
        &source,
        ResultType::Script,
    );

    Ok(Json(ScriptResponse {
        kind: "script",
        source,
    }))
}

pub async fn openai(
    State(state): State<Arc<AppState>>,
    body: Result<Json<GenerationRequest>, JsonRejection>,
) -> Result<Json<ScriptResponse>, RelayError> {
    let Json(request) = body?;
    generate_script(&state, GenerationRoute::OpenAi, request).await
}

pub async fn gemini(
    State(state): State<Arc<AppState>>,
    body: Result<Json<GenerationRequest>, JsonRejection>,
) -> Result<Json<ScriptResponse>, RelayError> {
    let Json(request) = body?;
    generate_script(&state, GenerationRoute::Gemini, request).await
}

pub async fn vibe(
    State(state): State<Arc<AppState>>,
    body: Result<Json<GenerationRequest>, JsonRejection>,
) -> Result<Json<ScriptResponse>, RelayError> {
    let Json(request) = body?;
    generate_script(&state, GenerationRoute::Vibe, request).await
}

pub async fn hybrid(
    State(state): State<Arc<AppState>>,
    body: Result<Json<GenerationRequest>, JsonRejection>,
) -> Result<Json<ScriptResponse>, RelayError> {
    let Json(request) = body?;
    generate_script(&state, GenerationRoute::Hybrid, request).await
}

// ============================================================================
// Knowledge-base chat
// ============================================================================

pub async fn chat(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, RelayError> {
    let Json(request) = body?;
    let prompt = request
        .prompt
        .filter(|p| !p.is_empty())
        .ok_or_else(|| RelayError::Validation("No prompt provided".to_string()))?;

    let response = state.knowledge.find_best_match(&prompt);

    state.log.append(
        "/chat",
        &prompt,
        CHAT_ASSISTANT,
        CHAT_STYLE,
        response,
        ResultType::Chat,
    );

    Ok(Json(ChatResponse {
        kind: "chat",
        response,
    }))
}

// ============================================================================
// Log handlers
// ============================================================================

pub async fn list_logs(State(state): State<Arc<AppState>>) -> Json<LogsResponse> {
    let logs = state.log.list_all();
    let count = logs.len();
    Json(LogsResponse { logs, count })
}

pub async fn count_logs(
    State(state): State<Arc<AppState>>,
) -> Json<crate::generation_log::LogStats> {
    Json(state.log.aggregate())
}

// ============================================================================
// Health and index
// ============================================================================

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        message: "SpeedyAI backend is running",
    })
}

pub async fn index() -> Json<IndexResponse> {
    let endpoints = BTreeMap::from([
        ("/openai", "OpenAI GPT endpoint"),
        ("/gemini", "Google Gemini endpoint"),
        ("/vibe", "Anthropic Claude endpoint"),
        ("/hybrid", "Hybrid AI (tries multiple services)"),
        ("/chat", "Free chat assistant (local knowledge base)"),
        ("/logs", "All logged generations"),
        ("/logs/count", "Log statistics"),
        ("/health", "Health check"),
    ]);

    Json(IndexResponse {
        message: "SpeedyAI Backend Server",
        endpoints,
    })
}
