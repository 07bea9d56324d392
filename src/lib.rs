//! SpeedyAI - HTTP relay between the SpeedyAI Roblox plugin and hosted AI providers.
//!
//! Features:
//! - Script generation through OpenAI, Gemini or Anthropic
//! - Hybrid route with provider fallback
//! - Free chat assistant backed by a local knowledge base
//! - In-memory generation log with statistics and optional forwarding

pub mod api;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod generation_log;
pub mod http;
pub mod knowledge;
pub mod logger;
pub mod provider;
