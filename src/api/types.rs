//! Request and response types for the relay API.

use crate::generation_log::LogEntry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn default_assistant() -> String {
    "Script".to_string()
}

fn default_style() -> String {
    "Modern".to_string()
}

/// Body of the script generation routes.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct GenerationRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default = "default_assistant")]
    pub assistant: String,
    #[serde(default = "default_style")]
    pub style: String,
}

impl GenerationRequest {
    /// Prompt sent upstream: `Create a <style> <assistant> in Roblox[ with a unique vibe]: <prompt>`.
    pub fn full_prompt(&self, vibe: bool) -> String {
        format!(
            "Create a {} {} in Roblox{}: {}",
            self.style.to_lowercase(),
            self.assistant.to_lowercase(),
            if vibe { " with a unique vibe" } else { "" },
            self.prompt
        )
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ChatRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Serialize)]
pub struct ScriptResponse {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub source: String,
}

#[derive(Serialize)]
pub struct ChatResponse {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub response: &'static str,
}

#[derive(Serialize)]
pub struct LogsResponse {
    pub logs: Vec<LogEntry>,
    pub count: usize,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

#[derive(Serialize)]
pub struct IndexResponse {
    pub message: &'static str,
    pub endpoints: BTreeMap<&'static str, &'static str>,
}
