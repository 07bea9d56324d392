//! Append-only in-memory record of generations.
//!
//! One mutex guards both the entries and the id counter, so ids are
//! assigned and stored as a single step. Entries live for the life of the
//! process. Optionally each new entry is mirrored to an external collector.

use crate::config::LogVerbosity;
use crate::http::{create_client_with_timeout, FORWARD_TIMEOUT};
use crate::logger::format_entry;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Kind of result a log entry holds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResultType {
    Script,
    Chat,
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultType::Script => write!(f, "script"),
            ResultType::Chat => write!(f, "chat"),
        }
    }
}

/// One recorded generation. Never changed after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogEntry {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub endpoint: String,
    pub prompt: String,
    pub assistant: String,
    pub style: String,
    pub result: String,
    pub result_type: ResultType,
}

/// Counts over every stored entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct LogStats {
    pub total: usize,
    pub by_endpoint: BTreeMap<String, usize>,
    pub by_style: BTreeMap<String, usize>,
    pub by_assistant: BTreeMap<String, usize>,
}

#[derive(Debug)]
struct LogStore {
    entries: Vec<LogEntry>,
    next_id: u64,
}

impl Default for LogStore {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }
}

/// Posts log entries to an external collector.
#[derive(Clone)]
pub struct LogForwarder {
    client: Client,
    url: String,
}

impl LogForwarder {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: create_client_with_timeout(FORWARD_TIMEOUT),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// POST one entry as JSON.
    pub async fn send(&self, entry: &LogEntry) -> Result<(), reqwest::Error> {
        self.client
            .post(&self.url)
            .json(entry)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Forward in the background; failures are only logged.
    fn spawn_send(&self, entry: LogEntry) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(id = entry.id, "No async runtime; log entry not forwarded");
            return;
        };

        let forwarder = self.clone();
        runtime.spawn(async move {
            if let Err(e) = forwarder.send(&entry).await {
                tracing::warn!(id = entry.id, url = %forwarder.url, "Failed to forward log entry: {}", e);
            }
        });
    }
}

/// Shared handle to the generation log. Clones share the same store.
#[derive(Clone, Default)]
pub struct GenerationLog {
    store: Arc<Mutex<LogStore>>,
    forwarder: Option<LogForwarder>,
    verbosity: LogVerbosity,
}

impl GenerationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mirror each appended entry to `forwarder`.
    pub fn with_forwarder(mut self, forwarder: LogForwarder) -> Self {
        self.forwarder = Some(forwarder);
        self
    }

    /// Verbosity of the operator line printed per entry.
    pub fn with_verbosity(mut self, verbosity: LogVerbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    fn lock(&self) -> MutexGuard<'_, LogStore> {
        // Entries are only ever pushed whole, so a poisoned store is still consistent.
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a generation and return the stored entry.
    pub fn append(
        &self,
        endpoint: &str,
        prompt: &str,
        assistant: &str,
        style: &str,
        result: &str,
        result_type: ResultType,
    ) -> LogEntry {
        let entry = {
            let mut store = self.lock();
            let entry = LogEntry {
                id: store.next_id,
                timestamp: Utc::now(),
                endpoint: endpoint.to_string(),
                prompt: prompt.to_string(),
                assistant: assistant.to_string(),
                style: style.to_string(),
                result: result.to_string(),
                result_type,
            };
            store.next_id += 1;
            store.entries.push(entry.clone());
            entry
        };

        if let Some(forwarder) = &self.forwarder {
            forwarder.spawn_send(entry.clone());
        }

        tracing::info!("{}", format_entry(&entry, self.verbosity));
        entry
    }

    /// All entries in creation order.
    pub fn list_all(&self) -> Vec<LogEntry> {
        self.lock().entries.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Count entries in total and per endpoint, style and assistant.
    pub fn aggregate(&self) -> LogStats {
        let store = self.lock();
        let mut stats = LogStats {
            total: store.entries.len(),
            ..LogStats::default()
        };

        for entry in &store.entries {
            *stats.by_endpoint.entry(entry.endpoint.clone()).or_default() += 1;
            *stats.by_style.entry(entry.style.clone()).or_default() += 1;
            *stats.by_assistant.entry(entry.assistant.clone()).or_default() += 1;
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    #[test]
    fn ids_start_at_one_and_increase() {
        let log = GenerationLog::new();

        let first = log.append("/openai", "a", "Script", "Modern", "r1", ResultType::Script);
        let second = log.append("/chat", "b", "Chat Assistant", "N/A", "r2", ResultType::Chat);

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(log.list_all(), vec![first, second]);
    }

    #[test]
    fn clones_share_the_same_store() {
        let log = GenerationLog::new();
        let other = log.clone();

        other.append("/gemini", "p", "Script", "Modern", "r", ResultType::Script);

        assert_eq!(log.len(), 1);
        assert!(!log.is_empty());
    }

    #[test]
    fn aggregate_counts_by_endpoint_style_and_assistant() {
        let log = GenerationLog::new();
        for _ in 0..3 {
            log.append("/openai", "p", "Script", "Fast", "r", ResultType::Script);
        }
        log.append("/chat", "q", "Chat Assistant", "N/A", "r", ResultType::Chat);

        let stats = log.aggregate();

        assert_eq!(
            stats,
            LogStats {
                total: 4,
                by_endpoint: BTreeMap::from([("/chat".to_string(), 1), ("/openai".to_string(), 3)]),
                by_style: BTreeMap::from([("Fast".to_string(), 3), ("N/A".to_string(), 1)]),
                by_assistant: BTreeMap::from([
                    ("Chat Assistant".to_string(), 1),
                    ("Script".to_string(), 3),
                ]),
            }
        );
    }

    #[test]
    fn empty_log_aggregates_to_zero() {
        assert_eq!(GenerationLog::new().aggregate(), LogStats::default());
    }

    #[test]
    fn entry_serializes_with_snake_case_fields() {
        let log = GenerationLog::new();
        let entry = log.append("/vibe", "p", "Script", "Modern", "r", ResultType::Script);

        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["result_type"], "script");
        assert_eq!(json["endpoint"], "/vibe");
        assert!(json["timestamp"].is_string());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_appends_get_distinct_contiguous_ids() {
        let log = GenerationLog::new();
        const N: u64 = 64;

        let handles: Vec<_> = (0..N)
            .map(|i| {
                let log = log.clone();
                tokio::spawn(async move {
                    log.append("/hybrid", &format!("p{}", i), "Script", "Modern", "r", ResultType::Script)
                        .id
                })
            })
            .collect();

        let mut ids: Vec<u64> = futures::future::join_all(handles)
            .await
            .into_iter()
            .map(|r| r.unwrap())
            .collect();
        ids.sort_unstable();

        assert_eq!(ids, (1..=N).collect::<Vec<_>>());
        assert_eq!(log.aggregate().total, N as usize);

        let stored: Vec<u64> = log.list_all().iter().map(|e| e.id).collect();
        assert_eq!(stored, (1..=N).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn forwards_appended_entries() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("POST", "/collect")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "id": 1,
                "endpoint": "/openai",
                "result_type": "script"
            })))
            .with_status(200)
            .create_async()
            .await;

        let log = GenerationLog::new()
            .with_forwarder(LogForwarder::new(format!("{}/collect", server.url())));
        log.append("/openai", "p", "Script", "Modern", "r", ResultType::Script);

        for _ in 0..50 {
            if mock.matched_async().await {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn forwarding_failure_does_not_affect_append() {
        let log = GenerationLog::new().with_forwarder(LogForwarder::new("http://127.0.0.1:9/collect"));

        let entry = log.append("/chat", "p", "Chat Assistant", "N/A", "r", ResultType::Chat);

        assert_eq!(entry.id, 1);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn append_without_runtime_skips_forwarding() {
        let log = GenerationLog::new().with_forwarder(LogForwarder::new("http://127.0.0.1:9/collect"));

        let entry = log.append("/chat", "p", "Chat Assistant", "N/A", "r", ResultType::Chat);

        assert_eq!(entry.id, 1);
    }
}
