//! Terminal logging of generations with configurable verbosity levels.
//!
//! Supports three verbosity levels:
//! - Minimal: One-liner
//! - Compact: Two lines, request then result
//! - Verbose: Full block with prompt and result previews

use crate::config::LogVerbosity;
use crate::generation_log::LogEntry;

const SEPARATOR: &str = "────────────────────────────────────────";

/// Longest prompt/result excerpt shown in compact and verbose output.
const PREVIEW_CHARS: usize = 80;

/// Cut `text` to at most `max_chars` characters, marking the cut with `…`.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}

/// Collapse newlines so a preview stays on one line.
fn one_line(text: &str) -> String {
    preview(text, PREVIEW_CHARS).replace(['\n', '\r'], " ")
}

/// Format a log entry for terminal output.
pub fn format_entry(entry: &LogEntry, verbosity: LogVerbosity) -> String {
    match verbosity {
        LogVerbosity::Minimal => format_minimal(entry),
        LogVerbosity::Compact => format_compact(entry),
        LogVerbosity::Verbose => format_verbose(entry),
    }
}

fn format_minimal(entry: &LogEntry) -> String {
    format!(
        "[LOG] {} ({}) - {} - {}",
        entry.assistant, entry.style, entry.endpoint, entry.result_type
    )
}

fn format_compact(entry: &LogEntry) -> String {
    format!(
        "→ #{} {} [{} / {}] {}\n← {} ({} chars)",
        entry.id,
        entry.endpoint,
        entry.assistant,
        entry.style,
        one_line(&entry.prompt),
        entry.result_type,
        entry.result.chars().count()
    )
}

fn format_verbose(entry: &LogEntry) -> String {
    format!(
        "{separator}\n\
         #{id} {endpoint} at {timestamp}\n\
         Assistant: {assistant}\n\
         Style: {style}\n\
         Prompt: {prompt}\n\
         Result ({result_type}, {chars} chars): {result}\n\
         {separator}",
        separator = SEPARATOR,
        id = entry.id,
        endpoint = entry.endpoint,
        timestamp = entry.timestamp.to_rfc3339(),
        assistant = entry.assistant,
        style = entry.style,
        prompt = one_line(&entry.prompt),
        result_type = entry.result_type,
        chars = entry.result.chars().count(),
        result = one_line(&entry.result),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation_log::ResultType;
    use chrono::Utc;

    fn sample_entry() -> LogEntry {
        LogEntry {
            id: 7,
            timestamp: Utc::now(),
            endpoint: "/openai".to_string(),
            prompt: "make a spinning\ncoin".to_string(),
            assistant: "Script".to_string(),
            style: "Fast".to_string(),
            result: "local coin = script.Parent".to_string(),
            result_type: ResultType::Script,
        }
    }

    #[test]
    fn minimal_format_is_single_line() {
        let output = format_entry(&sample_entry(), LogVerbosity::Minimal);

        assert!(!output.contains('\n'), "Minimal should be single line");
        assert_eq!(output, "[LOG] Script (Fast) - /openai - script");
    }

    #[test]
    fn compact_format_is_two_lines() {
        let output = format_entry(&sample_entry(), LogVerbosity::Compact);

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2, "Compact should be two lines");

        assert!(lines[0].starts_with("→ #7 /openai"));
        assert!(lines[0].contains("make a spinning coin"));
        assert!(lines[1].starts_with("← script"));
        assert!(lines[1].contains("26 chars"));
    }

    #[test]
    fn verbose_format_has_separator_lines() {
        let output = format_entry(&sample_entry(), LogVerbosity::Verbose);

        assert!(output.starts_with(SEPARATOR));
        assert!(output.ends_with(SEPARATOR));
        assert!(output.contains("Assistant: Script"));
        assert!(output.contains("Style: Fast"));
        assert!(output.contains("local coin"));
    }

    #[test]
    fn preview_truncates_on_char_boundaries() {
        assert_eq!(preview("héllo wörld", 5), "héllo…");
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("", 3), "");
    }
}
