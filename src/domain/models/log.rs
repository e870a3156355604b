use std::fmt;

use serde::{Deserialize, Serialize};

use super::sink::SinkKind;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn tag(&self) -> &'static str {
        match self {
            LogLevel::Debug => "[DEBUG]",
            LogLevel::Info => "[INFO]",
            LogLevel::Warning => "[WARNING]",
            LogLevel::Error => "[ERROR]",
        }
    }
}

/// One operator-facing log event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} {}", self.timestamp, self.level.tag(), self.message)
    }
}

/// A message that could not be delivered to one of its sinks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureEntry {
    pub timestamp: String,
    pub sender: String,
    pub message: String,
    pub sink: SinkKind,
    pub error: String,
}

const DISPLAY_MESSAGE_LEN: usize = 100;

impl fmt::Display for FailureEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} | {}: {} | Error: {}",
            self.timestamp,
            self.sink,
            self.sender,
            truncate_message(&self.message, DISPLAY_MESSAGE_LEN),
            self.error
        )
    }
}

/// Shortens `message` to at most `max_len` chars, ending in `...` when cut.
pub fn truncate_message(message: &str, max_len: usize) -> String {
    if message.chars().count() <= max_len {
        return message.to_string();
    }
    let kept: String = message.chars().take(max_len.saturating_sub(3)).collect();
    format!("{kept}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_display_truncates_long_messages() {
        let entry = FailureEntry {
            timestamp: "12:00:00".into(),
            sender: "Bob".into(),
            message: "x".repeat(150),
            sink: SinkKind::Discord,
            error: "boom".into(),
        };

        let rendered = entry.to_string();
        let expected = format!("[12:00:00] discord | Bob: {}... | Error: boom", "x".repeat(97));
        assert_eq!(rendered, expected);
    }

    #[test]
    fn truncate_counts_chars_not_bytes() {
        assert_eq!(truncate_message("héllo", 5), "héllo");
        assert_eq!(truncate_message("héllo wörld", 8), "héllo...");
    }

    #[test]
    fn log_line_carries_level_tag() {
        let line = LogLine {
            timestamp: "08:15:00".into(),
            level: LogLevel::Warning,
            message: "careful".into(),
        };
        assert_eq!(line.to_string(), "[08:15:00] [WARNING] careful");
    }
}
