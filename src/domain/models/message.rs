use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A chat line received from the game client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: String,
    pub message: String,
}

impl ChatMessage {
    /// Builds a message from the raw ingestion parameters. Both must be present
    /// and non-empty, otherwise there is nothing to relay.
    pub fn from_params(sender: Option<String>, message: Option<String>) -> Option<Self> {
        match (sender, message) {
            (Some(sender), Some(message)) if !sender.is_empty() && !message.is_empty() => {
                Some(Self { sender, message })
            }
            _ => None,
        }
    }
}

/// A Discord delivery waiting in the retry queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedMessage {
    pub id: Uuid,
    pub webhook_url: String,
    pub sender: String,
    pub message: String,
    /// `None` means ready immediately.
    pub retry_at: Option<DateTime<Utc>>,
    pub attempts: u32,
}

impl QueuedMessage {
    pub fn new(webhook_url: impl Into<String>, sender: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            webhook_url: webhook_url.into(),
            sender: sender.into(),
            message: message.into(),
            retry_at: None,
            attempts: 0,
        }
    }

    pub fn is_ready(&self, now: DateTime<Utc>) -> bool {
        self.retry_at.is_none_or(|at| at <= now)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn params_require_sender_and_message() {
        assert!(ChatMessage::from_params(None, Some("hi".into())).is_none());
        assert!(ChatMessage::from_params(Some("Bob".into()), None).is_none());
        assert!(ChatMessage::from_params(Some(String::new()), Some("hi".into())).is_none());
        assert!(ChatMessage::from_params(Some("Bob".into()), Some(String::new())).is_none());

        let message = ChatMessage::from_params(Some("Bob".into()), Some("hi".into()))
            .expect("both params present");
        assert_eq!(message.sender, "Bob");
        assert_eq!(message.message, "hi");
    }

    #[test]
    fn readiness_follows_retry_at() {
        let now = Utc::now();
        let mut queued = QueuedMessage::new("http://hook", "Bob", "hi");
        assert!(queued.is_ready(now));

        queued.retry_at = Some(now - Duration::seconds(1));
        assert!(queued.is_ready(now));

        queued.retry_at = Some(now + Duration::seconds(30));
        assert!(!queued.is_ready(now));
    }
}
