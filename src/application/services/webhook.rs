use std::time::Duration;

use async_trait::async_trait;

use crate::domain::errors::DeliveryError;

/// Result of a delivery attempt that reached the webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Delivered,
    /// The webhook throttled us; nothing after the throttled chunk was sent.
    RateLimited { retry_after: Duration },
}

impl SendOutcome {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, SendOutcome::RateLimited { .. })
    }

    pub fn retry_after(&self) -> Duration {
        match self {
            SendOutcome::Delivered => Duration::ZERO,
            SendOutcome::RateLimited { retry_after } => *retry_after,
        }
    }
}

/// Delivers one chat message to a Discord-compatible webhook.
#[async_trait]
pub trait WebhookSender: Send + Sync {
    async fn send(
        &self,
        webhook_url: &str,
        sender: &str,
        message: &str,
    ) -> Result<SendOutcome, DeliveryError>;
}
